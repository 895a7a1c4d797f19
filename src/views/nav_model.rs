// ============================================================================
// NAV MODEL - Qué se muestra en la barra (sin DOM)
// ============================================================================

use crate::models::{Currency, Identity};
use crate::state::NavState;
use crate::utils::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

impl NavLink {
    const fn new(label: &'static str, href: &'static str) -> Self {
        Self { label, href }
    }
}

pub const PRIMARY_LINKS: [NavLink; 5] = [
    NavLink::new("Home", ROUTE_HOME),
    NavLink::new("About Us", ROUTE_ABOUT),
    NavLink::new("Flights", ROUTE_FLIGHTS),
    NavLink::new("Track Flight", ROUTE_TRACK),
    NavLink::new("Contact", ROUTE_CONTACT),
];

pub const ADMIN_LINK: NavLink = NavLink::new("Admin Dashboard", ROUTE_ADMIN_DASHBOARD);
pub const PROFILE_LINK: NavLink = NavLink::new("Profile", ROUTE_PROFILE);
pub const LOGIN_LINK: NavLink = NavLink::new("Login", ROUTE_LOGIN);
pub const SIGNUP_LINK: NavLink = NavLink::new("Sign Up", ROUTE_SIGNUP);

/// Entrada de un menú: enlace o acción de sign-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Link(NavLink),
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOption {
    pub code: &'static str,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMenuModel {
    pub display_name: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavModel {
    pub brand: &'static str,
    pub loading: bool,
    pub currency_options: Vec<CurrencyOption>,
    pub is_admin: bool,
    pub user: Option<UserMenuModel>,
    pub mobile_menu_open: bool,
}

impl NavModel {
    pub fn from_state(state: &NavState) -> Self {
        let identity = state.identity();
        let menus = state.menus();
        let selected = state.currency();

        Self {
            brand: BRAND_NAME,
            loading: state.is_loading(),
            currency_options: currency_options(selected),
            is_admin: identity.is_admin(),
            user: match &identity {
                Identity::Anonymous => None,
                Identity::Authenticated(user) => Some(UserMenuModel {
                    display_name: user.display_name().to_string(),
                    open: menus.user_menu_open,
                }),
            },
            mobile_menu_open: menus.mobile_menu_open,
        }
    }

    /// Enlaces visibles directamente en la barra de escritorio
    pub fn desktop_links(&self) -> Vec<NavLink> {
        let mut links = PRIMARY_LINKS.to_vec();
        if self.user.is_some() && self.is_admin {
            links.push(ADMIN_LINK);
        }
        if self.user.is_none() {
            links.push(LOGIN_LINK);
            links.push(SIGNUP_LINK);
        }
        links
    }

    /// Contenido del dropdown de usuario (vacío si es anónimo)
    pub fn user_menu_items(&self) -> Vec<NavItem> {
        match self.user {
            Some(_) => vec![NavItem::Link(PROFILE_LINK), NavItem::SignOut],
            None => Vec::new(),
        }
    }

    /// Contenido completo del menú móvil
    pub fn mobile_items(&self) -> Vec<NavItem> {
        let mut items: Vec<NavItem> = PRIMARY_LINKS.iter().copied().map(NavItem::Link).collect();
        match self.user {
            Some(_) => {
                if self.is_admin {
                    items.push(NavItem::Link(ADMIN_LINK));
                }
                items.push(NavItem::Link(PROFILE_LINK));
                items.push(NavItem::SignOut);
            }
            None => {
                items.push(NavItem::Link(LOGIN_LINK));
                items.push(NavItem::Link(SIGNUP_LINK));
            }
        }
        items
    }
}

fn currency_options(selected: Currency) -> Vec<CurrencyOption> {
    Currency::ALL
        .iter()
        .map(|c| CurrencyOption {
            code: c.code(),
            label: c.label(),
            selected: *c == selected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, UserIdentity};
    use crate::state::CurrencyStore;

    fn state_with(identity: Identity) -> NavState {
        let state = NavState::new(CurrencyStore::default());
        state.set_identity(identity);
        state.finish_loading();
        state
    }

    fn user(role: Option<Role>) -> Identity {
        Identity::Authenticated(UserIdentity {
            id: "u1".into(),
            email: "u1@privateair.test".into(),
            full_name: Some("Amelia Earhart".into()),
            role,
        })
    }

    #[test]
    fn admin_link_in_desktop_and_mobile_for_admins() {
        let model = NavModel::from_state(&state_with(user(Some(Role::Admin))));
        assert!(model.desktop_links().contains(&ADMIN_LINK));
        assert!(model.mobile_items().contains(&NavItem::Link(ADMIN_LINK)));
    }

    #[test]
    fn no_admin_link_for_members_or_guests() {
        for identity in [user(Some(Role::Member)), user(None), Identity::Anonymous] {
            let model = NavModel::from_state(&state_with(identity));
            assert!(!model.desktop_links().contains(&ADMIN_LINK));
            assert!(!model.mobile_items().contains(&NavItem::Link(ADMIN_LINK)));
        }
    }

    #[test]
    fn guests_get_login_and_signup() {
        let model = NavModel::from_state(&state_with(Identity::Anonymous));
        assert!(model.user.is_none());
        assert!(model.user_menu_items().is_empty());
        assert_eq!(&model.desktop_links()[5..], &[LOGIN_LINK, SIGNUP_LINK]);
        assert_eq!(
            &model.mobile_items()[5..],
            &[NavItem::Link(LOGIN_LINK), NavItem::Link(SIGNUP_LINK)]
        );
    }

    #[test]
    fn signed_in_users_get_profile_and_sign_out() {
        let model = NavModel::from_state(&state_with(user(Some(Role::Member))));
        assert_eq!(model.user.as_ref().unwrap().display_name, "Amelia Earhart");
        assert_eq!(
            model.user_menu_items(),
            vec![NavItem::Link(PROFILE_LINK), NavItem::SignOut]
        );
        assert_eq!(model.mobile_items().last(), Some(&NavItem::SignOut));
        assert!(!model.desktop_links().contains(&LOGIN_LINK));
    }

    #[test]
    fn selected_currency_is_marked() {
        let state = state_with(Identity::Anonymous);
        state.currency_store().set_currency(Currency::Gbp);
        let model = NavModel::from_state(&state);
        let selected: Vec<&str> = model
            .currency_options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.code)
            .collect();
        assert_eq!(selected, vec!["GBP"]);
        assert_eq!(model.currency_options[1].label, "€ EUR");
    }

    #[test]
    fn loading_flag_comes_from_state() {
        let state = NavState::new(CurrencyStore::default());
        assert!(NavModel::from_state(&state).loading);
    }
}
