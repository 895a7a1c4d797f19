// ============================================================================
// NAVIGATION VIEWMODEL - Acciones de la barra (menús, moneda, sign-out)
// ============================================================================
// Las views solo llaman a estos métodos; el estado vive en NavState.
// ============================================================================

use crate::models::Currency;
use crate::services::AuthError;
use crate::state::NavState;
use crate::utils::ROUTE_HOME;
use crate::viewmodels::{CurrencySync, NavServices, SessionTracker};

#[derive(Clone)]
pub struct NavigationViewModel {
    state: NavState,
    services: NavServices,
    tracker: SessionTracker,
    currency: CurrencySync,
}

impl NavigationViewModel {
    pub fn new(state: NavState, services: NavServices, refresh_margin_secs: i64) -> Self {
        Self {
            tracker: SessionTracker::new(state.clone(), services.clone(), refresh_margin_secs),
            currency: CurrencySync::new(state.clone(), services.clone()),
            state,
            services,
        }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn mount(&self) {
        self.tracker.activate();
    }

    pub fn unmount(&self) {
        self.tracker.deactivate();
    }

    pub fn toggle_user_menu(&self) {
        self.state.update_menus(|m| m.toggle_user_menu());
    }

    pub fn toggle_mobile_menu(&self) {
        self.state.update_menus(|m| m.toggle_mobile_menu());
    }

    /// Click en un enlace del menú móvil
    pub fn mobile_item_selected(&self) {
        self.state.update_menus(|m| m.mobile_item_selected());
    }

    pub fn pointer_down(&self, inside_mobile_menu: bool) {
        self.state.update_menus(|m| m.pointer_down(inside_mobile_menu));
    }

    pub fn history_navigated(&self) {
        self.state.update_menus(|m| m.history_navigated());
    }

    /// Valor crudo del `<select>`
    pub fn select_currency(&self, code: &str) {
        match code.parse::<Currency>() {
            Ok(currency) => self.currency.change_currency(currency),
            Err(e) => log::warn!("⚠️ {}", e),
        }
    }

    /// "Sign Out" del dropdown de usuario
    pub fn sign_out_from_user_menu(&self) {
        self.state.update_menus(|m| m.close_user_menu());
        self.spawn_sign_out();
    }

    /// "Sign Out" del menú móvil
    pub fn sign_out_from_mobile_menu(&self) {
        self.state.update_menus(|m| m.mobile_item_selected());
        self.spawn_sign_out();
    }

    fn spawn_sign_out(&self) {
        let this = self.clone();
        self.services.spawn(async move {
            let _ = this.sign_out().await;
        });
    }

    /// Cierra la sesión y vuelve a la home. La identidad local se limpia con
    /// el evento `SignedOut` que emite el cliente de auth.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        log::info!("👋 Sign out iniciado");
        match self.services.auth.sign_out().await {
            Ok(()) => {
                self.services.router.navigate(ROUTE_HOME);
                log::info!("✅ Sign out completado");
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Error en sign out, se mantiene la página actual: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthEventKind, Identity};
    use crate::testing::{profile, session_for, FakeAuth, FakeStore, Harness};
    use futures::executor::block_on;

    fn signed_in_harness() -> Harness {
        let store = FakeStore::new();
        store.profiles.borrow_mut().insert("u1".into(), profile("admin", "Amelia"));
        Harness::new(FakeAuth::with_session(session_for("u1", None)), store)
    }

    #[test]
    fn sign_out_navigates_home_and_event_clears_identity() {
        let h = signed_in_harness();
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);
        vm.mount();
        h.settle();
        assert!(h.state.identity().is_admin());

        vm.toggle_user_menu();
        vm.sign_out_from_user_menu();
        assert!(!h.state.menus().user_menu_open);
        h.settle();

        assert_eq!(h.auth.calls().last(), Some(&"sign_out"));
        assert_eq!(*h.router.paths.borrow(), vec!["/".to_string()]);
        assert_eq!(h.state.identity(), Identity::Anonymous);
    }

    #[test]
    fn failed_sign_out_does_not_navigate() {
        let h = signed_in_harness();
        *h.auth.sign_out_error.borrow_mut() = Some(AuthError::Network("offline".into()));
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);
        vm.mount();
        h.settle();

        let result = block_on(vm.sign_out());

        assert_eq!(result, Err(AuthError::Network("offline".into())));
        assert!(h.router.paths.borrow().is_empty());
        assert!(h.state.identity().is_authenticated());
    }

    #[test]
    fn mobile_sign_out_closes_mobile_menu() {
        let h = signed_in_harness();
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);
        vm.mount();
        h.settle();

        vm.toggle_mobile_menu();
        vm.sign_out_from_mobile_menu();
        assert!(!h.state.menus().mobile_menu_open);
        h.settle();
        assert_eq!(*h.router.paths.borrow(), vec!["/".to_string()]);
    }

    #[test]
    fn menu_events_follow_the_state_machine() {
        let h = signed_in_harness();
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);

        vm.toggle_mobile_menu();
        vm.pointer_down(true);
        assert!(h.state.menus().mobile_menu_open);
        vm.pointer_down(false);
        assert!(!h.state.menus().mobile_menu_open);

        vm.toggle_mobile_menu();
        vm.mobile_item_selected();
        assert!(!h.state.menus().mobile_menu_open);

        vm.toggle_mobile_menu();
        vm.history_navigated();
        assert!(!h.state.menus().mobile_menu_open);
    }

    #[test]
    fn invalid_currency_codes_are_ignored() {
        let h = signed_in_harness();
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);

        vm.select_currency("JPY");
        assert_eq!(h.currency.currency(), Currency::Usd);
        vm.select_currency("EUR");
        assert_eq!(h.currency.currency(), Currency::Eur);
    }

    #[test]
    fn unmount_releases_subscription() {
        let h = signed_in_harness();
        let vm = NavigationViewModel::new(h.state.clone(), h.services.clone(), 1800);
        vm.mount();
        h.settle();
        vm.unmount();

        h.auth.emit(AuthEventKind::SignedOut, None);
        h.settle();
        assert!(h.state.identity().is_authenticated());
    }
}
