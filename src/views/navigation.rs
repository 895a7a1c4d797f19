// ============================================================================
// NAVIGATION VIEW - Renderiza la barra (Rust puro, sin lógica)
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};

use crate::dom::{set_attribute, ElementBuilder, EventHandlers};
use crate::utils::ROUTE_HOME;
use crate::viewmodels::NavigationViewModel;
use crate::views::nav_model::{NavItem, NavLink, NavModel};

/// ids usados por el listener de click fuera del menú móvil
pub const MOBILE_MENU_ID: &str = "mobile-menu";
pub const MOBILE_TOGGLE_ID: &str = "mobile-menu-toggle";

/// Renderizar la barra completa a partir del modelo.
/// Los closures de los handlers quedan en `handlers`, que debe vivir tanto como el DOM devuelto.
pub fn render_navigation(
    model: &NavModel,
    vm: &NavigationViewModel,
    handlers: &mut EventHandlers,
) -> Result<Element, JsValue> {
    if model.loading {
        return render_loading(model);
    }

    let nav = ElementBuilder::new("nav")?
        .class("navbar")
        .child(render_brand(model)?)?
        .child(render_currency_switcher(model, vm, handlers)?)?
        .child(render_desktop(model, vm, handlers)?)?
        .child(render_hamburger(vm, handlers)?)?
        .build();

    if model.mobile_menu_open {
        let menu = render_mobile_menu(model, vm, handlers)?;
        nav.append_child(&menu)?;
    }

    Ok(nav)
}

fn render_loading(model: &NavModel) -> Result<Element, JsValue> {
    let status = ElementBuilder::new("div")?
        .class("nav-desktop")
        .child(ElementBuilder::new("div")?.class("nav-loading").text("Loading...").build())?
        .build();

    Ok(ElementBuilder::new("nav")?
        .class("navbar")
        .child(render_brand(model)?)?
        .child(status)?
        .build())
}

fn render_brand(model: &NavModel) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("a")?
        .class("nav-brand")
        .attr("href", ROUTE_HOME)?
        .text(model.brand)
        .build())
}

fn link(link: &NavLink, class: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("a")?
        .class(class)
        .attr("href", link.href)?
        .text(link.label)
        .build())
}

fn render_currency_switcher(
    model: &NavModel,
    vm: &NavigationViewModel,
    handlers: &mut EventHandlers,
) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?
        .class("currency-select")
        .attr("aria-label", "Currency")?
        .build();

    for option in &model.currency_options {
        let opt = ElementBuilder::new("option")?
            .attr("value", option.code)?
            .text(&option.label)
            .build();
        if option.selected {
            set_attribute(&opt, "selected", "selected")?;
        }
        select.append_child(&opt)?;
    }

    {
        let vm = vm.clone();
        handlers.on_select_change(&select, move |code| vm.select_currency(&code))?;
    }

    Ok(ElementBuilder::new("div")?
        .class("currency-switcher")
        .child(select)?
        .build())
}

fn render_desktop(
    model: &NavModel,
    vm: &NavigationViewModel,
    handlers: &mut EventHandlers,
) -> Result<Element, JsValue> {
    let desktop = ElementBuilder::new("div")?.class("nav-desktop").build();

    for entry in model.desktop_links() {
        let anchor = link(&entry, "nav-link")?;
        desktop.append_child(&anchor)?;
    }

    if let Some(user) = &model.user {
        let toggle = ElementBuilder::new("button")?
            .class("user-menu-toggle")
            .attr("aria-haspopup", "true")?
            .attr("aria-expanded", if user.open { "true" } else { "false" })?
            .text(&format!("{} ▾", user.display_name))
            .build();
        {
            let vm = vm.clone();
            handlers.on_click(&toggle, move |_e| vm.toggle_user_menu())?;
        }

        let wrapper = ElementBuilder::new("div")?
            .class("user-menu")
            .child(toggle)?
            .build();

        if user.open {
            let dropdown = ElementBuilder::new("div")?.class("user-dropdown").build();
            for item in model.user_menu_items() {
                let entry = match item {
                    NavItem::Link(l) => link(&l, "user-dropdown-item")?,
                    NavItem::SignOut => {
                        let vm = vm.clone();
                        ElementBuilder::new("button")?
                            .class("user-dropdown-item")
                            .text("Sign Out")
                            .on_click(handlers, move |_e: MouseEvent| vm.sign_out_from_user_menu())?
                            .build()
                    }
                };
                dropdown.append_child(&entry)?;
            }
            wrapper.append_child(&dropdown)?;
        }

        desktop.append_child(&wrapper)?;
    }

    Ok(desktop)
}

fn render_hamburger(
    vm: &NavigationViewModel,
    handlers: &mut EventHandlers,
) -> Result<Element, JsValue> {
    let vm = vm.clone();
    let button = ElementBuilder::new("button")?
        .id(MOBILE_TOGGLE_ID)?
        .class("nav-hamburger")
        .attr("aria-label", "Open menu")?
        .text("☰")
        .on_click(handlers, move |_e: MouseEvent| vm.toggle_mobile_menu())?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("nav-mobile-toggle")
        .child(button)?
        .build())
}

fn render_mobile_menu(
    model: &NavModel,
    vm: &NavigationViewModel,
    handlers: &mut EventHandlers,
) -> Result<Element, JsValue> {
    let menu = ElementBuilder::new("div")?
        .id(MOBILE_MENU_ID)?
        .class("mobile-menu")
        .build();

    for item in model.mobile_items() {
        let vm = vm.clone();
        let entry = match item {
            // El enlace navega por defecto; solo cerramos el menú
            NavItem::Link(l) => {
                let el = link(&l, "mobile-menu-item")?;
                handlers.on_click(&el, move |_e| vm.mobile_item_selected())?;
                el
            }
            NavItem::SignOut => ElementBuilder::new("button")?
                .class("mobile-menu-item")
                .text("Sign Out")
                .on_click(handlers, move |_e: MouseEvent| vm.sign_out_from_mobile_menu())?
                .build(),
        };
        menu.append_child(&entry)?;
    }

    Ok(menu)
}
