// ============================================================================
// PRIVATE AIR NAVIGATION - FRONTEND MVVM (RUST PURO)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Sesión, moneda, menús y sign-out
// - Services: Auth y datos (Supabase) detrás de traits
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con el backend
// ============================================================================

mod config;
mod models;
mod services;
mod viewmodels;
mod state;
mod dom;
mod views;
mod utils;
mod app;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::NavigationApp;
use crate::config::CONFIG;

// Instancia global de la barra montada
thread_local! {
    static NAV: RefCell<Option<NavigationApp>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 Private Air navigation ({})", CONFIG.environment);

    let app = NavigationApp::new()?;
    app.mount()?;

    NAV.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Re-render completo de la barra
#[wasm_bindgen]
pub fn rerender_navigation() {
    NAV.with(|cell| match cell.borrow().as_ref() {
        Some(app) => {
            if let Err(e) = app.render() {
                log::error!("❌ Error re-renderizando la navegación: {:?}", e);
            }
        }
        None => log::warn!("⚠️ [RERENDER] Navegación no montada"),
    });
}

/// Desmonta la barra y libera timers, suscripciones y listeners
#[wasm_bindgen]
pub fn unmount_navigation() {
    NAV.with(|cell| {
        if let Some(mut app) = cell.borrow_mut().take() {
            app.unmount();
        }
    });
}

/// Código ISO de la moneda seleccionada (p.ej. "USD")
#[wasm_bindgen]
pub fn current_currency() -> String {
    NAV.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|app| app.currency())
            .unwrap_or(CONFIG.default_currency)
            .code()
            .to_string()
    })
}

/// Selecciona una moneda desde JavaScript, igual que el `<select>` de la barra
#[wasm_bindgen]
pub fn set_currency(code: &str) {
    NAV.with(|cell| match cell.borrow().as_ref() {
        Some(app) => app.select_currency(code),
        None => log::warn!("⚠️ Navegación no montada, moneda {} ignorada", code),
    });
}
