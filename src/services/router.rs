/// Navegación de la aplicación anfitriona
pub trait Router {
    fn navigate(&self, path: &str);
}

/// Navegación completa del documento (`location.assign`)
pub struct BrowserRouter;

impl Router for BrowserRouter {
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("⚠️ Sin window, no se puede navegar a {}", path);
            return;
        };
        if let Err(e) = window.location().assign(path) {
            log::error!("❌ Error navegando a {}: {:?}", path, e);
        }
    }
}
