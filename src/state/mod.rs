// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod currency_store;
pub mod menu_state;
pub mod nav_state;

pub use currency_store::*;
pub use nav_state::*;
