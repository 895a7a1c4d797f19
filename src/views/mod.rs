pub mod nav_model;
pub mod navigation;

pub use nav_model::NavModel;
pub use navigation::{render_navigation, MOBILE_MENU_ID, MOBILE_TOGGLE_ID};
