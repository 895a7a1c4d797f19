// ============================================================================
// CONSTANTES - Rutas, tablas y claves compartidas
// ============================================================================

pub const BRAND_NAME: &str = "Private Air";

/// Rutas del sitio
pub const ROUTE_HOME: &str = "/";
pub const ROUTE_ABOUT: &str = "/about";
pub const ROUTE_FLIGHTS: &str = "/search";
pub const ROUTE_TRACK: &str = "/track";
pub const ROUTE_CONTACT: &str = "/contact";
pub const ROUTE_ADMIN_DASHBOARD: &str = "/admin/dashboard";
pub const ROUTE_PROFILE: &str = "/profile";
pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_SIGNUP: &str = "/signup";

/// Tablas PostgREST
pub const TABLE_USERS: &str = "users";
pub const TABLE_USER_PREFERENCES: &str = "user_preferences";

/// Códigos de error PostgREST / Postgres
pub const PGRST_NO_ROWS: &str = "PGRST116";
pub const PGRST_TABLE_NOT_IN_CACHE: &str = "PGRST205";
pub const PG_UNDEFINED_TABLE: &str = "42P01";

/// localStorage
pub const CURRENCY_STORAGE_KEY: &str = "currency-storage";

/// Eventos de window
pub const EVENT_LOGGED_IN: &str = "loggedIn";
pub const EVENT_CURRENCY_CHANGE: &str = "currencyChange";
