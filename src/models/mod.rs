pub mod auth;
pub mod currency;
pub mod profile;

pub use auth::{AuthEvent, AuthEventKind, AuthUser, Identity, Role, Session, UserIdentity};
pub use currency::Currency;
pub use profile::{CurrencyPreference, CurrencyPreferenceUpdate, UserProfile};
