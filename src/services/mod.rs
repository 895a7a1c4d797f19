// ============================================================================
// SERVICES - SOLO comunicación con colaboradores externos
// ============================================================================

pub mod auth_client;
pub mod profile_store;
pub mod supabase_auth;
pub mod postgrest_store;
pub mod router;
pub mod runtime;

pub use auth_client::{
    initial_session, AuthCallback, AuthClient, AuthError, AuthListeners, AuthSubscription,
};
pub use profile_store::{ProfileStore, StoreError};
pub use supabase_auth::SupabaseAuth;
pub use postgrest_store::PostgrestStore;
pub use router::{BrowserRouter, Router};
pub use runtime::{
    browser_spawner, system_clock, BrowserScheduler, Clock, Scheduler, Spawner, TimerHandle,
};
