// ============================================================================
// TESTING - Colaboradores falsos para tests nativos (sin navegador)
// ============================================================================

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::{AuthEvent, AuthEventKind, AuthUser, Session, UserProfile};
use crate::services::{
    initial_session, AuthCallback, AuthClient, AuthError, AuthListeners, AuthSubscription, Clock,
    ProfileStore, Router, Scheduler, Spawner, StoreError, TimerHandle,
};
use crate::state::{CurrencyStore, NavState};
use crate::viewmodels::NavServices;

pub const NOW: i64 = 1_700_000_000;

pub fn session_for(user_id: &str, expires_at: Option<i64>) -> Session {
    Session {
        access_token: format!("token-{}", user_id),
        refresh_token: Some(format!("refresh-{}", user_id)),
        token_type: Some("bearer".to_string()),
        expires_in: None,
        expires_at,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(format!("{}@privateair.test", user_id)),
        },
    }
}

pub fn profile(role: &str, full_name: &str) -> UserProfile {
    UserProfile {
        role: Some(role.to_string()),
        full_name: Some(full_name.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeAuth {
    pub session: RefCell<Option<Session>>,
    pub refreshed: RefCell<Option<Session>>,
    pub unreachable: Cell<bool>,
    pub sign_out_error: RefCell<Option<AuthError>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub listeners: AuthListeners,
    /// Reloj compartido con el `Harness`
    pub now: Rc<Cell<i64>>,
}

impl FakeAuth {
    pub fn with_session(session: Session) -> Rc<Self> {
        let auth = Self::default();
        *auth.session.borrow_mut() = Some(session);
        Rc::new(auth)
    }

    pub fn emit(&self, kind: AuthEventKind, session: Option<Session>) {
        self.listeners.emit(AuthEvent::new(kind, session));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl AuthClient for FakeAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        self.calls.borrow_mut().push("get_session");
        if self.unreachable.get() {
            return Err(AuthError::Network("connection refused".to_string()));
        }
        Ok(self.session.borrow().clone())
    }

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        self.calls.borrow_mut().push("refresh_session");
        if let Some(next) = self.refreshed.borrow_mut().take() {
            *self.session.borrow_mut() = Some(next);
        }
        Ok(self.session.borrow().clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.calls.borrow_mut().push("sign_out");
        if let Some(error) = self.sign_out_error.borrow().clone() {
            return Err(error);
        }
        *self.session.borrow_mut() = None;
        self.listeners.emit(AuthEvent::new(AuthEventKind::SignedOut, None));
        Ok(())
    }

    /// Igual que el cliente real: registra y entrega `InitialSession` en el acto
    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription {
        let subscription = self.listeners.add(callback.clone());
        let session = initial_session(self.session.borrow().clone(), self.now.get());
        callback(AuthEvent::new(AuthEventKind::InitialSession, session));
        subscription
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

type ProfileReply = Result<Option<UserProfile>, StoreError>;

#[derive(Default)]
pub struct FakeStore {
    pub profiles: RefCell<HashMap<String, UserProfile>>,
    pub profile_error: RefCell<Option<StoreError>>,
    /// Si está activo, las lecturas de perfil esperan a `release_profile`
    pub gate_profiles: Cell<bool>,
    pending_profiles: RefCell<Vec<(String, oneshot::Sender<ProfileReply>)>>,
    pub preferences: RefCell<HashMap<String, String>>,
    pub preference_error: RefCell<Option<StoreError>>,
    pub update_error: RefCell<Option<StoreError>>,
    pub insert_error: RefCell<Option<StoreError>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn pending_profile_count(&self) -> usize {
        self.pending_profiles.borrow().len()
    }

    /// Responde la lectura pendiente número `index` (en orden de llegada)
    pub fn release_profile(&self, index: usize, reply: ProfileReply) {
        let (_, sender) = self.pending_profiles.borrow_mut().remove(index);
        let _ = sender.send(reply);
    }
}

#[async_trait(?Send)]
impl ProfileStore for FakeStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.calls.borrow_mut().push(format!("fetch_profile:{}", user_id));
        if self.gate_profiles.get() {
            let (tx, rx) = oneshot::channel();
            self.pending_profiles.borrow_mut().push((user_id.to_string(), tx));
            return rx
                .await
                .unwrap_or_else(|_| Err(StoreError::Network("cancelled".to_string())));
        }
        if let Some(error) = self.profile_error.borrow().clone() {
            return Err(error);
        }
        Ok(self.profiles.borrow().get(user_id).cloned())
    }

    async fn fetch_currency_preference(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        self.calls.borrow_mut().push(format!("fetch_preference:{}", user_id));
        if let Some(error) = self.preference_error.borrow().clone() {
            return Err(error);
        }
        Ok(self.preferences.borrow().get(user_id).cloned())
    }

    async fn update_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(format!("update:{}:{}", user_id, currency_code));
        if let Some(error) = self.update_error.borrow().clone() {
            return Err(error);
        }
        let mut preferences = self.preferences.borrow_mut();
        match preferences.get_mut(user_id) {
            Some(code) => {
                *code = currency_code.to_string();
                Ok(())
            }
            None => Err(StoreError::NoRows),
        }
    }

    async fn insert_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(format!("insert:{}:{}", user_id, currency_code));
        if let Some(error) = self.insert_error.borrow().clone() {
            return Err(error);
        }
        self.preferences
            .borrow_mut()
            .insert(user_id.to_string(), currency_code.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scheduler / router / executor
// ---------------------------------------------------------------------------

struct ManualTimer {
    delay_ms: u32,
    callback: Option<Box<dyn FnOnce()>>,
    cancelled: Rc<Cell<bool>>,
}

struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle for ManualHandle {}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

#[derive(Default)]
pub struct ManualScheduler {
    timers: RefCell<Vec<ManualTimer>>,
}

impl ManualScheduler {
    /// Retardos de los timers que siguen pendientes
    pub fn pending_delays(&self) -> Vec<u32> {
        self.timers
            .borrow()
            .iter()
            .filter(|t| t.callback.is_some() && !t.cancelled.get())
            .map(|t| t.delay_ms)
            .collect()
    }

    pub fn scheduled_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Dispara el timer pendiente más antiguo; `false` si no había ninguno
    pub fn fire_next(&self) -> bool {
        let callback = {
            let mut timers = self.timers.borrow_mut();
            timers
                .iter_mut()
                .find(|t| t.callback.is_some() && !t.cancelled.get())
                .and_then(|t| t.callback.take())
        };
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(ManualTimer {
            delay_ms,
            callback: Some(callback),
            cancelled: cancelled.clone(),
        });
        Box::new(ManualHandle { cancelled })
    }
}

#[derive(Default)]
pub struct RecordingRouter {
    pub paths: RefCell<Vec<String>>,
}

impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.paths.borrow_mut().push(path.to_string());
    }
}

/// Todo lo necesario para ejecutar viewmodels en un test
pub struct Harness {
    pub pool: RefCell<LocalPool>,
    pub auth: Rc<FakeAuth>,
    pub store: Rc<FakeStore>,
    pub scheduler: Rc<ManualScheduler>,
    pub router: Rc<RecordingRouter>,
    pub now: Rc<Cell<i64>>,
    pub currency: CurrencyStore,
    pub state: NavState,
    pub services: NavServices,
}

impl Harness {
    pub fn new(auth: Rc<FakeAuth>, store: Rc<FakeStore>) -> Self {
        let pool = LocalPool::new();
        let local_spawner = pool.spawner();
        let spawner: Spawner = Rc::new(move |fut| {
            local_spawner
                .spawn_local(fut)
                .expect("el pool de test sigue vivo");
        });

        let now = auth.now.clone();
        now.set(NOW);
        let clock: Clock = {
            let now = now.clone();
            Rc::new(move || now.get())
        };

        let scheduler = Rc::new(ManualScheduler::default());
        let router = Rc::new(RecordingRouter::default());
        let currency = CurrencyStore::default();
        let state = NavState::new(currency.clone());

        let services = NavServices {
            auth: auth.clone(),
            store: store.clone(),
            router: router.clone(),
            scheduler: scheduler.clone(),
            spawner,
            clock,
        };

        Self {
            pool: RefCell::new(pool),
            auth,
            store,
            scheduler,
            router,
            now,
            currency,
            state,
            services,
        }
    }

    /// Ejecuta todos los futures listos hasta que se bloqueen
    pub fn settle(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}
