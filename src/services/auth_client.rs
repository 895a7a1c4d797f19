// ============================================================================
// AUTH CLIENT - Contrato del colaborador de autenticación
// ============================================================================

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;

use crate::models::{AuthEvent, Session};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    #[error("network error: {0}")]
    Network(String),

    #[error("auth api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

pub type AuthCallback = Rc<dyn Fn(AuthEvent)>;

/// Sesión entregada como `InitialSession` al suscribirse.
/// Una sesión caducada no cuenta: solo `get_session` puede refrescarla.
pub fn initial_session(stored: Option<Session>, now_secs: i64) -> Option<Session> {
    stored.filter(|session| !session.is_expired(now_secs))
}

/// Colaborador de autenticación (GoTrue en producción)
#[async_trait(?Send)]
pub trait AuthClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Suscribirse al stream de cambios; la suscripción vive hasta su drop
    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription;
}

/// Suscripción activa al stream de auth
pub struct AuthSubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl AuthSubscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

/// Registro de listeners compartido por las implementaciones de `AuthClient`
#[derive(Clone, Default)]
pub struct AuthListeners {
    next_id: Rc<Cell<u64>>,
    entries: Rc<RefCell<Vec<(u64, AuthCallback)>>>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, callback: AuthCallback) -> AuthSubscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, callback));

        let entries = Rc::downgrade(&self.entries);
        AuthSubscription::new(move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Entrega el evento a todos los listeners registrados
    pub fn emit(&self, event: AuthEvent) {
        // Copia para que un callback pueda desuscribirse durante el emit
        let callbacks: Vec<AuthCallback> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback(event.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
