// ============================================================================
// SUPABASE AUTH - Cliente GoTrue (SOLO comunicación + sesión local)
// ============================================================================
// La sesión vive en localStorage bajo `sb-<ref>-auth-token`, igual que el
// cliente JS, para compartirla con el resto de páginas de la aplicación.
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;

use crate::config::AppConfig;
use crate::dom::ScopedListener;
use crate::models::{AuthEvent, AuthEventKind, Session};
use crate::services::auth_client::{
    initial_session, AuthCallback, AuthClient, AuthError, AuthListeners, AuthSubscription,
};
use crate::services::runtime::Clock;
use crate::utils::{load_from_storage, remove_from_storage, save_to_storage, EVENT_LOGGED_IN};

#[derive(Debug, Deserialize, Default)]
struct GoTrueError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extrae el mensaje legible de una respuesta de error de GoTrue
pub(crate) fn gotrue_error_message(body: &str) -> String {
    let parsed: GoTrueError = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Clone)]
pub struct SupabaseAuth {
    auth_url: String,
    anon_key: String,
    storage_key: String,
    clock: Clock,
    session: Rc<RefCell<Option<Session>>>,
    listeners: AuthListeners,
    window_listeners: Rc<RefCell<Vec<ScopedListener>>>,
}

impl SupabaseAuth {
    pub fn new(config: &AppConfig, clock: Clock) -> Self {
        Self {
            auth_url: format!("{}/auth/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
            storage_key: config.session_storage_key(),
            clock,
            session: Rc::new(RefCell::new(None)),
            listeners: AuthListeners::new(),
            window_listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Token para las peticiones PostgREST (anon key si no hay sesión)
    pub fn bearer_token(&self) -> String {
        self.session
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// Escuchar cambios de sesión hechos fuera de este cliente:
    /// otra pestaña (`storage`) o el login de esta misma página (`loggedIn`).
    /// Solo se registra una vez.
    pub fn start_listening(&self) {
        if !self.window_listeners.borrow().is_empty() {
            log::warn!("⚠️ SupabaseAuth: start_listening ya fue llamado, ignorando");
            return;
        }

        let mut registered = Vec::new();

        let storage_key = self.storage_key.clone();
        let this = self.clone();
        match ScopedListener::on_window("storage", move |e: web_sys::Event| {
            let key = e
                .dyn_ref::<web_sys::StorageEvent>()
                .and_then(|se| se.key());
            if key.as_deref() == Some(storage_key.as_str()) {
                this.reload_from_storage();
            }
        }) {
            Ok(listener) => registered.push(listener),
            Err(e) => log::error!("❌ Error registrando listener storage: {:?}", e),
        }

        let this = self.clone();
        match ScopedListener::on_window(EVENT_LOGGED_IN, move |_e| this.reload_from_storage()) {
            Ok(listener) => registered.push(listener),
            Err(e) => log::error!("❌ Error registrando listener loggedIn: {:?}", e),
        }

        *self.window_listeners.borrow_mut() = registered;
    }

    /// Libera los listeners de window
    pub fn stop_listening(&self) {
        self.window_listeners.borrow_mut().clear();
    }

    fn load_stored_session(&self) -> Option<Session> {
        load_from_storage::<Session>(&self.storage_key)
    }

    fn store_session(&self, session: Option<Session>) {
        match &session {
            Some(s) => {
                if let Err(e) = save_to_storage(&self.storage_key, s) {
                    log::warn!("⚠️ No se pudo guardar la sesión: {}", e);
                }
            }
            None => {
                if let Err(e) = remove_from_storage(&self.storage_key) {
                    log::warn!("⚠️ No se pudo borrar la sesión: {}", e);
                }
            }
        }
        *self.session.borrow_mut() = session;
    }

    fn reload_from_storage(&self) {
        let stored = self.load_stored_session();
        let previous_user = self.session.borrow().as_ref().map(|s| s.user.id.clone());
        let current_user = stored.as_ref().map(|s| s.user.id.clone());
        *self.session.borrow_mut() = stored.clone();

        let kind = match (previous_user, current_user) {
            (_, None) => AuthEventKind::SignedOut,
            (Some(prev), Some(cur)) if prev == cur => AuthEventKind::TokenRefreshed,
            _ => AuthEventKind::SignedIn,
        };
        log::info!("🔄 Sesión recargada desde storage: {:?}", kind);
        self.listeners.emit(AuthEvent::new(kind, stored));
    }

    fn current_session(&self) -> Option<Session> {
        if self.session.borrow().is_none() {
            let stored = self.load_stored_session();
            *self.session.borrow_mut() = stored;
        }
        self.session.borrow().clone()
    }

    async fn error_from(response: Response) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AuthError::Api {
            status,
            message: gotrue_error_message(&body),
        }
    }
}

#[async_trait(?Send)]
impl AuthClient for SupabaseAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };

        if session.is_expired((self.clock)()) {
            log::info!("⏰ Sesión expirada, refrescando antes de devolverla...");
            return self.refresh_session().await;
        }

        Ok(Some(session))
    }

    async fn refresh_session(&self) -> Result<Option<Session>, AuthError> {
        let refresh_token = self
            .current_session()
            .and_then(|s| s.refresh_token);
        let Some(refresh_token) = refresh_token else {
            log::info!("ℹ️ Sin refresh token, nada que refrescar");
            return Ok(None);
        };

        let url = format!("{}/token", self.auth_url);
        let response = Request::post(&url)
            .query([("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .map_err(|e| AuthError::Decode(e.to_string()))?
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.ok() {
            let error = Self::error_from(response).await;
            // Refresh token inválido: la sesión ya no sirve
            if matches!(error, AuthError::Api { status, .. } if status == 400 || status == 401) {
                log::warn!("⚠️ Refresh rechazado, cerrando sesión local: {}", error);
                self.store_session(None);
                self.listeners.emit(AuthEvent::new(AuthEventKind::SignedOut, None));
            }
            return Err(error);
        }

        let session = response
            .json::<Session>()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?
            .with_expiry_from((self.clock)());

        log::info!("✅ Sesión refrescada, expira en {:?}", session.expires_at);
        self.store_session(Some(session.clone()));
        self.listeners
            .emit(AuthEvent::new(AuthEventKind::TokenRefreshed, Some(session.clone())));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(());
        };

        let url = format!("{}/logout", self.auth_url);
        let result = match Request::post(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .send()
            .await
        {
            Ok(response) if response.ok() => Ok(()),
            // Token ya revocado o inexistente: la sesión ya no existe en el servidor
            Ok(response) if response.status() == 401 || response.status() == 404 => Ok(()),
            Ok(response) => Err(Self::error_from(response).await),
            Err(e) => Err(AuthError::Network(e.to_string())),
        };

        // La sesión local se elimina aunque falle la revocación remota
        self.store_session(None);
        self.listeners.emit(AuthEvent::new(AuthEventKind::SignedOut, None));

        if let Err(e) = &result {
            log::error!("❌ Error revocando la sesión en el servidor: {}", e);
        }
        result
    }

    fn on_auth_state_change(&self, callback: AuthCallback) -> AuthSubscription {
        let subscription = self.listeners.add(callback.clone());
        let stored = self.current_session();
        let session = initial_session(stored.clone(), (self.clock)());
        if stored.is_some() && session.is_none() {
            log::info!("⏰ Sesión guardada caducada, InitialSession sin sesión");
        }
        callback(AuthEvent::new(AuthEventKind::InitialSession, session));
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_gotrue_error_messages() {
        assert_eq!(
            gotrue_error_message(r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#),
            "Invalid Refresh Token"
        );
        assert_eq!(gotrue_error_message(r#"{"code":400,"msg":"bad jwt"}"#), "bad jwt");
        assert_eq!(gotrue_error_message("gateway timeout "), "gateway timeout");
    }
}
