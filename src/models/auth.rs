// ============================================================================
// AUTH MODELS - Sesión, usuario e identidad
// ============================================================================

use serde::{Deserialize, Serialize};

/// Usuario tal como lo devuelve GoTrue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Sesión autenticada (respuesta de `/auth/v1/token`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Timestamp unix (segundos) de expiración
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    /// Completa `expires_at` a partir de `expires_in` si el servidor no lo envió
    pub fn with_expiry_from(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| now_secs + secs);
        }
        self
    }

    pub fn is_expired(&self, now_secs: i64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now_secs)
    }
}

/// Rol del usuario en la tabla `users`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn from_db(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Identidad conocida de un usuario autenticado
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<Role>,
}

impl UserIdentity {
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone().unwrap_or_default(),
            full_name: None,
            role: None,
        }
    }

    /// Nombre completo si existe, si no el email
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Estado de identidad de la vista
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(UserIdentity),
}

impl Identity {
    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(user) => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user()
            .and_then(|u| u.role)
            .map(|r| r.is_admin())
            .unwrap_or(false)
    }
}

/// Tipo de evento del stream de cambios de auth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Evento entregado a los subscriptores de auth
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, session: Option<Session>) -> Self {
        Self { kind, session }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(full_name: Option<&str>, role: Option<Role>) -> UserIdentity {
        UserIdentity {
            id: "u-1".to_string(),
            email: "pilot@privateair.test".to_string(),
            full_name: full_name.map(str::to_string),
            role,
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        assert_eq!(identity(Some("Amelia Earhart"), None).display_name(), "Amelia Earhart");
        assert_eq!(identity(Some("  "), None).display_name(), "pilot@privateair.test");
        assert_eq!(identity(None, None).display_name(), "pilot@privateair.test");
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("ADMIN"), Role::Admin);
        assert_eq!(Role::from_db("customer"), Role::Member);

        assert!(Identity::Authenticated(identity(None, Some(Role::Admin))).is_admin());
        assert!(!Identity::Authenticated(identity(None, Some(Role::Member))).is_admin());
        assert!(!Identity::Authenticated(identity(None, None)).is_admin());
        assert!(!Identity::Anonymous.is_admin());
    }

    #[test]
    fn session_decodes_gotrue_payload() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": { "id": "abc", "email": "a@b.c", "aud": "authenticated" }
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        let session = session.with_expiry_from(1_000);
        assert_eq!(session.expires_at, Some(4_600));
        assert_eq!(session.user.email.as_deref(), Some("a@b.c"));
        assert!(!session.is_expired(4_599));
        assert!(session.is_expired(4_600));
    }
}
