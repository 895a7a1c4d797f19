// ============================================================================
// PROFILE STORE - Contrato del almacén de perfiles y preferencias
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::models::UserProfile;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// Ninguna fila coincide (PGRST116 o update vacío)
    #[error("no matching rows")]
    NoRows,

    /// La tabla no existe en el esquema
    #[error("table not found: {0}")]
    TableMissing(String),

    #[error("backend error {code}: {message}")]
    Backend { code: String, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl StoreError {
    /// Ausencias esperadas, no se registran como error
    pub fn is_expected_absence(&self) -> bool {
        matches!(self, StoreError::NoRows | StoreError::TableMissing(_))
    }
}

/// Tablas `users` y `user_preferences`
#[async_trait(?Send)]
pub trait ProfileStore {
    /// Rol y nombre completo; 0..1 filas
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Código de moneda preferido; 0..1 filas
    async fn fetch_currency_preference(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    /// Devuelve `StoreError::NoRows` si el usuario aún no tiene fila
    async fn update_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError>;

    async fn insert_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError>;
}
