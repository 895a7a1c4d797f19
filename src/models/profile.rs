use serde::{Deserialize, Serialize};

/// Fila de la tabla `users` (solo lectura desde la barra)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Fila de la tabla `user_preferences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyPreference {
    pub user_id: String,
    pub currency_code: String,
}

/// Cuerpo del PATCH sobre `user_preferences`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyPreferenceUpdate<'a> {
    pub currency_code: &'a str,
}
