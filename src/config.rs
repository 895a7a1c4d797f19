use serde::{Deserialize, Serialize};

use crate::models::Currency;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub environment: String,
    pub enable_logging: bool,
    pub default_currency: Currency,
    /// Segundos antes de `expires_at` en que se refresca la sesión
    pub refresh_margin_secs: i64,
    pub mount_element_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: String::new(),
            environment: "development".to_string(),
            enable_logging: true,
            default_currency: Currency::Usd,
            refresh_margin_secs: 30 * 60,
            mount_element_id: "navigation".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            supabase_url: option_env!("SUPABASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.supabase_url),
            supabase_anon_key: option_env!("SUPABASE_ANON_KEY")
                .unwrap_or("").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            default_currency: option_env!("DEFAULT_CURRENCY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_currency),
            refresh_margin_secs: option_env!("SESSION_REFRESH_MARGIN_SECS")
                .unwrap_or("1800").parse().unwrap_or(defaults.refresh_margin_secs),
            mount_element_id: option_env!("NAV_MOUNT_ID")
                .unwrap_or("navigation").to_string(),
        }
    }

    /// Referencia del proyecto Supabase (subdominio de la URL)
    pub fn project_ref(&self) -> &str {
        let host = self
            .supabase_url
            .split("://")
            .nth(1)
            .unwrap_or(self.supabase_url.as_str());
        host.split(['.', ':', '/']).next().unwrap_or(host)
    }

    /// Clave de localStorage donde se guarda la sesión
    pub fn session_storage_key(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_uses_project_ref() {
        let config = AppConfig {
            supabase_url: "https://abcd1234.supabase.co".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.project_ref(), "abcd1234");
        assert_eq!(config.session_storage_key(), "sb-abcd1234-auth-token");
    }

    #[test]
    fn local_url_falls_back_to_host() {
        let config = AppConfig::default();
        assert_eq!(config.project_ref(), "localhost");
        assert_eq!(config.refresh_margin_secs, 1800);
    }
}
