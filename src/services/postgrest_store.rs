// ============================================================================
// POSTGREST STORE - Tablas `users` y `user_preferences` (SOLO HTTP)
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Deserialize;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::{CurrencyPreference, CurrencyPreferenceUpdate, UserProfile};
use crate::services::profile_store::{ProfileStore, StoreError};
use crate::utils::{
    PGRST_NO_ROWS, PGRST_TABLE_NOT_IN_CACHE, PG_UNDEFINED_TABLE, TABLE_USERS,
    TABLE_USER_PREFERENCES,
};

#[derive(Debug, Deserialize, Default)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Clasifica una respuesta de error de PostgREST
pub(crate) fn classify_error(status: u16, table: &str, body: &str) -> StoreError {
    let parsed: PostgrestErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_default();
    let message = parsed.message.unwrap_or_else(|| body.trim().to_string());

    match code.as_str() {
        PGRST_NO_ROWS => StoreError::NoRows,
        PGRST_TABLE_NOT_IN_CACHE | PG_UNDEFINED_TABLE => {
            StoreError::TableMissing(table.to_string())
        }
        "" if status == 404 => StoreError::TableMissing(table.to_string()),
        _ => StoreError::Backend {
            code: if code.is_empty() { format!("HTTP {}", status) } else { code },
            message,
        },
    }
}

/// Token bearer actual (access token de la sesión o anon key)
pub type TokenSource = Rc<dyn Fn() -> String>;

pub struct PostgrestStore {
    rest_url: String,
    anon_key: String,
    token: TokenSource,
}

impl PostgrestStore {
    pub fn new(config: &AppConfig, token: TokenSource) -> Self {
        Self {
            rest_url: format!("{}/rest/v1", config.supabase_url),
            anon_key: config.supabase_anon_key.clone(),
            token,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .header("Authorization", &format!("Bearer {}", (self.token)()))
    }

    async fn send(&self, table: &str, request: Request) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status, table, &body))
    }

    /// GET con filtro `eq` que devuelve como mucho una fila
    async fn select_one<T: for<'de> Deserialize<'de>>(
        &self,
        table: &str,
        columns: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<T>, StoreError> {
        let filter = format!("eq.{}", value);
        let request = self
            .authorized(Request::get(&self.table_url(table)))
            .query([("select", columns), (key, filter.as_str()), ("limit", "1")])
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = self.send(table, request).await?;
        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait(?Send)]
impl ProfileStore for PostgrestStore {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.select_one::<UserProfile>(TABLE_USERS, "role,full_name", "id", user_id)
            .await
    }

    async fn fetch_currency_preference(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let row = self
            .select_one::<CurrencyPreference>(
                TABLE_USER_PREFERENCES,
                "user_id,currency_code",
                "user_id",
                user_id,
            )
            .await?;
        Ok(row.map(|r| r.currency_code))
    }

    async fn update_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError> {
        let filter = format!("eq.{}", user_id);
        let request = self
            .authorized(Request::patch(&self.table_url(TABLE_USER_PREFERENCES)))
            .query([("user_id", filter.as_str())])
            // Pedimos las filas afectadas para detectar que no había ninguna
            .header("Prefer", "return=representation")
            .json(&CurrencyPreferenceUpdate { currency_code })
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let response = self.send(TABLE_USER_PREFERENCES, request).await?;
        let updated = response
            .json::<Vec<CurrencyPreference>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        if updated.is_empty() {
            return Err(StoreError::NoRows);
        }
        Ok(())
    }

    async fn insert_currency_preference(
        &self,
        user_id: &str,
        currency_code: &str,
    ) -> Result<(), StoreError> {
        let row = CurrencyPreference {
            user_id: user_id.to_string(),
            currency_code: currency_code.to_string(),
        };
        let request = self
            .authorized(Request::post(&self.table_url(TABLE_USER_PREFERENCES)))
            .header("Prefer", "return=minimal")
            .json(&row)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        self.send(TABLE_USER_PREFERENCES, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_miss_is_no_rows() {
        let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        assert_eq!(classify_error(406, "user_preferences", body), StoreError::NoRows);
    }

    #[test]
    fn missing_table_codes_are_table_missing() {
        let old = r#"{"code":"42P01","message":"relation \"public.user_preferences\" does not exist"}"#;
        let new = r#"{"code":"PGRST205","message":"Could not find the table 'public.user_preferences' in the schema cache"}"#;
        let expected = StoreError::TableMissing("user_preferences".to_string());
        assert_eq!(classify_error(404, "user_preferences", old), expected);
        assert_eq!(classify_error(404, "user_preferences", new), expected);
        assert_eq!(classify_error(404, "user_preferences", "Not Found"), expected);
        assert!(expected.is_expected_absence());
    }

    #[test]
    fn other_failures_are_backend_errors() {
        let body = r#"{"code":"42501","message":"permission denied for table users"}"#;
        assert_eq!(
            classify_error(403, "users", body),
            StoreError::Backend {
                code: "42501".to_string(),
                message: "permission denied for table users".to_string(),
            }
        );
        let err = classify_error(502, "users", "Bad Gateway");
        assert_eq!(
            err,
            StoreError::Backend {
                code: "HTTP 502".to_string(),
                message: "Bad Gateway".to_string(),
            }
        );
        assert!(!err.is_expected_absence());
    }
}
