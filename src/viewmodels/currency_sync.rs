// ============================================================================
// CURRENCY SYNC - Selección de moneda + persistencia best-effort
// ============================================================================

use crate::models::Currency;
use crate::services::StoreError;
use crate::state::NavState;
use crate::viewmodels::NavServices;

/// Resultado de intentar guardar la preferencia remota
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Updated,
    Inserted,
    /// El almacén de preferencias no existe
    Skipped,
    Failed(StoreError),
}

#[derive(Clone)]
pub struct CurrencySync {
    state: NavState,
    services: NavServices,
}

impl CurrencySync {
    pub fn new(state: NavState, services: NavServices) -> Self {
        Self { state, services }
    }

    /// Aplica la moneda al instante y, si hay usuario, la guarda en segundo plano
    pub fn change_currency(&self, currency: Currency) {
        self.state.currency_store().set_currency(currency);

        let Some(user_id) = self.state.user_id() else {
            return;
        };
        let this = self.clone();
        self.services.spawn(async move {
            this.persist(&user_id, currency).await;
        });
    }

    /// Update; si no hay fila, insert. Sin reintentos.
    pub async fn persist(&self, user_id: &str, currency: Currency) -> PersistOutcome {
        let store = &self.services.store;
        let code = currency.code();

        let outcome = match store.update_currency_preference(user_id, code).await {
            Ok(()) => PersistOutcome::Updated,
            Err(StoreError::NoRows) => {
                log::info!("ℹ️ {} sin preferencia guardada, creando registro", user_id);
                match store.insert_currency_preference(user_id, code).await {
                    Ok(()) => PersistOutcome::Inserted,
                    Err(StoreError::TableMissing(_)) => PersistOutcome::Skipped,
                    Err(e) => PersistOutcome::Failed(e),
                }
            }
            Err(StoreError::TableMissing(_)) => PersistOutcome::Skipped,
            Err(e) => PersistOutcome::Failed(e),
        };

        match &outcome {
            PersistOutcome::Updated | PersistOutcome::Inserted => {
                log::info!("💾 Moneda {} guardada para {}", code, user_id)
            }
            PersistOutcome::Skipped => {
                log::info!("ℹ️ Tabla de preferencias no disponible, moneda no persistida")
            }
            PersistOutcome::Failed(e) => log::warn!("⚠️ Error guardando la moneda: {}", e),
        }
        outcome
    }
}
