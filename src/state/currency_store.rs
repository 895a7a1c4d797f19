// ============================================================================
// CURRENCY STORE - Moneda compartida por toda la aplicación
// ============================================================================
// La crea la raíz de la aplicación y se inyecta en cada vista que la consume.
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::Currency;
use crate::state::reactivity::ReactiveState;

/// Forma guardada en localStorage: `{"state":{"currency":"USD"},"version":0}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCurrency {
    pub state: PersistedCurrencyState,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedCurrencyState {
    pub currency: Currency,
}

impl PersistedCurrency {
    pub fn new(currency: Currency) -> Self {
        Self {
            state: PersistedCurrencyState { currency },
            version: 0,
        }
    }

    pub fn currency(&self) -> Currency {
        self.state.currency
    }
}

#[derive(Clone)]
pub struct CurrencyStore {
    inner: ReactiveState<Currency>,
}

impl CurrencyStore {
    pub fn new(initial: Currency) -> Self {
        Self {
            inner: ReactiveState::new(initial),
        }
    }

    pub fn currency(&self) -> Currency {
        self.inner.get()
    }

    /// Devuelve `true` si el valor cambió
    pub fn set_currency(&self, currency: Currency) -> bool {
        self.inner.set(currency)
    }

    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(Currency) + 'static,
    {
        self.inner.subscribe(move |c| callback(*c))
    }

    pub fn unsubscribe(&self, id: u64) {
        self.inner.unsubscribe(id);
    }
}

impl Default for CurrencyStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}
