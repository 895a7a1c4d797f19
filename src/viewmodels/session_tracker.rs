// ============================================================================
// SESSION TRACKER - Ciclo de vida de la sesión mientras la barra está montada
// ============================================================================
// - activate(): fetch inicial + suscripción al stream de auth
// - timer de refresh `refresh_margin` segundos antes de expires_at
// - deactivate(): cancela timer y suscripción (un solo punto de teardown)
//
// Cada resolución de identidad toma un epoch monotónico; un lookup que termina
// tarde solo se aplica si su epoch sigue siendo el último.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::models::{AuthEvent, AuthUser, Currency, Identity, Role, Session, UserIdentity};
use crate::services::{AuthSubscription, TimerHandle};
use crate::state::NavState;
use crate::viewmodels::NavServices;

/// Máximo aceptado por `setTimeout` (2^31 - 1 ms)
const MAX_TIMER_MS: i64 = i32::MAX as i64;

/// Milisegundos hasta el refresh: `margin_secs` antes de expirar, 0 si ya estamos dentro
pub fn refresh_delay_ms(expires_at: i64, now: i64, margin_secs: i64) -> u32 {
    let secs = (expires_at - now - margin_secs).max(0);
    secs.saturating_mul(1000).min(MAX_TIMER_MS) as u32
}

struct TrackerInner {
    services: NavServices,
    state: NavState,
    refresh_margin_secs: i64,
    mounted: Cell<bool>,
    epoch: Cell<u64>,
    refresh_timer: RefCell<Option<Box<dyn TimerHandle>>>,
    subscription: RefCell<Option<AuthSubscription>>,
}

#[derive(Clone)]
pub struct SessionTracker {
    inner: Rc<TrackerInner>,
}

impl SessionTracker {
    pub fn new(state: NavState, services: NavServices, refresh_margin_secs: i64) -> Self {
        Self {
            inner: Rc::new(TrackerInner {
                services,
                state,
                refresh_margin_secs,
                mounted: Cell::new(false),
                epoch: Cell::new(0),
                refresh_timer: RefCell::new(None),
                subscription: RefCell::new(None),
            }),
        }
    }

    fn from_weak(weak: &Weak<TrackerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn is_active(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.inner.refresh_timer.borrow().is_some()
    }

    /// Arranca el fetch inicial y la suscripción al stream de auth
    pub fn activate(&self) {
        if self.is_active() {
            log::warn!("⚠️ SessionTracker ya estaba activo, ignorando activate()");
            return;
        }
        self.inner.mounted.set(true);
        log::info!("🔐 SessionTracker activado");

        let tracker = self.clone();
        self.inner.services.spawn(async move { tracker.fetch_session().await });

        let weak = Rc::downgrade(&self.inner);
        let subscription = self
            .inner
            .services
            .auth
            .on_auth_state_change(Rc::new(move |event: AuthEvent| {
                let Some(tracker) = Self::from_weak(&weak) else {
                    return;
                };
                if !tracker.is_active() {
                    return;
                }
                let services = tracker.inner.services.clone();
                services.spawn(async move { tracker.handle_auth_event(event).await });
            }));
        *self.inner.subscription.borrow_mut() = Some(subscription);
    }

    /// Teardown: cancela el timer de refresh y libera la suscripción
    pub fn deactivate(&self) {
        let was_mounted = self.inner.mounted.replace(false);
        let timer = self.inner.refresh_timer.borrow_mut().take();
        let subscription = self.inner.subscription.borrow_mut().take();
        drop(timer);
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        if was_mounted {
            log::info!("🔌 SessionTracker desactivado");
        }
    }

    fn next_epoch(&self) -> u64 {
        let epoch = self.inner.epoch.get() + 1;
        self.inner.epoch.set(epoch);
        epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.is_active() && self.inner.epoch.get() == epoch
    }

    fn is_signed_in_as(&self, user_id: &str) -> bool {
        self.is_active() && self.inner.state.user_id().as_deref() == Some(user_id)
    }

    fn finish_loading(&self) {
        if self.is_active() {
            self.inner.state.finish_loading();
        }
    }

    /// Secuencia completa: sesión, identidad, preferencia de moneda y timer
    pub async fn fetch_session(&self) {
        let epoch = self.next_epoch();

        let session = match self.inner.services.auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                log::error!("❌ No se pudo obtener la sesión: {}", e);
                self.finish_loading();
                return;
            }
        };

        match session {
            Some(session) => {
                self.resolve_identity(epoch, &session.user).await;
                self.load_currency_preference(&session.user.id).await;
                self.schedule_refresh(&session);
            }
            None => {
                if self.is_current(epoch) {
                    self.inner.state.set_identity(Identity::Anonymous);
                }
            }
        }

        self.finish_loading();
    }

    /// Evento del stream: solo identidad y rol (sin moneda ni timer)
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        let epoch = self.next_epoch();
        log::info!("🔔 Evento de auth: {:?}", event.kind);

        match event.session {
            Some(session) => self.resolve_identity(epoch, &session.user).await,
            None => {
                if self.is_current(epoch) {
                    self.inner.state.set_identity(Identity::Anonymous);
                }
            }
        }

        self.finish_loading();
    }

    async fn resolve_identity(&self, epoch: u64, user: &AuthUser) {
        if !self.is_current(epoch) {
            return;
        }

        // Mismo usuario: conservar nombre y rol hasta tener el lookup nuevo
        let base = match self.inner.state.identity() {
            Identity::Authenticated(existing) if existing.id == user.id => UserIdentity {
                email: user.email.clone().unwrap_or_default(),
                ..existing
            },
            _ => UserIdentity::from_user(user),
        };
        self.inner.state.set_identity(Identity::Authenticated(base.clone()));

        let profile = match self.inner.services.store.fetch_profile(&user.id).await {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                log::warn!("⚠️ No se pudo leer el perfil de {}: {}", user.id, e);
                Default::default()
            }
        };

        if !self.is_current(epoch) {
            log::debug!("⏭️ Perfil de {} descartado: llegó un evento más reciente", user.id);
            return;
        }

        let resolved = UserIdentity {
            full_name: profile.full_name.filter(|name| !name.trim().is_empty()),
            role: profile.role.as_deref().map(Role::from_db),
            ..base
        };
        self.inner.state.set_identity(Identity::Authenticated(resolved));
    }

    /// Lookup best-effort; cualquier fallo deja la moneda actual
    async fn load_currency_preference(&self, user_id: &str) {
        match self.inner.services.store.fetch_currency_preference(user_id).await {
            Ok(Some(code)) => match code.parse::<Currency>() {
                Ok(currency) => {
                    if self.is_signed_in_as(user_id) {
                        log::info!("💱 Moneda preferida de {}: {}", user_id, currency);
                        self.inner.state.currency_store().set_currency(currency);
                    }
                }
                Err(e) => log::warn!("⚠️ Preferencia de moneda ignorada: {}", e),
            },
            Ok(None) => log::info!(
                "ℹ️ {} no tiene preferencia de moneda, se mantiene la actual",
                user_id
            ),
            Err(e) if e.is_expected_absence() => {
                log::info!("ℹ️ Preferencias no disponibles ({}), moneda por defecto", e)
            }
            Err(e) => log::warn!("⚠️ Error leyendo preferencias de moneda: {}", e),
        }
    }

    fn schedule_refresh(&self, session: &Session) {
        if !self.is_signed_in_as(&session.user.id) {
            return;
        }
        let Some(expires_at) = session.expires_at else {
            return;
        };

        let now = (self.inner.services.clock)();
        let delay = refresh_delay_ms(expires_at, now, self.inner.refresh_margin_secs);
        log::info!("⏰ Refresh de sesión programado en {} s", delay / 1000);

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.services.scheduler.schedule(
            delay,
            Box::new(move || {
                let Some(tracker) = Self::from_weak(&weak) else {
                    return;
                };
                if !tracker.is_active() {
                    return;
                }
                let services = tracker.inner.services.clone();
                services.spawn(async move { tracker.refresh_and_refetch().await });
            }),
        );

        // Reemplazar cancela el timer anterior
        let previous = self.inner.refresh_timer.borrow_mut().replace(handle);
        drop(previous);
    }

    async fn refresh_and_refetch(&self) {
        log::info!("🔄 Refrescando sesión antes de que expire...");
        if let Err(e) = self.inner.services.auth.refresh_session().await {
            log::warn!("⚠️ Falló el refresh de la sesión: {}", e);
        }
        if self.is_active() {
            self.fetch_session().await;
        }
    }
}
