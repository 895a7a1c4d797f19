// ============================================================================
// NAV STATE - Estado de la barra de navegación
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Currency, Identity};
use crate::state::currency_store::CurrencyStore;
use crate::state::menu_state::MenuState;

/// Estado de la vista; los clones comparten todo
#[derive(Clone)]
pub struct NavState {
    identity: Rc<RefCell<Identity>>,
    loading: Rc<RefCell<bool>>,
    menus: Rc<RefCell<MenuState>>,
    currency: CurrencyStore,
    currency_subscription: u64,

    // Reactivity: callbacks para notificar cambios
    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl NavState {
    pub fn new(currency: CurrencyStore) -> Self {
        let change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>> = Rc::new(RefCell::new(Vec::new()));

        // Cambios de moneda hechos por otros consumidores también re-renderizan
        let currency_subscription = {
            let subscribers = Rc::downgrade(&change_subscribers);
            currency.subscribe(move |_| {
                if let Some(subscribers) = subscribers.upgrade() {
                    notify(&subscribers);
                }
            })
        };

        Self {
            identity: Rc::new(RefCell::new(Identity::Anonymous)),
            loading: Rc::new(RefCell::new(true)),
            menus: Rc::new(RefCell::new(MenuState::default())),
            currency,
            currency_subscription,
            change_subscribers,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.identity.borrow().user_id().map(str::to_string)
    }

    /// Devuelve `true` si la identidad cambió
    pub fn set_identity(&self, identity: Identity) -> bool {
        {
            let mut current = self.identity.borrow_mut();
            if *current == identity {
                return false;
            }
            *current = identity;
        }
        self.notify_subscribers();
        true
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn finish_loading(&self) {
        let was_loading = std::mem::replace(&mut *self.loading.borrow_mut(), false);
        if was_loading {
            self.notify_subscribers();
        }
    }

    pub fn menus(&self) -> MenuState {
        *self.menus.borrow()
    }

    /// Aplica una transición del menú; notifica solo si cambió algo
    pub fn update_menus<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&mut MenuState) -> bool,
    {
        let changed = {
            let mut menus = self.menus.borrow_mut();
            transition(&mut *menus)
        };
        if changed {
            self.notify_subscribers();
        }
        changed
    }

    pub fn currency(&self) -> Currency {
        self.currency.currency()
    }

    pub fn currency_store(&self) -> &CurrencyStore {
        &self.currency
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Deja de observar la moneda compartida (la store sigue viva fuera de la vista)
    pub fn detach_currency(&self) {
        self.currency.unsubscribe(self.currency_subscription);
    }

    pub fn clear_subscribers(&self) {
        self.change_subscribers.borrow_mut().clear();
    }

    pub fn notify_subscribers(&self) {
        notify(&self.change_subscribers);
    }
}

fn notify(subscribers: &RefCell<Vec<Rc<dyn Fn()>>>) {
    let callbacks: Vec<Rc<dyn Fn()>> = subscribers.borrow().iter().cloned().collect();
    for callback in callbacks {
        callback();
    }
}
