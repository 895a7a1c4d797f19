// ============================================================================
// APP - Raíz de la barra de navegación (cableado de servicios + render)
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Element, Event};

use crate::config::CONFIG;
use crate::dom::{
    append_child, contains_target, get_element_by_id, set_inner_html, window, EventHandlers,
    ScopedListener,
};
use crate::models::Currency;
use crate::services::{
    browser_spawner, system_clock, BrowserRouter, BrowserScheduler, PostgrestStore, SupabaseAuth,
};
use crate::state::{CurrencyStore, NavState, PersistedCurrency};
use crate::utils::{
    load_from_storage, save_to_storage, CURRENCY_STORAGE_KEY, EVENT_CURRENCY_CHANGE,
};
use crate::viewmodels::{NavServices, NavigationViewModel};
use crate::views::{render_navigation, NavModel, MOBILE_MENU_ID, MOBILE_TOGGLE_ID};

pub struct NavigationApp {
    vm: NavigationViewModel,
    auth: SupabaseAuth,
    root: Element,
    currency_subscription: u64,
    render_scheduled: Rc<Cell<bool>>,
    /// Closures de los elementos del render actual
    handlers: RefCell<EventHandlers>,
    popstate: Option<ScopedListener>,
    external_currency: Option<ScopedListener>,
    /// Solo existe mientras el menú móvil está abierto
    outside_click: RefCell<Option<ScopedListener>>,
}

impl NavigationApp {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id(&CONFIG.mount_element_id).ok_or_else(|| {
            JsValue::from_str(&format!("No #{} element found", CONFIG.mount_element_id))
        })?;

        let currency = CurrencyStore::new(load_initial_currency());
        let currency_subscription = currency.subscribe(|c| {
            if let Err(e) = save_to_storage(CURRENCY_STORAGE_KEY, &PersistedCurrency::new(c)) {
                log::warn!("⚠️ No se pudo guardar la moneda: {}", e);
            }
            if let Err(e) = broadcast_currency(c) {
                log::warn!("⚠️ Error emitiendo {}: {:?}", EVENT_CURRENCY_CHANGE, e);
            }
        });

        let clock = system_clock();
        let auth = SupabaseAuth::new(&CONFIG, clock.clone());
        let token_source = {
            let auth = auth.clone();
            Rc::new(move || auth.bearer_token())
        };

        let services = NavServices {
            auth: Rc::new(auth.clone()),
            store: Rc::new(PostgrestStore::new(&CONFIG, token_source)),
            router: Rc::new(BrowserRouter),
            scheduler: Rc::new(BrowserScheduler),
            spawner: browser_spawner(),
            clock,
        };

        let state = NavState::new(currency.clone());
        let vm = NavigationViewModel::new(state.clone(), services, CONFIG.refresh_margin_secs);

        // Batch de updates: un solo render por tick
        let render_scheduled = Rc::new(Cell::new(false));
        {
            let render_scheduled = render_scheduled.clone();
            state.subscribe_to_changes(move || {
                if render_scheduled.replace(true) {
                    return;
                }
                let render_scheduled = render_scheduled.clone();
                Timeout::new(0, move || {
                    render_scheduled.set(false);
                    crate::rerender_navigation();
                })
                .forget();
            });
        }

        let popstate = {
            let vm = vm.clone();
            ScopedListener::on_window("popstate", move |_e| vm.history_navigated())?
        };

        let external_currency = ScopedListener::on_window(EVENT_CURRENCY_CHANGE, move |e: Event| {
            let code = e
                .dyn_ref::<CustomEvent>()
                .and_then(|ce| ce.detail().as_string());
            match code.as_deref().map(str::parse::<Currency>) {
                Some(Ok(c)) => {
                    currency.set_currency(c);
                }
                Some(Err(err)) => log::warn!("⚠️ {}", err),
                None => {}
            }
        })?;

        Ok(Self {
            vm,
            auth,
            root,
            currency_subscription,
            render_scheduled,
            handlers: RefCell::new(EventHandlers::new()),
            popstate: Some(popstate),
            external_currency: Some(external_currency),
            outside_click: RefCell::new(None),
        })
    }

    /// Activa el seguimiento de sesión y pinta el primer frame (loading)
    pub fn mount(&self) -> Result<(), JsValue> {
        self.auth.start_listening();
        self.vm.mount();
        self.render()
    }

    pub fn render(&self) -> Result<(), JsValue> {
        let model = NavModel::from_state(self.vm.state());
        let mut handlers = EventHandlers::new();
        let view = render_navigation(&model, &self.vm, &mut handlers)?;

        set_inner_html(&self.root, "");
        append_child(&self.root, &view)?;
        // Los handlers del render anterior se liberan aquí
        *self.handlers.borrow_mut() = handlers;

        self.sync_outside_click(model.mobile_menu_open)
    }

    pub fn currency(&self) -> Currency {
        self.vm.state().currency()
    }

    pub fn select_currency(&self, code: &str) {
        self.vm.select_currency(code);
    }

    /// Teardown único: timer, suscripción de auth y listeners globales
    pub fn unmount(&mut self) {
        self.vm.unmount();
        self.auth.stop_listening();
        self.popstate = None;
        self.external_currency = None;
        self.outside_click.borrow_mut().take();
        self.vm.state().clear_subscribers();
        self.vm.state().detach_currency();
        self.vm.state().currency_store().unsubscribe(self.currency_subscription);
        self.render_scheduled.set(false);
        set_inner_html(&self.root, "");
        self.handlers.borrow_mut().clear();
        log::info!("🧹 Navegación desmontada");
    }

    fn sync_outside_click(&self, mobile_menu_open: bool) -> Result<(), JsValue> {
        let mut slot = self.outside_click.borrow_mut();
        if !mobile_menu_open {
            slot.take();
            return Ok(());
        }
        if slot.is_some() {
            return Ok(());
        }

        let vm = self.vm.clone();
        let listener = ScopedListener::on_document("mousedown", move |e: Event| {
            // El botón hamburguesa cuenta como "dentro": su click ya alterna el menú
            let inside = [MOBILE_MENU_ID, MOBILE_TOGGLE_ID]
                .iter()
                .filter_map(|id| get_element_by_id(id))
                .any(|el| contains_target(&el, e.target()));
            vm.pointer_down(inside);
        })?;
        *slot = Some(listener);
        Ok(())
    }
}

fn load_initial_currency() -> Currency {
    load_from_storage::<PersistedCurrency>(CURRENCY_STORAGE_KEY)
        .map(|p| p.currency())
        .unwrap_or(CONFIG.default_currency)
}

/// Avisa al resto de la página del cambio de moneda
fn broadcast_currency(currency: Currency) -> Result<(), JsValue> {
    let window = window().ok_or_else(|| JsValue::from_str("No window"))?;
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(currency.code()));
    let event = CustomEvent::new_with_event_init_dict(EVENT_CURRENCY_CHANGE, &init)?;
    window.dispatch_event(&event)?;
    Ok(())
}
