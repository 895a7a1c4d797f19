// ============================================================================
// EVENT HANDLING - Sistema de eventos
// ============================================================================
// GESTIÓN DE MEMORY LEAKS:
// - Listeners en elementos del DOM: sus closures viven en un EventHandlers que
//   la app reemplaza en cada render. Nunca closure.forget(): el closure de Rust
//   (y todo lo que captura) no se libera aunque el elemento desaparezca.
// - Listeners globales (window/document): usar ScopedListener, que guarda el
//   closure y lo desregistra en Drop.
// ============================================================================

use std::any::Any;
use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, MouseEvent};

/// Listener global con ciclo de vida explícito
pub struct ScopedListener {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ScopedListener {
    pub fn new<F>(
        target: &EventTarget,
        event_type: &'static str,
        handler: F,
    ) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event_type,
            closure,
        })
    }

    /// Listener sobre `window`
    pub fn on_window<F>(event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        Self::new(window.as_ref(), event_type, handler)
    }

    /// Listener sobre `document`
    pub fn on_document<F>(event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let document = crate::dom::document().ok_or_else(|| JsValue::from_str("No document"))?;
        Self::new(document.as_ref(), event_type, handler)
    }
}

impl Drop for ScopedListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

/// Closures de los handlers registrados en un render.
/// Se liberan al hacer drop: se guardan mientras sus elementos sigan en el DOM
/// y se reemplazan en el siguiente render.
#[derive(Default)]
pub struct EventHandlers {
    kept: Vec<Box<dyn Any>>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mantiene vivo `value` hasta el drop (o `clear`) de este contenedor
    pub fn keep<T: 'static>(&mut self, value: T) {
        self.kept.push(Box::new(value));
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn clear(&mut self) {
        self.kept.clear();
    }

    /// Click handler ligado a la vida de este contenedor
    pub fn on_click<F>(&mut self, element: &Element, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(MouseEvent) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
        element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        self.keep(closure);
        Ok(())
    }

    /// `change` en un `<select>`: entrega el valor seleccionado
    pub fn on_select_change<F>(&mut self, element: &Element, mut handler: F) -> Result<(), JsValue>
    where
        F: FnMut(String) + 'static,
    {
        let closure = Closure::wrap(Box::new(move |e: Event| {
            if let Some(select) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            {
                handler(select.value());
            }
        }) as Box<dyn FnMut(Event)>);
        element.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        self.keep(closure);
        Ok(())
    }
}
