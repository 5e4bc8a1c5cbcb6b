// ============================================================================
// EVENT HANDLING
// ============================================================================
// El EventListener es dueño del closure: mientras viva, el listener sigue
// registrado; al soltarlo se quita del elemento y se libera el closure.
// Los listeners del panel de capas se guardan en la sesión del mapa y se
// sueltan en dispose().
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlInputElement};

/// Listener registrado sobre un elemento; se desregistra en Drop
pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
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
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.closure.as_ref().unchecked_ref());
    }
}

/// Listener de "change" para un checkbox: recibe el nuevo estado `checked`
pub fn on_checkbox_change<F>(input: &HtmlInputElement, handler: F) -> Result<EventListener, JsValue>
where
    F: Fn(bool) + 'static,
{
    EventListener::new(input, "change", move |e: Event| {
        if let Some(input) = e
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        {
            handler(input.checked());
        }
    })
}
