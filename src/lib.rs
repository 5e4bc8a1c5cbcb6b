// ============================================================================
// SENSOR MAP PWA - Mapa de límites administrativos + capas de sensores (EWS, CCTV)
// ============================================================================
// Arquitectura MVVM:
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado de capas + lógica de carga (testeable sin navegador)
// - Maps: Trait MapRenderer + implementación Leaflet
// - Services: SOLO comunicación HTTP
// - State: Registro de capas con generaciones para cancelar cargas obsoletas
// - Models: Registros de puntos, configuración de capas, límites GeoJSON
// ============================================================================

// Fuera de wasm32 solo se compilan los módulos testeables; lo que únicamente
// usa la App del navegador queda sin usar en ese build.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code, unused_imports))]

mod config;
mod maps;
mod models;
mod state;
mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod services;
#[cfg(target_arch = "wasm32")]
mod utils;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_logger::Config;

    use crate::app::App;
    use crate::config::AppConfig;
    use crate::dom::get_element_by_id;

    // Instancia global de la App (una sola vista de mapa por página)
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let config = AppConfig::from_env();
        wasm_logger::init(Config::new(config.log_level()));
        log::info!(
            "🚀 Sensor Map PWA ({}) - {} capas de puntos",
            config.environment,
            config.point_layers.len()
        );

        let container_id = config.map_config.container_id.clone();
        APP.with(|cell| *cell.borrow_mut() = Some(App::new(config)));

        if get_element_by_id(&container_id).is_some() {
            view_did_enter()?;
        } else {
            log::warn!("⚠️ [MAIN] No existe #{}, esperando view_did_enter()", container_id);
        }

        // Listener global: se registra UNA VEZ en main(), forget() es seguro
        if let Some(win) = web_sys::window() {
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                view_will_leave();
            }) as Box<dyn FnMut(web_sys::Event)>);
            win.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Entrada a la vista: crea el mapa (libera el anterior si seguía vivo)
    #[wasm_bindgen]
    pub fn view_did_enter() -> Result<(), JsValue> {
        APP.with(|cell| match cell.borrow_mut().as_mut() {
            Some(app) => app.enter(),
            None => Err(JsValue::from_str("App no inicializada")),
        })
    }

    /// Salida de la vista: cancela peticiones y libera el mapa
    #[wasm_bindgen]
    pub fn view_will_leave() {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                if app.is_active() {
                    log::info!("👋 [MAIN] Saliendo de la vista de mapa");
                    app.leave();
                }
            }
        });
    }
}
