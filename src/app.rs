// ============================================================================
// APP - Ciclo de vida de la vista de mapa
// ============================================================================
// enter(): crea el mapa, carga los límites y monta el panel de capas
// leave(): cancela peticiones en curso y libera el mapa
// Cada carga de capa lleva su AbortController; desmarcar la capa la cancela.
// Los listeners del panel viven en la sesión y se sueltan al desmontarla.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::AbortController;

use crate::config::AppConfig;
use crate::maps::web::LeafletMapRenderer;
use crate::models::PointLayerConfig;
use crate::services::ApiClient;
use crate::state::InFlightLoads;
use crate::utils::prefers_dark_mode;
use crate::viewmodels::{LoadOutcome, MapViewModel};
use crate::views::{render_layer_control, LayerControl};

type Session = RefCell<MapViewModel<LeafletMapRenderer>>;

type InFlight = Rc<RefCell<InFlightLoads<AbortController>>>;

pub struct App {
    config: AppConfig,
    api: ApiClient,
    session: Option<Rc<Session>>,
    in_flight: InFlight,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            api: ApiClient::new(),
            session: None,
            in_flight: Rc::new(RefCell::new(InFlightLoads::new())),
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Entrada a la vista: crear mapa, límites y panel de capas
    pub fn enter(&mut self) -> Result<(), JsValue> {
        if self.session.is_some() {
            log::warn!("⚠️ [APP] enter() sin leave() previo, liberando mapa anterior");
            self.leave();
        }

        let is_dark = prefers_dark_mode();
        let renderer = LeafletMapRenderer::mount(&self.config.map_config, &self.config.marker_icons)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = Rc::new(RefCell::new(MapViewModel::new(
            renderer,
            self.config.boundary_config.style.clone(),
            is_dark,
            self.config.refetch_on_enable,
        )));

        self.load_boundaries(Rc::downgrade(&session));
        self.mount_layer_control(&session)?;
        self.session = Some(session);

        log::info!("✅ [APP] Vista de mapa lista");
        Ok(())
    }

    /// Salida de la vista: cancelar cargas y liberar el mapa
    pub fn leave(&mut self) {
        for (layer, controller) in self.in_flight.borrow_mut().drain() {
            log::info!("🛑 [APP] Cancelando carga de {}", layer);
            controller.abort();
        }

        if let Some(session) = self.session.take() {
            session.borrow_mut().dispose();
        }
    }

    fn load_boundaries(&self, session: Weak<Session>) {
        let api = self.api.clone();
        let path = self.config.boundary_config.path.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = api.fetch_boundaries(&path).await;
            match session.upgrade() {
                Some(session) => session.borrow_mut().show_boundaries(result),
                None => log::info!("⏭️ [BOUNDARY] Vista cerrada antes de recibir {}", path),
            }
        });
    }

    fn mount_layer_control(&self, session: &Rc<Session>) -> Result<(), JsValue> {
        let weak = Rc::downgrade(session);
        let in_flight = self.in_flight.clone();
        let api = self.api.clone();
        let config = self.config.clone();

        let on_toggle: Rc<dyn Fn(&str, bool)> = Rc::new(move |name: &str, checked: bool| {
            let Some(layer) = config.point_layer(name) else {
                log::warn!("⚠️ [CONTROL] Capa desconocida: {}", name);
                return;
            };
            if checked {
                start_layer_load(&weak, &in_flight, &api, layer);
            } else {
                stop_layer_load(&weak, &in_flight, &layer.name);
            }
        });

        let LayerControl { element, listeners } = render_layer_control(&self.config.point_layers, on_toggle)?;

        let mut vm = session.borrow_mut();
        let mut mounted = false;
        vm.renderer_mut()
            .add_control(element, &self.config.map_config.control_position, |_container| {
                mounted = true;
            })
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        vm.keep_until_dispose(listeners);
        if mounted {
            vm.mark_control_ready();
        }
        Ok(())
    }
}

/// Checkbox marcado: activar la capa y pedir los datos si hace falta
fn start_layer_load(session: &Weak<Session>, in_flight: &InFlight, api: &ApiClient, layer: &PointLayerConfig) {
    let Some(vm) = session.upgrade() else {
        return;
    };

    let ticket = match vm.borrow_mut().enable_layer(&layer.name) {
        Ok(Some(ticket)) => ticket,
        Ok(None) => return,
        Err(e) => {
            log::error!("❌ [LAYER] No se pudo activar {}: {}", layer.name, e);
            return;
        }
    };

    let controller = AbortController::new().ok();
    let signal = controller.as_ref().map(|c| c.signal());
    if let Some(controller) = controller {
        let previous = in_flight.borrow_mut().start(&ticket, controller);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    let session = session.clone();
    let in_flight = in_flight.clone();
    let api = api.clone();
    let url = layer.url.clone();

    wasm_bindgen_futures::spawn_local(async move {
        let result = api.fetch_point_records(&url, signal.as_ref()).await;
        in_flight.borrow_mut().finish(&ticket);

        let Some(vm) = session.upgrade() else {
            return;
        };
        let outcome = vm.borrow_mut().complete_layer_load(&ticket, result);
        if let LoadOutcome::Failed(e) = outcome {
            log::error!("❌ Error loading markers from API ({}): {}", url, e);
        }
    });
}

/// Checkbox desmarcado: cancelar la petición en curso y ocultar el grupo
fn stop_layer_load(session: &Weak<Session>, in_flight: &InFlight, layer: &str) {
    let cancelled = in_flight.borrow_mut().cancel(layer);
    if let Some(controller) = cancelled {
        log::info!("🛑 [LAYER] Cancelando petición de {}", layer);
        controller.abort();
    }

    if let Some(vm) = session.upgrade() {
        vm.borrow_mut().disable_layer(layer);
    }
}
