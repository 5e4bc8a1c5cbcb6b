// ============================================================================
// MAP VIEWMODEL - Sesión del mapa (capa de límites + capas de puntos)
// ============================================================================
// Toda la lógica de activación/desactivación de capas vive aquí y es
// independiente de Leaflet: el motor se inyecta como `MapRenderer`.
// Las peticiones HTTP las hace `App`; aquí solo se decide qué pedir y qué
// hacer con la respuesta.
// ============================================================================

use std::any::Any;
use std::collections::HashMap;

use geojson::GeoJson;

use crate::maps::traits::{MapError, MapRenderer};
use crate::models::{feature_count, BoundaryStyle, PointRecord};
use crate::state::{LayerRegistry, LoadTicket};
use crate::viewmodels::marker_viewmodel::prepare_markers;

/// Resultado de aplicar la respuesta de una carga
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Marcadores colocados y registros descartados
    Loaded { placed: usize, rejected: usize },
    /// La capa se desactivó o se recargó mientras tanto; respuesta ignorada
    Stale,
    /// Error de red o de parseo; el grupo queda vacío
    Failed(String),
}

pub struct MapViewModel<R: MapRenderer> {
    renderer: R,
    layers: LayerRegistry<R::Group>,
    marker_counts: HashMap<String, usize>,
    boundary_style: BoundaryStyle,
    prefers_dark_mode: bool,
    refetch_on_enable: bool,
    control_ready: bool,
    // listeners y callbacks de la plataforma; se sueltan en dispose()
    session_resources: Vec<Box<dyn Any>>,
    disposed: bool,
}

impl<R: MapRenderer> MapViewModel<R> {
    pub fn new(renderer: R, boundary_style: BoundaryStyle, prefers_dark_mode: bool, refetch_on_enable: bool) -> Self {
        log::info!(
            "🗺️ [MAP] Sesión creada (dark mode: {}, refetch: {})",
            prefers_dark_mode,
            refetch_on_enable
        );
        Self {
            renderer,
            layers: LayerRegistry::new(),
            marker_counts: HashMap::new(),
            boundary_style,
            prefers_dark_mode,
            refetch_on_enable,
            control_ready: false,
            session_resources: Vec::new(),
            disposed: false,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Acceso al renderer para montar controles propios de la plataforma
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn prefers_dark_mode(&self) -> bool {
        self.prefers_dark_mode
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// El panel de capas ya está montado en el mapa
    pub fn mark_control_ready(&mut self) {
        if self.disposed {
            return;
        }
        self.control_ready = true;
        log::info!("🎛️ [CONTROL] Panel de capas listo");
    }

    pub fn is_control_ready(&self) -> bool {
        self.control_ready
    }

    /// Mantener vivo un recurso de la sesión hasta dispose()
    pub fn keep_until_dispose<T: 'static>(&mut self, resource: T) {
        if self.disposed {
            return;
        }
        self.session_resources.push(Box::new(resource));
    }

    pub fn is_layer_enabled(&self, layer: &str) -> bool {
        self.layers.is_attached(layer)
    }

    pub fn is_layer_loading(&self, layer: &str) -> bool {
        self.layers.get(layer).map(|e| e.loading).unwrap_or(false)
    }

    /// Marcadores actualmente en el grupo de la capa
    pub fn marker_count(&self, layer: &str) -> usize {
        self.marker_counts.get(layer).copied().unwrap_or(0)
    }

    /// Aplicar el resultado de la carga del GeoJSON de límites
    pub fn show_boundaries(&mut self, result: Result<GeoJson, String>) {
        if self.disposed {
            log::warn!("⚠️ [BOUNDARY] Mapa ya desmontado, capa de límites ignorada");
            return;
        }

        let geojson = match result {
            Ok(geojson) => geojson,
            Err(e) => {
                log::error!("❌ [BOUNDARY] Error loading GeoJSON: {}", e);
                return;
            }
        };

        match self.renderer.add_boundary_overlay(&geojson, &self.boundary_style) {
            Ok(()) => log::info!("✅ [BOUNDARY] {} polígonos añadidos", feature_count(&geojson)),
            Err(e) => log::error!("❌ [BOUNDARY] Error renderizando límites: {}", e),
        }
    }

    /// Activar una capa de puntos.
    /// Devuelve un ticket si hay que pedir los datos a la API.
    pub fn enable_layer(&mut self, layer: &str) -> Result<Option<LoadTicket>, MapError> {
        if self.disposed {
            return Err(MapError::Disposed);
        }

        let renderer = &mut self.renderer;
        let (entry, created) = self
            .layers
            .ensure_group(layer, || renderer.create_marker_group(layer))?;

        if entry.attached {
            log::info!("ℹ️ [LAYER] {} ya está activa", layer);
            return Ok(None);
        }

        renderer.attach_group(&entry.group)?;
        entry.attached = true;

        if created {
            log::info!("🆕 [LAYER] Grupo {} creado", layer);
        }

        if entry.loaded && !self.refetch_on_enable {
            log::info!("♻️ [LAYER] {} reactivada con datos en caché", layer);
            return Ok(None);
        }

        // Sin caché: vaciar antes de la nueva carga para no duplicar marcadores
        renderer.clear_group(&entry.group)?;
        self.marker_counts.insert(layer.to_string(), 0);

        Ok(self.layers.begin_load(layer))
    }

    /// Aplicar la respuesta de la API a la capa
    pub fn complete_layer_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<PointRecord>, String>,
    ) -> LoadOutcome {
        if self.disposed || !self.layers.is_current(ticket) {
            log::info!("⏭️ [LAYER] Respuesta tardía de {} ignorada", ticket.layer);
            return LoadOutcome::Stale;
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                // App lo registra junto con la URL
                self.layers.abandon_load(ticket);
                return LoadOutcome::Failed(e);
            }
        };

        let batch = prepare_markers(&ticket.layer, &records);
        let group = match self.layers.get(&ticket.layer) {
            Some(entry) => entry.group.clone(),
            None => return LoadOutcome::Stale,
        };

        let mut placed = 0;
        for marker in &batch.markers {
            match self.renderer.add_marker(&group, marker) {
                Ok(()) => placed += 1,
                Err(e) => log::warn!("⚠️ [LAYER] Marcador no añadido en {}: {}", ticket.layer, e),
            }
        }

        self.layers.finish_load(ticket);
        self.marker_counts.insert(ticket.layer.clone(), placed);

        if batch.rejected > 0 {
            log::debug!(
                "🧹 [LAYER] {}: {} registros con coordenadas no numéricas descartados",
                ticket.layer,
                batch.rejected
            );
        }
        log::info!("📍 [LAYER] {}: {} marcadores colocados", ticket.layer, placed);

        LoadOutcome::Loaded {
            placed,
            rejected: batch.rejected,
        }
    }

    /// Desactivar una capa: el grupo se quita del mapa pero se conserva.
    /// Devuelve `true` si la capa estaba visible.
    pub fn disable_layer(&mut self, layer: &str) -> bool {
        if self.disposed {
            return false;
        }

        let Some(entry) = self.layers.detach(layer) else {
            return false;
        };

        if let Err(e) = self.renderer.detach_group(&entry.group) {
            log::warn!("⚠️ [LAYER] Error quitando {} del mapa: {}", layer, e);
        }
        log::info!("👁️ [LAYER] {} oculta", layer);
        true
    }

    /// Desmontar la sesión: quitar y vaciar todos los grupos y liberar el mapa
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        self.session_resources.clear();
        self.control_ready = false;

        for (name, entry) in self.layers.drain() {
            if entry.attached {
                let _ = self.renderer.detach_group(&entry.group);
            }
            let _ = self.renderer.clear_group(&entry.group);
            log::debug!("🧹 [MAP] Grupo {} liberado", name);
        }
        self.marker_counts.clear();
        self.renderer.dispose();
        self.disposed = true;
        log::info!("🧹 [MAP] Sesión de mapa desmontada");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::recording::{RecordingRenderer, RendererCall};
    use crate::models::{parse_boundaries, MarkerStatus};
    use std::rc::Rc;

    fn session(refetch: bool) -> MapViewModel<RecordingRenderer> {
        MapViewModel::new(RecordingRenderer::default(), BoundaryStyle::default(), false, refetch)
    }

    fn sample_records() -> Vec<PointRecord> {
        vec![
            PointRecord::from_text("7.65", "110.39", "Sensor A", "Hidup"),
            PointRecord::from_text("abc", "110.40", "Sensor B", "Mati"),
        ]
    }

    #[test]
    fn test_first_enable_creates_and_attaches_one_group() {
        let mut vm = session(true);

        let ticket = vm.enable_layer("EWS").unwrap();
        assert!(ticket.is_some());
        assert_eq!(vm.renderer().created_groups(), 1);
        assert!(vm.renderer().is_attached(0));
        assert!(vm.is_layer_enabled("EWS"));
        assert!(vm.is_layer_loading("EWS"));
    }

    #[test]
    fn test_enable_twice_is_idempotent() {
        let mut vm = session(true);

        let first = vm.enable_layer("EWS").unwrap();
        let second = vm.enable_layer("EWS").unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(vm.renderer().created_groups(), 1);
        assert_eq!(vm.renderer().attach_calls(), 1);
    }

    #[test]
    fn test_scenario_places_only_valid_record() {
        let mut vm = session(true);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();

        let outcome = vm.complete_layer_load(&ticket, Ok(sample_records()));

        assert_eq!(outcome, LoadOutcome::Loaded { placed: 1, rejected: 1 });
        let markers = vm.renderer().markers_in(0);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].status, MarkerStatus::Active);
        assert!(markers[0].popup_html.contains("Sensor A"));
        assert_eq!(vm.marker_count("EWS"), 1);
        assert!(!vm.is_layer_loading("EWS"));
    }

    #[test]
    fn test_failed_fetch_leaves_group_empty() {
        let mut vm = session(true);
        let ticket = vm.enable_layer("CCTV").unwrap().unwrap();

        let outcome = vm.complete_layer_load(&ticket, Err("Network error: offline".to_string()));

        assert_eq!(outcome, LoadOutcome::Failed("Network error: offline".to_string()));
        assert!(vm.renderer().markers_in(0).is_empty());
        assert!(vm.is_layer_enabled("CCTV"));
    }

    #[test]
    fn test_disable_detaches_but_keeps_group() {
        let mut vm = session(true);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();
        vm.complete_layer_load(&ticket, Ok(sample_records()));

        assert!(vm.disable_layer("EWS"));
        assert!(!vm.is_layer_enabled("EWS"));
        assert!(!vm.renderer().is_attached(0));
        // los marcadores siguen en el grupo, solo está fuera del mapa
        assert_eq!(vm.renderer().markers_in(0).len(), 1);

        assert!(!vm.disable_layer("EWS"));
        assert!(!vm.disable_layer("PLTA"));
    }

    #[test]
    fn test_reenable_refetches_into_same_group() {
        let mut vm = session(true);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();
        vm.complete_layer_load(&ticket, Ok(sample_records()));
        vm.disable_layer("EWS");

        let again = vm.enable_layer("EWS").unwrap();
        assert!(again.is_some());
        assert_eq!(vm.renderer().created_groups(), 1);
        assert!(vm.renderer().is_attached(0));
        assert!(vm.renderer().markers_in(0).is_empty());

        vm.complete_layer_load(&again.unwrap(), Ok(sample_records()));
        assert_eq!(vm.renderer().markers_in(0).len(), 1);
    }

    #[test]
    fn test_reenable_with_cache_replays_markers_without_fetch() {
        let mut vm = session(false);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();
        vm.complete_layer_load(&ticket, Ok(sample_records()));
        vm.disable_layer("EWS");

        let again = vm.enable_layer("EWS").unwrap();
        assert!(again.is_none());
        assert!(vm.renderer().is_attached(0));
        assert_eq!(vm.renderer().markers_in(0).len(), 1);
        assert_eq!(vm.marker_count("EWS"), 1);
    }

    #[test]
    fn test_cache_does_not_apply_to_unfinished_load() {
        let mut vm = session(false);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();
        vm.disable_layer("EWS");

        let again = vm.enable_layer("EWS").unwrap();
        assert!(again.is_some());
        assert_ne!(again.unwrap(), ticket);
    }

    #[test]
    fn test_late_response_after_disable_is_ignored() {
        let mut vm = session(true);
        let ticket = vm.enable_layer("CCTV").unwrap().unwrap();
        vm.disable_layer("CCTV");

        let outcome = vm.complete_layer_load(&ticket, Ok(sample_records()));

        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(vm.renderer().markers_in(0).is_empty());
    }

    #[test]
    fn test_late_response_from_older_toggle_is_ignored() {
        let mut vm = session(true);
        let old = vm.enable_layer("EWS").unwrap().unwrap();
        vm.disable_layer("EWS");
        let new = vm.enable_layer("EWS").unwrap().unwrap();

        assert_eq!(vm.complete_layer_load(&old, Ok(sample_records())), LoadOutcome::Stale);
        assert_eq!(
            vm.complete_layer_load(&new, Ok(sample_records())),
            LoadOutcome::Loaded { placed: 1, rejected: 1 }
        );
        assert_eq!(vm.renderer().markers_in(0).len(), 1);
    }

    #[test]
    fn test_layers_are_independent() {
        let mut vm = session(true);
        let ews = vm.enable_layer("EWS").unwrap().unwrap();
        let cctv = vm.enable_layer("CCTV").unwrap().unwrap();

        vm.complete_layer_load(&cctv, Ok(vec![PointRecord::from_text("7.7", "110.4", "Cam 1", "Mati")]));
        vm.complete_layer_load(&ews, Ok(sample_records()));

        assert_eq!(vm.renderer().created_groups(), 2);
        assert_eq!(vm.marker_count("EWS"), 1);
        assert_eq!(vm.marker_count("CCTV"), 1);
        assert_eq!(vm.renderer().markers_in(1)[0].status, MarkerStatus::Inactive);
    }

    #[test]
    fn test_boundaries_use_fixed_style() {
        let mut vm = session(true);
        let geojson = parse_boundaries(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"fill": "red", "stroke": "green"},
                 "geometry": {"type": "Point", "coordinates": [110.4, -7.6]}}
            ]}"#,
        )
        .unwrap();

        vm.show_boundaries(Ok(geojson));

        let calls = vm.renderer().calls();
        let (features, style) = calls
            .iter()
            .find_map(|call| match call {
                RendererCall::AddBoundary { features, style } => Some((*features, style.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(features, 1);
        assert_eq!(style, BoundaryStyle::default());
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut vm = session(false);
        let ticket = vm.enable_layer("EWS").unwrap().unwrap();
        vm.complete_layer_load(&ticket, Err("HTTP 500: Internal Server Error".to_string()));
        vm.disable_layer("EWS");

        assert!(vm.enable_layer("EWS").unwrap().is_some());
    }

    #[test]
    fn test_boundary_failure_adds_nothing() {
        let mut vm = session(true);
        vm.show_boundaries(Err("HTTP 404: Not Found".to_string()));
        assert!(vm.renderer().calls().is_empty());
    }

    #[test]
    fn test_dispose_releases_everything() {
        let mut vm = session(true);
        let ews = vm.enable_layer("EWS").unwrap().unwrap();
        vm.complete_layer_load(&ews, Ok(sample_records()));
        let cctv = vm.enable_layer("CCTV").unwrap().unwrap();

        vm.dispose();

        assert!(vm.is_disposed());
        assert!(vm.renderer().is_disposed());
        assert!(!vm.renderer().is_attached(0));
        assert!(vm.renderer().markers_in(0).is_empty());
        assert!(!vm.is_layer_enabled("EWS"));
        assert_eq!(vm.complete_layer_load(&cctv, Ok(sample_records())), LoadOutcome::Stale);
        assert_eq!(vm.enable_layer("EWS"), Err(MapError::Disposed));

        let calls_before = vm.renderer().calls().len();
        vm.dispose();
        vm.show_boundaries(Err("ignored".to_string()));
        assert_eq!(vm.renderer().calls().len(), calls_before);
    }

    #[test]
    fn test_dispose_drops_session_resources() {
        let mut vm = session(true);
        let listener = Rc::new(());
        vm.keep_until_dispose(listener.clone());
        vm.keep_until_dispose(listener.clone());
        assert_eq!(Rc::strong_count(&listener), 3);

        vm.dispose();
        assert_eq!(Rc::strong_count(&listener), 1);

        // tras dispose no se retiene nada nuevo
        vm.keep_until_dispose(listener.clone());
        assert_eq!(Rc::strong_count(&listener), 1);
    }

    #[test]
    fn test_control_ready_until_dispose() {
        let mut vm = session(true);
        assert!(!vm.is_control_ready());

        vm.mark_control_ready();
        assert!(vm.is_control_ready());

        vm.dispose();
        assert!(!vm.is_control_ready());
        vm.mark_control_ready();
        assert!(!vm.is_control_ready());
    }

    #[test]
    fn test_group_creation_failure_is_reported() {
        let mut vm = MapViewModel::new(
            RecordingRenderer::failing_groups(),
            BoundaryStyle::default(),
            false,
            true,
        );
        assert!(matches!(vm.enable_layer("EWS"), Err(MapError::Js(_))));
        assert!(!vm.is_layer_enabled("EWS"));
    }

    #[test]
    fn test_theme_preference_is_kept() {
        let vm = MapViewModel::new(RecordingRenderer::default(), BoundaryStyle::default(), true, true);
        assert!(vm.prefers_dark_mode());
    }
}
