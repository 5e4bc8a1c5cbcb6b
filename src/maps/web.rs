use geojson::GeoJson;
use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::traits::{MapError, MapRenderer};
use crate::config::MapConfig;
use crate::models::{BoundaryStyle, Coordinates, IconSet, MarkerStatus};
use crate::utils::leaflet_ffi::{
    self, control, control_layers, create_map, disable_click_propagation, geo_json, icon,
    layer_group, tile_layer, Control, Icon, Layer, LayerGroup, LeafletMap,
};
use crate::viewmodels::marker_viewmodel::MapMarker;

#[derive(Serialize)]
struct TileLayerOptions<'a> {
    attribution: &'a str,
}

#[derive(Serialize)]
struct ControlOptions<'a> {
    position: &'a str,
}

/// Renderizador de mapas para web usando Leaflet
pub struct LeafletMapRenderer {
    map: Option<LeafletMap>,
    active_icon: Icon,
    inactive_icon: Icon,
    overlays: Vec<Layer>,
    controls: Vec<Control>,
    // onAdd de los controles propios: deben vivir tanto como el mapa
    control_callbacks: Vec<Closure<dyn FnMut(JsValue) -> JsValue>>,
}

impl LeafletMapRenderer {
    /// Crear el mapa en el contenedor, con capas base y selector de capas
    pub fn mount(config: &MapConfig, icons: &IconSet) -> Result<Self, MapError> {
        log::info!("🗺️ [LEAFLET] Inicializando mapa en #{}", config.container_id);

        let map = create_map(&config.container_id).map_err(js_error)?;
        let center = Coordinates::new(config.default_center_lat, config.default_center_lng);
        map.set_view(&lat_lng(&center), config.default_zoom);

        let base_layers = Object::new();
        for (index, base) in config.base_layers.iter().enumerate() {
            let options = to_js(&TileLayerOptions { attribution: &base.attribution })?;
            let tiles = tile_layer(&base.url_template, &options);
            if index == 0 {
                tiles.add_to(&map);
            }
            Reflect::set(&base_layers, &JsValue::from_str(&base.name), &tiles).map_err(js_error)?;
        }
        control_layers(&base_layers).add_to(&map);

        let active_icon = icon(&to_js(&icons.active)?);
        let inactive_icon = icon(&to_js(&icons.inactive)?);

        log::info!("✅ [LEAFLET] Mapa listo ({} capas base)", config.base_layers.len());

        Ok(Self {
            map: Some(map),
            active_icon,
            inactive_icon,
            overlays: Vec::new(),
            controls: Vec::new(),
            control_callbacks: Vec::new(),
        })
    }

    /// Añadir un control propio cuyo contenido es `element`.
    /// `on_mounted` se llama cuando Leaflet ya insertó el elemento en el mapa.
    pub fn add_control<F>(&mut self, element: HtmlElement, position: &str, on_mounted: F) -> Result<(), MapError>
    where
        F: FnOnce(&HtmlElement),
    {
        let map = self.map()?.clone();

        let content = element.clone();
        let on_add = Closure::wrap(Box::new(move |_map: JsValue| -> JsValue {
            // Los clicks dentro del panel no deben mover el mapa
            disable_click_propagation(&content);
            content.clone().into()
        }) as Box<dyn FnMut(JsValue) -> JsValue>);

        let custom = control(&to_js(&ControlOptions { position })?);
        custom.set_on_add(on_add.as_ref().unchecked_ref());
        custom.add_to(&map);

        // addTo llama a onAdd de forma síncrona: aquí el contenedor ya existe
        let container = custom
            .get_container()
            .ok_or_else(|| MapError::Js("control container missing after addTo".to_string()))?;
        on_mounted(&container);

        self.controls.push(custom);
        self.control_callbacks.push(on_add);
        Ok(())
    }

    fn map(&self) -> Result<&LeafletMap, MapError> {
        self.map.as_ref().ok_or(MapError::Disposed)
    }

    fn icon_for(&self, status: MarkerStatus) -> &Icon {
        match status {
            MarkerStatus::Active => &self.active_icon,
            MarkerStatus::Inactive => &self.inactive_icon,
        }
    }
}

impl MapRenderer for LeafletMapRenderer {
    type Group = LayerGroup;

    fn create_marker_group(&mut self, layer: &str) -> Result<LayerGroup, MapError> {
        self.map()?;
        log::debug!("🆕 [LEAFLET] layerGroup para {}", layer);
        Ok(layer_group())
    }

    fn attach_group(&mut self, group: &LayerGroup) -> Result<(), MapError> {
        group.add_to(self.map()?);
        Ok(())
    }

    fn detach_group(&mut self, group: &LayerGroup) -> Result<(), MapError> {
        self.map()?.remove_layer(group);
        Ok(())
    }

    fn clear_group(&mut self, group: &LayerGroup) -> Result<(), MapError> {
        group.clear_layers();
        Ok(())
    }

    fn add_marker(&mut self, group: &LayerGroup, marker: &MapMarker) -> Result<(), MapError> {
        self.map()?;
        if !marker.position.latitude.is_finite() || !marker.position.longitude.is_finite() {
            return Err(MapError::InvalidCoordinates);
        }

        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("icon"), self.icon_for(marker.status))
            .map_err(js_error)?;

        let pin = leaflet_ffi::marker(&lat_lng(&marker.position), &options);
        pin.bind_popup(&marker.popup_html);
        group.add_layer(&pin);
        Ok(())
    }

    fn add_boundary_overlay(&mut self, data: &GeoJson, style: &BoundaryStyle) -> Result<(), MapError> {
        let map = self.map()?.clone();

        // Estilo como objeto (no función): igual para todas las features
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("style"), &to_js(style)?).map_err(js_error)?;

        let overlay = geo_json(&to_js(data)?, &options).map_err(js_error)?;
        overlay.add_to(&map);
        self.overlays.push(overlay.unchecked_into());
        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(map) = self.map.take() {
            // remove() quita capas, controles y el contenedor interno
            map.remove();
            log::info!("🧹 [LEAFLET] Mapa liberado");
        }
        self.overlays.clear();
        self.controls.clear();
        self.control_callbacks.clear();
    }
}

impl Drop for LeafletMapRenderer {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn lat_lng(coordinates: &Coordinates) -> JsValue {
    let pair = Array::new();
    pair.push(&JsValue::from_f64(coordinates.latitude));
    pair.push(&JsValue::from_f64(coordinates.longitude));
    pair.into()
}

/// Serializar a objeto JS plano (objetos, no `Map`)
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, MapError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| MapError::Serialization(e.to_string()))
}

fn js_error(error: JsValue) -> MapError {
    MapError::Js(
        error
            .as_string()
            .unwrap_or_else(|| format!("{:?}", error)),
    )
}
