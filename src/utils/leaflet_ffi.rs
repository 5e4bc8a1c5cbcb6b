// ============================================================================
// LEAFLET FFI - Foreign Function Interface para Leaflet (global `L`)
// ============================================================================
// Solo bindings de las funciones JS que usa el mapa - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    // ------------------------------------------------------------------ Map
    #[derive(Debug, Clone)]
    pub type LeafletMap;

    /// `L.map(id)` - lanza si el contenedor no existe
    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn create_map(container_id: &str) -> Result<LeafletMap, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &LeafletMap, center: &JsValue, zoom: f64) -> LeafletMap;

    #[wasm_bindgen(method, js_name = removeLayer)]
    pub fn remove_layer(this: &LeafletMap, layer: &Layer) -> LeafletMap;

    #[wasm_bindgen(method)]
    pub fn remove(this: &LeafletMap) -> LeafletMap;

    // ---------------------------------------------------------------- Layer
    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, map: &LeafletMap) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, content: &str) -> Layer;

    // ----------------------------------------------------------- LayerGroup
    #[wasm_bindgen(extends = Layer)]
    #[derive(Debug, Clone)]
    pub type LayerGroup;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> LayerGroup;

    #[wasm_bindgen(method, js_name = addLayer)]
    pub fn add_layer(this: &LayerGroup, layer: &Layer) -> LayerGroup;

    #[wasm_bindgen(method, js_name = clearLayers)]
    pub fn clear_layers(this: &LayerGroup) -> LayerGroup;

    // ------------------------------------------------------------ TileLayer
    #[wasm_bindgen(extends = Layer)]
    #[derive(Debug, Clone)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url_template: &str, options: &JsValue) -> TileLayer;

    // --------------------------------------------------------------- Marker
    #[wasm_bindgen(extends = Layer)]
    #[derive(Debug, Clone)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn marker(lat_lng: &JsValue, options: &JsValue) -> Marker;

    #[derive(Debug, Clone)]
    pub type Icon;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    pub fn icon(options: &JsValue) -> Icon;

    // -------------------------------------------------------------- GeoJSON
    #[wasm_bindgen(extends = Layer)]
    #[derive(Debug, Clone)]
    pub type GeoJsonLayer;

    /// `L.geoJSON(data, options)` - lanza si la geometría no es válida
    #[wasm_bindgen(catch, js_namespace = L, js_name = geoJSON)]
    pub fn geo_json(data: &JsValue, options: &JsValue) -> Result<GeoJsonLayer, JsValue>;

    // ------------------------------------------------------------- Controls
    #[derive(Debug, Clone)]
    pub type Control;

    #[wasm_bindgen(js_namespace = L, js_name = control)]
    pub fn control(options: &JsValue) -> Control;

    /// Selector de capas base integrado (`L.control.layers`)
    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = layers)]
    pub fn control_layers(base_layers: &JsValue) -> Control;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Control, map: &LeafletMap) -> Control;

    #[wasm_bindgen(method, setter = onAdd)]
    pub fn set_on_add(this: &Control, callback: &js_sys::Function);

    #[wasm_bindgen(method, js_name = getContainer)]
    pub fn get_container(this: &Control) -> Option<HtmlElement>;

    #[wasm_bindgen(js_namespace = ["L", "DomEvent"], js_name = disableClickPropagation)]
    pub fn disable_click_propagation(element: &HtmlElement);
}
