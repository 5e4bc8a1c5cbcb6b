// ============================================================================
// LAYER CONTROL VIEW - Panel de checkboxes de capas de puntos
// ============================================================================
// Los listeners se registran sobre los inputs recién creados, antes de montar
// el control en Leaflet; no hace falta buscar los elementos por ID después.
// Quien monta el panel guarda los listeners hasta desmontar el mapa.
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::dom::{append_child, create_checkbox, create_html_element, on_checkbox_change, ElementBuilder, EventListener};
use crate::models::PointLayerConfig;

pub const CONTROL_CLASS: &str = "leaflet-bar leaflet-control leaflet-control-custom";
const PANEL_STYLE: &str = "background-color: white; color: black; padding: 10px; border-radius: 5px;";
const LABEL_STYLE: &str = "cursor: pointer; display: block; margin: 5px 0;";
const CHECKBOX_STYLE: &str = "margin-right: 5px;";

/// Panel renderizado junto con los listeners de sus checkboxes
pub struct LayerControl {
    pub element: HtmlElement,
    pub listeners: Vec<EventListener>,
}

/// Renderizar el panel. `on_toggle(nombre_capa, marcado)` se llama en cada cambio.
pub fn render_layer_control(
    layers: &[PointLayerConfig],
    on_toggle: Rc<dyn Fn(&str, bool)>,
) -> Result<LayerControl, JsValue> {
    let container = create_html_element("div")?;
    container.set_class_name(CONTROL_CLASS);

    let title = ElementBuilder::new("strong")?.text("Informasi Titik").build();
    let hint = ElementBuilder::new("small")?
        .text("Pilih layer titik untuk ditampilkan:")
        .build();

    let mut panel = ElementBuilder::new("div")?
        .style(PANEL_STYLE)?
        .child(&title)?
        .child(&ElementBuilder::new("br")?.build())?
        .child(&hint)?
        .child(&ElementBuilder::new("br")?.build())?;

    let mut listeners = Vec::with_capacity(layers.len());
    for layer in layers {
        let (label, listener) = render_layer_option(layer, on_toggle.clone())?;
        panel = panel.child(&label)?;
        listeners.push(listener);
    }

    append_child(&container, &panel.build())?;
    Ok(LayerControl {
        element: container,
        listeners,
    })
}

/// Una fila: checkbox (id = nombre de la capa) + nombre
fn render_layer_option(
    layer: &PointLayerConfig,
    on_toggle: Rc<dyn Fn(&str, bool)>,
) -> Result<(web_sys::Element, EventListener), JsValue> {
    let checkbox = create_checkbox(&layer.name)?;
    checkbox.set_attribute("style", CHECKBOX_STYLE)?;

    let name = layer.name.clone();
    let listener = on_checkbox_change(&checkbox, move |checked| on_toggle(&name, checked))?;

    let text = ElementBuilder::new("span")?.text(&layer.name).build();

    let label = ElementBuilder::new("label")?
        .style(LABEL_STYLE)?
        .child(checkbox.unchecked_ref())?
        .child(&text)?
        .build();

    Ok((label, listener))
}
