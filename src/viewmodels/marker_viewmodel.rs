// ============================================================================
// MARKER VIEWMODEL - Preparación de marcadores a partir de registros de API
// ============================================================================
// SOLO lógica de datos - Sin estado, sin DOM
// ============================================================================

use serde::Serialize;

use crate::models::{Coordinates, MarkerStatus, PointRecord};

/// Popup para capas sin plantilla
pub const POPUP_FALLBACK: &str = "<strong>Data tidak tersedia</strong>";

/// Marcador listo para enviar al mapa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub layer: String,
    pub position: Coordinates,
    pub status: MarkerStatus,
    pub popup_html: String,
}

/// Resultado de preparar una respuesta de API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerBatch {
    pub markers: Vec<MapMarker>,
    /// Registros descartados por coordenadas no numéricas
    pub rejected: usize,
}

/// Convertir registros en marcadores. Los registros sin coordenadas válidas se descartan.
pub fn prepare_markers(layer_name: &str, records: &[PointRecord]) -> MarkerBatch {
    let mut batch = MarkerBatch::default();

    for record in records {
        let Some(position) = record.coordinates() else {
            batch.rejected += 1;
            continue;
        };

        batch.markers.push(MapMarker {
            layer: layer_name.to_string(),
            position,
            status: record.status(),
            popup_html: popup_content(layer_name, record),
        });
    }

    batch
}

/// Contenido del popup según la capa
pub fn popup_content(layer_name: &str, record: &PointRecord) -> String {
    match layer_name {
        "EWS" | "CCTV" => format!(
            "<strong>Nama {}: </strong> {}<br><strong>Status: </strong>{}<br>",
            layer_name,
            escape_html(&record.display_name()),
            escape_html(&record.display_status()),
        ),
        _ => POPUP_FALLBACK.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
