// ============================================================================
// BOUNDARY - Capa estática de límites administrativos (GeoJSON)
// ============================================================================

use geojson::GeoJson;
use serde::{Deserialize, Serialize};

/// Estilo fijo de los polígonos. No depende de las propiedades de cada feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub fill_color: String,
}

impl Default for BoundaryStyle {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            weight: 2.0,
            opacity: 0.8,
            fill_opacity: 0.4,
            fill_color: "lightblue".to_string(),
        }
    }
}

/// Parsear el archivo de límites
pub fn parse_boundaries(body: &str) -> Result<GeoJson, String> {
    body.parse::<GeoJson>()
        .map_err(|e| format!("Parse error: {}", e))
}

/// Número de features (para logs)
pub fn feature_count(geojson: &GeoJson) -> usize {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection.features.len(),
        GeoJson::Feature(_) => 1,
        GeoJson::Geometry(_) => 1,
    }
}
