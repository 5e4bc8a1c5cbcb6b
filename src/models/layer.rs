use serde::{Deserialize, Serialize};

/// Capa base de teselas (solo una activa a la vez)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayerConfig {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
}

impl BaseLayerConfig {
    pub fn new(name: &str, url_template: &str, attribution: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        }
    }
}

/// Capa de puntos alimentada por una API remota
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLayerConfig {
    pub name: String,
    pub url: String,
}

impl PointLayerConfig {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Estado visual de un marcador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerStatus {
    Active,
    Inactive,
}

/// Definición de un icono de Leaflet (nombres de opción de `L.icon`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    pub icon_url: String,
    pub shadow_url: String,
    pub icon_size: [i32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [i32; 2],
}

const MARKER_SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png";

impl IconSpec {
    /// Marcador estándar (25x41) de leaflet-color-markers
    pub fn colored(color: &str) -> Self {
        Self {
            icon_url: format!(
                "https://cdn.jsdelivr.net/gh/pointhi/leaflet-color-markers@1.0/img/marker-icon-{}.png",
                color
            ),
            shadow_url: MARKER_SHADOW_URL.to_string(),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}

/// Par de iconos activo / inactivo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSet {
    pub active: IconSpec,
    pub inactive: IconSpec,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            active: IconSpec::colored("green"),
            inactive: IconSpec::colored("red"),
        }
    }
}

impl IconSet {
    pub fn for_status(&self, status: MarkerStatus) -> &IconSpec {
        match status {
            MarkerStatus::Active => &self.active,
            MarkerStatus::Inactive => &self.inactive,
        }
    }
}
