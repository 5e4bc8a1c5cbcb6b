use serde::{Deserialize, Serialize};

use crate::models::{BaseLayerConfig, BoundaryStyle, IconSet, PointLayerConfig};

const DEFAULT_CENTER_LAT: f64 = 7.6574714;
const DEFAULT_CENTER_LNG: f64 = 110.395469;
const DEFAULT_ZOOM: f64 = 10.0;
const DEFAULT_BOUNDARY_PATH: &str = "assets/data/adminkec.geojson";
const DEFAULT_EWS_URL: &str = "https://script.google.com/macros/s/AKfycbwyc185bvi-aM5x8fXkHkun7B_v6uAMUUw0-KZdCzprpmH8jF5Zwd3sQuMG-UUG0BUexQ/exec";
const DEFAULT_CCTV_URL: &str = "https://script.google.com/macros/s/AKfycbwwcjhjSyuEW_6ng4lgAcW3qwxQ2eQWKQUwsCdgXWdhSTdgQgmbfOoQGWlRmsUfDVN8JQ/exec";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub map_config: MapConfig,
    pub boundary_config: BoundaryConfig,
    pub point_layers: Vec<PointLayerConfig>,
    pub marker_icons: IconSet,
    /// Volver a pedir los datos cada vez que se marca una capa
    pub refetch_on_enable: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            map_config: MapConfig::default(),
            boundary_config: BoundaryConfig::default(),
            point_layers: vec![
                PointLayerConfig::new("EWS", DEFAULT_EWS_URL),
                PointLayerConfig::new("CCTV", DEFAULT_CCTV_URL),
            ],
            marker_icons: IconSet::default(),
            refetch_on_enable: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub container_id: String,
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
    /// La primera capa es la que se muestra al iniciar
    pub base_layers: Vec<BaseLayerConfig>,
    pub control_position: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "mapId".to_string(),
            default_center_lat: DEFAULT_CENTER_LAT,
            default_center_lng: DEFAULT_CENTER_LNG,
            default_zoom: DEFAULT_ZOOM,
            base_layers: vec![
                BaseLayerConfig::new(
                    "OpenStreetMap",
                    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                    "&copy; OpenStreetMap contributors",
                ),
                BaseLayerConfig::new(
                    "Satellite",
                    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                    "Tiles &copy; Esri",
                ),
                BaseLayerConfig::new(
                    "CartoDB Positron",
                    "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
                    "&copy; Carto",
                ),
            ],
            control_position: "topright".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub path: String,
    pub style: BoundaryStyle,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_BOUNDARY_PATH.to_string(),
            style: BoundaryStyle::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "ENVIRONMENT" => option_env!("ENVIRONMENT"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "MAP_CENTER_LAT" => option_env!("MAP_CENTER_LAT"),
            "MAP_CENTER_LNG" => option_env!("MAP_CENTER_LNG"),
            "MAP_ZOOM" => option_env!("MAP_ZOOM"),
            "BOUNDARY_GEOJSON_PATH" => option_env!("BOUNDARY_GEOJSON_PATH"),
            "EWS_API_URL" => option_env!("EWS_API_URL"),
            "CCTV_API_URL" => option_env!("CCTV_API_URL"),
            "REFETCH_ON_ENABLE" => option_env!("REFETCH_ON_ENABLE"),
            _ => None,
        })
    }

    /// Construir la configuración a partir de una fuente clave -> valor.
    /// Valores ausentes o no parseables usan el valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'static str>,
    {
        let defaults = Self::default();
        let parse_f64 = |key: &str, default: f64| {
            lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        };
        let parse_bool = |key: &str, default: bool| {
            lookup(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
        };

        let map_config = MapConfig {
            default_center_lat: parse_f64("MAP_CENTER_LAT", DEFAULT_CENTER_LAT),
            default_center_lng: parse_f64("MAP_CENTER_LNG", DEFAULT_CENTER_LNG),
            default_zoom: parse_f64("MAP_ZOOM", DEFAULT_ZOOM),
            ..defaults.map_config
        };

        let boundary_config = BoundaryConfig {
            path: lookup("BOUNDARY_GEOJSON_PATH")
                .unwrap_or(DEFAULT_BOUNDARY_PATH)
                .to_string(),
            ..defaults.boundary_config
        };

        Self {
            environment: lookup("ENVIRONMENT").unwrap_or("development").to_string(),
            enable_logging: parse_bool("ENABLE_LOGGING", true),
            map_config,
            boundary_config,
            point_layers: vec![
                PointLayerConfig::new("EWS", lookup("EWS_API_URL").unwrap_or(DEFAULT_EWS_URL)),
                PointLayerConfig::new("CCTV", lookup("CCTV_API_URL").unwrap_or(DEFAULT_CCTV_URL)),
            ],
            marker_icons: defaults.marker_icons,
            refetch_on_enable: parse_bool("REFETCH_ON_ENABLE", true),
        }
    }

    /// Nivel de log según configuración
    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Info
        } else {
            log::Level::Warn
        }
    }

    pub fn point_layer(&self, name: &str) -> Option<&PointLayerConfig> {
        self.point_layers.iter().find(|layer| layer.name == name)
    }
}
