use geojson::GeoJson;

use crate::models::BoundaryStyle;
use crate::viewmodels::marker_viewmodel::MapMarker;

/// Operaciones que la sesión de mapa necesita del motor de mapas.
/// En web lo implementa Leaflet; en tests, un renderizador que solo registra llamadas.
pub trait MapRenderer {
    /// Manejador de un grupo de marcadores
    type Group: Clone;

    /// Crear un grupo vacío (sin añadirlo al mapa)
    fn create_marker_group(&mut self, layer: &str) -> Result<Self::Group, MapError>;

    /// Añadir el grupo al mapa
    fn attach_group(&mut self, group: &Self::Group) -> Result<(), MapError>;

    /// Quitar el grupo del mapa sin destruirlo
    fn detach_group(&mut self, group: &Self::Group) -> Result<(), MapError>;

    /// Eliminar todos los marcadores del grupo
    fn clear_group(&mut self, group: &Self::Group) -> Result<(), MapError>;

    /// Añadir un marcador (icono + popup) al grupo
    fn add_marker(&mut self, group: &Self::Group, marker: &MapMarker) -> Result<(), MapError>;

    /// Añadir la capa de límites con estilo fijo
    fn add_boundary_overlay(&mut self, data: &GeoJson, style: &BoundaryStyle) -> Result<(), MapError>;

    /// Liberar el mapa. Después de esto ninguna otra operación es válida.
    fn dispose(&mut self);
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    NotReady,
    Disposed,
    InvalidCoordinates,
    Js(String),
    Serialization(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::NotReady => write!(f, "Map is not ready"),
            MapError::Disposed => write!(f, "Map has been disposed"),
            MapError::InvalidCoordinates => write!(f, "Invalid coordinates"),
            MapError::Js(msg) => write!(f, "Leaflet error: {}", msg),
            MapError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}
