// Módulo de mapas: trait común + implementación Leaflet para web

pub mod traits;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub mod recording;

pub use traits::{MapError, MapRenderer};
