// ============================================================================
// STATE MODULE - Estado de la sesión de mapa
// ============================================================================

pub mod in_flight;
pub mod layer_registry;

pub use in_flight::InFlightLoads;
pub use layer_registry::*;
