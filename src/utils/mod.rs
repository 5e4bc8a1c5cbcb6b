// Utils compartidos (solo navegador)

pub mod leaflet_ffi;
pub mod theme;

pub use theme::prefers_dark_mode;
