pub mod marker_viewmodel;
pub mod map_viewmodel;

pub use marker_viewmodel::{MapMarker, MarkerBatch, prepare_markers, popup_content};
pub use map_viewmodel::{MapViewModel, LoadOutcome};
