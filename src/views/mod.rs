pub mod layer_control;

pub use layer_control::{render_layer_control, LayerControl};
