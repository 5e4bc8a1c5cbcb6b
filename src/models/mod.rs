pub mod point;
pub mod layer;
pub mod boundary;

pub use point::{Coordinates, PointRecord, decode_point_records};
pub use layer::{BaseLayerConfig, PointLayerConfig, MarkerStatus, IconSpec, IconSet};
pub use boundary::{BoundaryStyle, parse_boundaries, feature_count};
