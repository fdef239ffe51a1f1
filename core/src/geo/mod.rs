pub mod batch;
pub mod greatcircle;
pub mod projection;

pub use batch::batch_distance_bearing;
pub use greatcircle::distance_bearing;
pub use projection::{LocalProjection, ScreenPos};
