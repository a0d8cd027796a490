pub mod easing;
pub mod tween;
pub mod zoom;

pub use easing::Easing;
pub use tween::Tween;
pub use zoom::{ZoomAnimator, ZoomState};
