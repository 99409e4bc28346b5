//! Vector type alias for 2D node positions.

use nalgebra::Vector2;

/// 2D vector type for node layout positions.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`. Positions only travel
/// from a topology generator to a renderer; the simulation never reads them.
pub type Vec2 = Vector2<f32>;
