//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
pub use angle::*;
pub use hermite::{blend_weights, HERMITE_BASIS};
pub use util::*;

mod angle;
mod hermite;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Vector and chord lengths at or below this are treated as zero.
pub const ZERO_TOLERANCE: f64 = 0.00001;
