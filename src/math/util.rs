use super::{Point2d, Vector2d, ZERO_TOLERANCE};
use cgmath::prelude::*;

/// Reflects a unit vector about a unit axis.
///
/// # Parameters
/// * `u` - The unit vector to reflect
/// * `axis` - The unit vector to reflect about
pub fn reflect_about(u: Vector2d, axis: Vector2d) -> Vector2d {
    2.0 * axis.dot(u) * axis - u
}

/// Computes the unit vector from `from` to `to`,
/// or `None` if the two points are effectively coincident.
pub fn unit_chord(from: Point2d, to: Point2d) -> Option<Vector2d> {
    let chord = to - from;
    let length = chord.magnitude();
    (length > ZERO_TOLERANCE).then(|| chord / length)
}
