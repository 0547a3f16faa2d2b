use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use cgmath::Rad;
use std::f64::consts::PI;

/// Shifts `angle` by whole turns until it lies within ±π of `reference`.
///
/// Used to keep headings continuous across the -180°/180° seam,
/// so interpolating between two headings never takes the long way around.
pub fn unwrap_near(angle: Rad<f64>, reference: Rad<f64>) -> Rad<f64> {
    let mut angle = angle;
    while angle.0 - reference.0 > PI {
        angle = angle - Rad::full_turn();
    }
    while angle.0 - reference.0 < -PI {
        angle = angle + Rad::full_turn();
    }
    angle
}

/// The field heading pointing from `from` towards `to`.
///
/// A heading of zero points along the field's +Y axis,
/// and positive headings rotate towards +X.
pub fn heading_towards(from: Point2d, to: Point2d) -> Rad<f64> {
    let d = to - from;
    Rad(d.x.atan2(d.y))
}

/// The unit vector of a field heading.
pub fn heading_vector(heading: Rad<f64>) -> Vector2d {
    let (sin, cos) = heading.sin_cos();
    Vector2d::new(sin, cos)
}

/// Rotates a field-relative velocity into the robot's body frame.
///
/// # Returns
/// A tuple containing the forward and strafe components.
pub fn field_to_body(velocity: Vector2d, heading: Rad<f64>) -> (f64, f64) {
    let (sin, cos) = heading.sin_cos();
    let forward = velocity.x * sin + velocity.y * cos;
    let strafe = velocity.x * cos - velocity.y * sin;
    (forward, strafe)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn unwrap_crosses_seam() {
        let reference = Rad(0.9 * PI);
        let angle = unwrap_near(Rad(-0.9 * PI), reference);
        assert_approx_eq!(angle.0, 1.1 * PI);

        let angle = unwrap_near(Rad(5.0 * PI), Rad(0.0));
        assert_approx_eq!(angle.0, PI);
    }

    #[test]
    fn heading_zero_points_up_field() {
        let h = heading_towards(Point2d::new(1.0, 1.0), Point2d::new(1.0, 5.0));
        assert_approx_eq!(h.0, 0.0);
        let h = heading_towards(Point2d::new(1.0, 1.0), Point2d::new(3.0, 1.0));
        assert_approx_eq!(h.0, 0.5 * PI);
        let v = heading_vector(h);
        assert_approx_eq!(v.x, 1.0);
        assert_approx_eq!(v.y, 0.0);
    }

    #[test]
    fn body_frame_velocity() {
        // Driving along +X while facing up field is a pure strafe
        let (forward, strafe) = field_to_body(Vector2d::new(10.0, 0.0), Rad(0.0));
        assert_approx_eq!(forward, 0.0);
        assert_approx_eq!(strafe, 10.0);

        // Facing +X turns the same motion into pure forward motion
        let (forward, strafe) = field_to_body(Vector2d::new(10.0, 0.0), Rad(0.5 * PI));
        assert_approx_eq!(forward, 10.0);
        assert_approx_eq!(strafe, 0.0);
    }
}
