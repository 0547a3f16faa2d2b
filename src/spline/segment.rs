use super::Spline;
use crate::control_point::ControlPoint;
use crate::math::{blend_weights, Point2d, Vector2d};
use crate::util::Interval;
use crate::ControlPointId;
use cgmath::Rad;

/// The portion of a path between two adjacent control points,
/// prepared for repeated evaluation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Segment {
    pub start: ControlPointId,
    pub end: ControlPointId,
    /// The path times of the start and end control points.
    pub time: Interval<f64>,
    /// Rows are the start value, end value, start out-tangent and end in-tangent;
    /// columns are x, y and heading.
    coeffs: [[f64; 3]; 4],
}

/// The result of evaluating a [Segment].
#[derive(Clone, Copy, Debug)]
pub(crate) struct SegmentSample {
    pub position: Point2d,
    pub heading: Rad<f64>,
    /// The field velocity in m/s.
    pub velocity: Vector2d,
    /// The rate of change of heading in rad/s.
    pub heading_rate: f64,
}

impl Segment {
    pub fn new(spline: &Spline, start: ControlPointId, end: ControlPointId) -> Self {
        let (a, b) = (&spline.points[start], &spline.points[end]);
        let time = Interval::new(a.time, b.time);
        let duration = time.length();
        Self {
            start,
            end,
            time,
            coeffs: [
                [a.position.x, a.position.y, a.heading.0],
                [b.position.x, b.position.y, b.heading.0],
                time_scaled_tangent(a, duration),
                time_scaled_tangent(b, duration),
            ],
        }
    }

    /// Evaluates the segment at a path time, which should lie within [Self::time].
    pub fn evaluate(&self, path_time: f64) -> SegmentSample {
        let s = self.time.inv_lerp(path_time);
        let (weights, d_weights) = blend_weights(s);

        let mut field = [0.0; 3];
        let mut d_field = [0.0; 3];
        for i in 0..3 {
            for j in 0..4 {
                field[i] += weights[j] * self.coeffs[j][i];
                d_field[i] += d_weights[j] * self.coeffs[j][i];
            }
        }

        // Convert from per unit `s` to per second
        let duration = self.time.length();
        let d_field = d_field.map(|d| d / duration);

        SegmentSample {
            position: Point2d::new(field[0], field[1]),
            heading: Rad(field[2]),
            velocity: Vector2d::new(d_field[0], d_field[1]),
            heading_rate: d_field[2],
        }
    }
}

/// Scales a control point's tangents from per second to per unit of the segment parameter,
/// for a segment lasting `duration` seconds. This is the in-tangent when the point ends the
/// segment and the out-tangent when it starts it.
fn time_scaled_tangent(point: &ControlPoint, duration: f64) -> [f64; 3] {
    [
        point.tangent.x * duration,
        point.tangent.y * duration,
        point.heading_tangent * duration,
    ]
}
