use crate::action::RobotAction;
use crate::math::{heading_vector, Point2d, Vector2d};
use crate::ControlPointId;
use cgmath::Rad;

/// A scale factor applied to the tangent when positioning its editing handle.
pub(crate) const DERIVATIVE_UI_SCALE: f64 = 0.5;

/// The distance of the heading editing handle from the control point, in m.
pub(crate) const HEADING_HANDLE_LENGTH: f64 = 1.0;

/// Whether a control point's tangent follows its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TangentMode {
    /// The tangent is recomputed whenever this point or its neighbours change.
    Auto,
    /// The tangent was set explicitly and is preserved through edits.
    Manual,
}

/// A waypoint on a [Spline](crate::Spline).
///
/// Control points are owned by their spline and edited through it,
/// since most edits also change the tangents of neighbouring points.
#[derive(Clone, Debug)]
pub struct ControlPoint {
    /// The preceding control point.
    pub(crate) prev: Option<ControlPointId>,
    /// The succeeding control point.
    pub(crate) next: Option<ControlPointId>,
    /// The field position in m.
    pub(crate) position: Point2d,
    /// The robot heading; unwrapped so consecutive headings differ by at most π.
    pub(crate) heading: Rad<f64>,
    /// The path time at which this point is reached, in s.
    pub(crate) time: f64,
    /// The field velocity at this point, in m/s.
    pub(crate) tangent: Vector2d,
    pub(crate) tangent_mode: TangentMode,
    /// The rate of change of heading at this point, in rad/s.
    pub(crate) heading_tangent: f64,
    /// A halt-and-run action performed at this point.
    pub(crate) action: Option<RobotAction>,
}

impl ControlPoint {
    pub(crate) fn new(time: f64) -> Self {
        Self {
            prev: None,
            next: None,
            position: Point2d::new(0.0, 0.0),
            heading: Rad(0.0),
            time,
            tangent: Vector2d::new(0.0, 0.0),
            tangent_mode: TangentMode::Auto,
            heading_tangent: 0.0,
            action: None,
        }
    }

    /// The preceding control point, if this is not the first.
    pub fn prev(&self) -> Option<ControlPointId> {
        self.prev
    }

    /// The succeeding control point, if this is not the last.
    pub fn next(&self) -> Option<ControlPointId> {
        self.next
    }

    /// The field position in m.
    pub fn position(&self) -> Point2d {
        self.position
    }

    pub fn heading(&self) -> Rad<f64> {
        self.heading
    }

    /// The path time at which this point is reached, in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The field velocity at this point, in m/s.
    pub fn tangent(&self) -> Vector2d {
        self.tangent
    }

    pub fn tangent_mode(&self) -> TangentMode {
        self.tangent_mode
    }

    /// The rate of change of heading at this point, in rad/s.
    pub fn heading_tangent(&self) -> f64 {
        self.heading_tangent
    }

    /// The halt-and-run action at this point, if there is one.
    pub fn robot_action(&self) -> Option<&RobotAction> {
        self.action.as_ref()
    }

    /// The field location of the handle used to edit the tangent.
    pub fn tangent_handle(&self) -> Point2d {
        self.position + DERIVATIVE_UI_SCALE * self.tangent
    }

    /// The field location of the handle used to edit the heading.
    pub fn heading_handle(&self) -> Point2d {
        self.position + HEADING_HANDLE_LENGTH * heading_vector(self.heading)
    }
}
