//! Generating points along a path.

use crate::action::RobotAction;
use crate::control_point::ControlPoint;
use crate::math::{field_to_body, Point2d, Vector2d};
use crate::spline::{Segment, SegmentSample};
use crate::{ControlPointId, Spline};
use cgmath::prelude::*;
use cgmath::Rad;
use log::trace;

/// The state of the robot at a point in time along a path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPoint {
    /// The time this point was requested for, in s.
    pub time: f64,
    /// The field position in m.
    pub position: Point2d,
    pub heading: Rad<f64>,
    /// The field-relative velocity in m/s, at a speed multiplier of 1.
    pub field_velocity: Vector2d,
    /// The rate of change of heading in rad/s, at a speed multiplier of 1.
    pub field_heading_rate: f64,
    /// The robot-relative forward speed in m/s.
    pub speed_forward: f64,
    /// The robot-relative strafe speed in m/s, positive to the right.
    pub speed_strafe: f64,
    /// The rotation speed in rad/s.
    pub speed_rotation: f64,
    /// An action to perform on reaching this point.
    pub action: Option<RobotAction>,
    /// The control point starting the segment this point lies on.
    pub segment_start: ControlPointId,
    /// The control point ending the segment this point lies on.
    pub segment_end: Option<ControlPointId>,
}

impl PathPoint {
    /// A point sampled from a segment.
    pub(crate) fn on_segment(
        time: f64,
        segment: &Segment,
        sample: SegmentSample,
        speed_multiplier: f64,
        action: Option<RobotAction>,
    ) -> Self {
        let (forward, strafe) = field_to_body(sample.velocity, sample.heading);
        Self {
            time,
            position: sample.position,
            heading: sample.heading,
            field_velocity: sample.velocity,
            field_heading_rate: sample.heading_rate,
            speed_forward: forward * speed_multiplier,
            speed_strafe: strafe * speed_multiplier,
            speed_rotation: sample.heading_rate * speed_multiplier,
            action,
            segment_start: segment.start,
            segment_end: Some(segment.end),
        }
    }

    /// The robot stopped at a control point to perform an action.
    fn halted_at(id: ControlPointId, point: &ControlPoint, action: RobotAction) -> Self {
        Self {
            time: point.time,
            position: point.position,
            heading: point.heading,
            field_velocity: Vector2d::zero(),
            field_heading_rate: 0.0,
            speed_forward: 0.0,
            speed_strafe: 0.0,
            speed_rotation: 0.0,
            action: Some(action),
            segment_start: id,
            segment_end: point.next,
        }
    }

    /// Whether the robot is stopped at this point.
    pub fn is_halted(&self) -> bool {
        self.action.as_ref().map_or(false, RobotAction::is_halt)
    }
}

#[derive(Clone, Copy, Debug)]
enum Cursor {
    /// No point has been generated yet.
    Start(Segment),
    /// Generating points on a segment.
    Within(Segment),
    /// Past the last control point, or the path has fewer than two points.
    Finished,
}

/// Generates points at monotonically increasing times along a path.
struct PathGenerator<'a> {
    spline: &'a Spline,
    speed_multiplier: f64,
    cursor: Cursor,
    /// The index of the next scheduled action to emit.
    next_action: usize,
}

impl<'a> PathGenerator<'a> {
    fn new(spline: &'a Spline, speed_multiplier: f64) -> Self {
        let cursor = spline.first_segment().map_or(Cursor::Finished, Cursor::Start);
        Self {
            spline,
            speed_multiplier,
            cursor,
            next_action: 0,
        }
    }

    fn has_segment(&self) -> bool {
        !matches!(self.cursor, Cursor::Finished)
    }

    fn point_at(&mut self, time: f64) -> Option<PathPoint> {
        let mut segment = match self.cursor {
            Cursor::Finished => return None,
            Cursor::Within(segment) => segment,
            Cursor::Start(segment) => {
                self.cursor = Cursor::Within(segment);
                if let Some(point) = self.halt_at(segment.start) {
                    return Some(point);
                }
                segment
            }
        };

        let path_time = time * self.speed_multiplier;
        while path_time > segment.time.max {
            let start = segment.end;
            match self.spline.point(start).next {
                Some(end) => {
                    segment = Segment::new(self.spline, start, end);
                    self.cursor = Cursor::Within(segment);
                    trace!("advanced to segment {:?}", segment.time);
                }
                None => self.cursor = Cursor::Finished,
            }
            if let Some(point) = self.halt_at(start) {
                return Some(point);
            }
            if !self.has_segment() {
                return None;
            }
        }

        let action = self.take_scheduled_action(path_time);
        Some(PathPoint::on_segment(
            time,
            &segment,
            segment.evaluate(path_time),
            self.speed_multiplier,
            action,
        ))
    }

    /// The halt point of a control point, if it has a halt-and-run action.
    fn halt_at(&self, id: ControlPointId) -> Option<PathPoint> {
        let point = self.spline.point(id);
        let action = point.action.clone()?;
        Some(PathPoint::halted_at(id, point, action))
    }

    /// Takes the next scheduled action if it is due.
    fn take_scheduled_action(&mut self, path_time: f64) -> Option<RobotAction> {
        let action = self
            .spline
            .scheduled_actions()
            .get(self.next_action)
            .filter(|action| action.path_time <= path_time)?;
        self.next_action += 1;
        Some(action.to_action())
    }
}

/// An iterator over points along a path at a fixed time interval.
///
/// Created by [Spline::curve_segments] and [Spline::curve_segments_with_delta].
pub struct PathIterator<'a> {
    generator: PathGenerator<'a>,
    time: f64,
    delta: f64,
}

impl<'a> PathIterator<'a> {
    /// Creates an iterator that steps `delta` seconds between points.
    /// `delta` and `speed_multiplier` must be positive.
    pub(crate) fn new(spline: &'a Spline, delta: f64, speed_multiplier: f64) -> Self {
        Self {
            generator: PathGenerator::new(spline, speed_multiplier),
            time: 0.0,
            delta,
        }
    }
}

impl<'a> Iterator for PathIterator<'a> {
    type Item = PathPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.generator.spline.time_span()?.max;
        if !self.generator.has_segment() || self.time * self.generator.speed_multiplier > end {
            return None;
        }
        let point = self.generator.point_at(self.time);
        self.time += self.delta;
        point
    }
}

/// Generates points along a path at caller-supplied times, as in a robot control loop
/// where the interval between calls varies.
///
/// Created by [Spline::path_follower].
pub struct PathFollower<'a> {
    generator: PathGenerator<'a>,
}

impl<'a> PathFollower<'a> {
    /// `speed_multiplier` must be positive.
    pub(crate) fn new(spline: &'a Spline, speed_multiplier: f64) -> Self {
        Self {
            generator: PathGenerator::new(spline, speed_multiplier),
        }
    }

    /// Gets the point on the path at the given time since the path started.
    ///
    /// Times must increase from call to call.
    ///
    /// # Returns
    /// The path point, or `None` once the time is past the last control point.
    pub fn point_at(&mut self, time: f64) -> Option<PathPoint> {
        self.generator.point_at(time)
    }
}
