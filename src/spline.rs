use crate::action::{ActionSchedule, RobotAction};
use crate::control_point::{ControlPoint, TangentMode, DERIVATIVE_UI_SCALE};
use crate::error::SplineError;
use crate::math::{heading_towards, unwrap_near, Point2d, Vector2d};
use crate::path::{PathFollower, PathIterator, PathPoint};
use crate::util::Interval;
use crate::{ControlPointId, ControlPointSet};
use cgmath::prelude::*;
use cgmath::Rad;
use itertools::Itertools;
use log::{debug, warn};

pub(crate) use segment::{Segment, SegmentSample};

mod derivative;
mod file;
mod segment;

/// The default interval between points generated by [Spline::curve_segments], in s.
pub const DEFAULT_PATH_DELTA: f64 = 0.05;

/// The title of a newly created path.
pub const DEFAULT_TITLE: &str = "untitled";

/// The description of a newly created path.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// The time between an appended control point and the previous last point, in s.
const DEFAULT_SEGMENT_DURATION: f64 = 1.0;

/// A Kochanek-Bartels spline describing a robot path through time.
///
/// The spline owns a sequence of [ControlPoint]s ordered by strictly increasing time,
/// and a schedule of commands to run in parallel with path following.
/// Tangents of automatic control points are kept up to date as the path is edited.
///
/// Points along the path are generated with [Spline::curve_segments] or
/// [Spline::path_follower]. Both borrow the spline, so it cannot be edited while they are in use.
#[derive(Clone, Debug)]
pub struct Spline {
    /// The title of the path.
    title: String,
    /// A description of the path.
    description: String,
    /// Scales the rate at which the path is followed.
    speed_multiplier: f64,
    /// The control points.
    points: ControlPointSet,
    /// The first control point, which fixes the start time of the path.
    first: Option<ControlPointId>,
    /// The last control point.
    last: Option<ControlPointId>,
    /// Commands to start at given times along the path.
    schedule: ActionSchedule,
}

impl Default for Spline {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            speed_multiplier: 1.0,
            points: Default::default(),
            first: None,
            last: None,
            schedule: Default::default(),
        }
    }
}

impl Spline {
    /// Creates an empty path.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Gets the speed multiplier. [Read more](Self::set_speed_multiplier).
    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Sets the speed multiplier, which must be positive.
    ///
    /// Generators map a query time `t` to the path time `t * multiplier` and scale the
    /// robot speeds they report to match. Control point times are unaffected.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) -> Result<(), SplineError> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(rejected(SplineError::InvalidSpeedMultiplier { value: multiplier }));
        }
        self.speed_multiplier = multiplier;
        Ok(())
    }

    /// Removes all control points and scheduled commands, and restores the default
    /// title, description and speed multiplier.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The first control point, if any.
    pub fn first(&self) -> Option<ControlPointId> {
        self.first
    }

    /// The last control point, if any.
    pub fn last(&self) -> Option<ControlPointId> {
        self.last
    }

    /// Gets a control point, or `None` if it is not part of this spline.
    pub fn control_point(&self, id: ControlPointId) -> Option<&ControlPoint> {
        self.points.get(id)
    }

    /// Returns an iterator over the control points in path order.
    pub fn control_points(&self) -> impl Iterator<Item = (ControlPointId, &ControlPoint)> {
        self.ids().map(|id| (id, &self.points[id]))
    }

    /// The time span from the first to the last control point.
    pub fn time_span(&self) -> Option<Interval<f64>> {
        let (first, last) = (self.first?, self.last?);
        Some(Interval::new(self.points[first].time, self.points[last].time))
    }

    /// Appends a control point one second after the current last point,
    /// or at time zero if the path is empty.
    pub fn add_control_point(&mut self, position: Point2d, heading: Rad<f64>) -> ControlPointId {
        let time = self
            .last
            .map_or(0.0, |id| self.points[id].time + DEFAULT_SEGMENT_DURATION);
        self.add_control_point_at(position, heading, time)
    }

    /// Appends a control point at the given time.
    ///
    /// The first control point is always placed at time zero. A time that is not after the
    /// current last point, or is not finite, is replaced by one second after it.
    pub fn add_control_point_at(
        &mut self,
        position: Point2d,
        heading: Rad<f64>,
        time: f64,
    ) -> ControlPointId {
        let time = match self.last {
            None => 0.0,
            Some(last) if !(time.is_finite() && time > self.points[last].time) => {
                self.points[last].time + DEFAULT_SEGMENT_DURATION
            }
            Some(_) => time,
        };

        let id = self.points.insert(ControlPoint {
            prev: self.last,
            ..ControlPoint::new(time)
        });
        match self.last {
            Some(last) => self.points[last].next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
        debug!("appended control point at t={time}");

        self.set_position(id, position);
        self.set_heading(id, heading);
        id
    }

    /// Inserts a control point at a time strictly between the first and last points.
    ///
    /// The new point takes the position, heading and velocity of the path at that time,
    /// with the velocity as a manual tangent, so the shape and timing of the path are
    /// preserved.
    pub fn insert_control_point(&mut self, time: f64) -> Result<ControlPointId, SplineError> {
        let span = match (self.first, self.last) {
            (Some(first), Some(last)) if first != last => self.time_span(),
            _ => None,
        }
        .ok_or_else(|| rejected(SplineError::NoPathToInsert))?;
        if !span.contains_open(time) {
            return Err(rejected(SplineError::InsertTimeOutOfRange {
                time,
                start: span.min,
                end: span.max,
            }));
        }
        let segment = self
            .segment_at(time)
            .ok_or_else(|| rejected(SplineError::NoPathToInsert))?;
        if time == segment.time.max {
            return Err(rejected(SplineError::TimeOccupied { time }));
        }

        let sample = segment.evaluate(time);
        let id = self.points.insert(ControlPoint {
            prev: Some(segment.start),
            next: Some(segment.end),
            position: sample.position,
            heading: sample.heading,
            tangent: sample.velocity,
            tangent_mode: TangentMode::Manual,
            ..ControlPoint::new(time)
        });
        self.points[segment.start].next = Some(id);
        self.points[segment.end].prev = Some(id);
        debug!("inserted control point at t={time}");

        self.refresh_tangents(&[id]);
        self.refresh_heading_tangents(&[id]);
        Ok(id)
    }

    /// Deletes a control point. The times of the other points are unchanged.
    ///
    /// The first control point cannot be deleted, since it defines the start of the path;
    /// this includes the only point of a single-point path.
    pub fn delete_control_point(&mut self, id: ControlPointId) -> Result<(), SplineError> {
        let point = self
            .points
            .get(id)
            .ok_or_else(|| rejected(SplineError::UnknownControlPoint))?;
        let prev = point
            .prev
            .ok_or_else(|| rejected(SplineError::DeleteFirstPoint))?;
        let next = point.next;

        self.points.remove(id);
        self.points[prev].next = next;
        match next {
            Some(next) => self.points[next].prev = Some(prev),
            None => self.last = Some(prev),
        }
        debug!("deleted control point");

        let neighbours = [Some(prev), next].into_iter().flatten().collect::<Vec<_>>();
        self.refresh_tangents(&neighbours);
        self.refresh_heading_tangents(&neighbours);
        Ok(())
    }

    /// Moves a control point, updating the automatic tangents that depend on its position.
    ///
    /// # Panics
    /// Panics if the control point is not part of this spline.
    pub fn set_position(&mut self, id: ControlPointId, position: Point2d) {
        self.points[id].position = position;
        self.refresh_tangents(&[id]);
    }

    /// Sets the tangent (field velocity) of a control point and marks it as manually edited,
    /// so it is preserved through later edits.
    ///
    /// A point with a halt-and-run action keeps a zero tangent until the action is cleared.
    ///
    /// # Panics
    /// Panics if the control point is not part of this spline.
    pub fn set_tangent(&mut self, id: ControlPointId, tangent: Vector2d) {
        let point = &mut self.points[id];
        point.tangent = if point.action.is_some() {
            Vector2d::zero()
        } else {
            tangent
        };
        point.tangent_mode = TangentMode::Manual;
        self.refresh_tangents(&[id]);
    }

    /// Sets the tangent by placing its editing handle. [Read more](Self::set_tangent).
    pub fn set_tangent_handle(&mut self, id: ControlPointId, handle: Point2d) {
        let tangent = (handle - self.points[id].position) / DERIVATIVE_UI_SCALE;
        self.set_tangent(id, tangent);
    }

    /// Returns a manually edited tangent to automatic control.
    /// Does nothing while the point has a halt-and-run action, since the robot must stop there.
    ///
    /// # Panics
    /// Panics if the control point is not part of this spline.
    pub fn reset_tangent(&mut self, id: ControlPointId) {
        let point = &self.points[id];
        if point.tangent_mode == TangentMode::Manual && point.action.is_none() {
            self.points[id].tangent_mode = TangentMode::Auto;
            self.refresh_tangents(&[id]);
            self.refresh_heading_tangents(&[id]);
        }
    }

    /// Sets the heading of a control point.
    ///
    /// The heading is shifted by whole turns to lie within ±π of the current heading,
    /// so the robot never turns the long way around.
    ///
    /// # Panics
    /// Panics if the control point is not part of this spline.
    pub fn set_heading(&mut self, id: ControlPointId, heading: Rad<f64>) {
        let point = &mut self.points[id];
        point.heading = unwrap_near(heading, point.heading);
        self.refresh_heading_tangents(&[id]);
    }

    /// Points the heading of a control point towards the given field location.
    pub fn set_heading_handle(&mut self, id: ControlPointId, handle: Point2d) {
        let heading = heading_towards(self.points[id].position, handle);
        self.set_heading(id, heading);
    }

    /// Sets the time at which a control point is reached.
    ///
    /// The time must lie strictly between the times of the neighbouring control points, and
    /// the first point's time cannot be changed. Without `propagate` only this point moves in
    /// time; with it, every later control point and every command scheduled after this point's
    /// old time shifts by the same amount.
    pub fn set_time(
        &mut self,
        id: ControlPointId,
        time: f64,
        propagate: bool,
    ) -> Result<(), SplineError> {
        self.check_time(id, time).map_err(rejected)?;

        let old_time = self.points[id].time;
        let delta = time - old_time;
        self.points[id].time = time;
        if propagate {
            let later = std::iter::successors(self.points[id].next, |id| self.points[*id].next)
                .collect::<Vec<_>>();
            for id in later {
                self.points[id].time += delta;
            }
            self.schedule.shift_after(old_time, delta);
        }
        debug!("moved control point from t={old_time} to t={time} (propagate: {propagate})");
        Ok(())
    }

    fn check_time(&self, id: ControlPointId, time: f64) -> Result<(), SplineError> {
        let point = self
            .points
            .get(id)
            .ok_or(SplineError::UnknownControlPoint)?;
        let previous = self.points[point.prev.ok_or(SplineError::FirstPointTime)?].time;
        if !time.is_finite() {
            return Err(SplineError::NonFiniteTime { time });
        }
        if !(time > previous) {
            return Err(SplineError::TimeNotAfterPrevious { time, previous });
        }
        if let Some(next) = point.next.map(|id| self.points[id].time) {
            if !(time < next) {
                return Err(SplineError::TimeNotBeforeNext { time, next });
            }
        }
        Ok(())
    }

    /// Sets or clears the halt-and-run action of a control point.
    ///
    /// Setting an action stops the robot at the point by fixing its tangent at zero.
    /// Clearing it returns the tangent to automatic control.
    ///
    /// # Parameters
    /// * `command` - The command to run, or `None` to clear the action
    /// * `approx_duration` - An estimate of how long the command takes, in s, used for planning
    ///
    /// # Panics
    /// Panics if the control point is not part of this spline.
    pub fn set_robot_action(
        &mut self,
        id: ControlPointId,
        command: Option<&str>,
        approx_duration: f64,
    ) {
        match command {
            Some(command) => {
                self.points[id].action = Some(RobotAction::HaltAndRun {
                    command: command.to_owned(),
                    approx_duration,
                });
                self.set_tangent(id, Vector2d::zero());
            }
            None => {
                if self.points[id].action.take().is_some() {
                    self.reset_tangent(id);
                }
            }
        }
    }

    /// Schedules a command to start at a time along the path without stopping the robot.
    pub fn schedule_command(&mut self, path_time: f64, command: &str) -> RobotAction {
        self.schedule.schedule(path_time, command)
    }

    /// Removes a scheduled command. Returns whether it was found.
    pub fn delete_scheduled_command(&mut self, action: &RobotAction) -> bool {
        self.schedule.remove(action)
    }

    /// The commands scheduled along the path, in time order.
    pub fn scheduled_actions(&self) -> &ActionSchedule {
        &self.schedule
    }

    /// Evaluates the path at a path time, ignoring the speed multiplier.
    ///
    /// Returns `None` if the path has fewer than two control points,
    /// or the time lies outside of it.
    pub fn evaluate(&self, time: f64) -> Option<PathPoint> {
        let segment = self.segment_at(time)?;
        Some(PathPoint::on_segment(
            time,
            &segment,
            segment.evaluate(time),
            1.0,
            None,
        ))
    }

    /// Returns an iterator over points along the path every [DEFAULT_PATH_DELTA] seconds.
    pub fn curve_segments(&self) -> PathIterator<'_> {
        self.curve_segments_with_delta(DEFAULT_PATH_DELTA)
    }

    /// Returns an iterator over points along the path every `delta` seconds.
    ///
    /// A `delta` that is not positive and finite is replaced by [DEFAULT_PATH_DELTA].
    pub fn curve_segments_with_delta(&self, delta: f64) -> PathIterator<'_> {
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            warn!("invalid path delta {delta}, using {DEFAULT_PATH_DELTA}");
            DEFAULT_PATH_DELTA
        };
        PathIterator::new(self, delta, self.speed_multiplier)
    }

    /// Creates a follower that generates points along the path at increasing times.
    pub fn path_follower(&self) -> PathFollower<'_> {
        PathFollower::new(self, self.speed_multiplier)
    }

    pub(crate) fn point(&self, id: ControlPointId) -> &ControlPoint {
        &self.points[id]
    }

    /// The segment starting at the first control point.
    pub(crate) fn first_segment(&self) -> Option<Segment> {
        let first = self.first?;
        let next = self.points[first].next?;
        Some(Segment::new(self, first, next))
    }

    /// The first segment whose time span contains the path time.
    fn segment_at(&self, time: f64) -> Option<Segment> {
        if !self.time_span()?.contains(time) {
            return None;
        }
        self.ids()
            .tuple_windows()
            .find(|(_, end)| time <= self.points[*end].time)
            .map(|(start, end)| Segment::new(self, start, end))
    }

    /// The control point ids in path order.
    fn ids(&self) -> impl Iterator<Item = ControlPointId> + '_ {
        std::iter::successors(self.first, |id| self.points[*id].next)
    }
}

/// Logs a rejected edit.
fn rejected(err: SplineError) -> SplineError {
    warn!("rejected path edit: {err}");
    err
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    fn four_points() -> (Spline, Vec<ControlPointId>) {
        let mut spline = Spline::new();
        let ids = (0..4)
            .map(|i| spline.add_control_point(Point2d::new(10.0 * i as f64, 0.0), Rad(0.0)))
            .collect();
        (spline, ids)
    }

    fn times(spline: &Spline) -> Vec<f64> {
        spline.control_points().map(|(_, p)| p.time()).collect()
    }

    #[test]
    fn appended_points_are_a_second_apart() {
        let (spline, ids) = four_points();
        assert_eq!(times(&spline), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(spline.first(), Some(ids[0]));
        assert_eq!(spline.last(), Some(ids[3]));
        assert_eq!(spline.len(), 4);
    }

    #[test]
    fn append_coerces_invalid_times() {
        let mut spline = Spline::new();
        spline.add_control_point_at(Point2d::new(0.0, 0.0), Rad(0.0), 5.0);
        spline.add_control_point_at(Point2d::new(1.0, 0.0), Rad(0.0), 2.5);
        spline.add_control_point_at(Point2d::new(2.0, 0.0), Rad(0.0), 1.0);
        assert_eq!(times(&spline), vec![0.0, 2.5, 3.5]);
    }

    #[test]
    fn links_are_consistent() {
        let (spline, ids) = four_points();
        for (i, id) in ids.iter().enumerate() {
            let point = spline.control_point(*id).unwrap();
            assert_eq!(point.prev(), i.checked_sub(1).map(|i| ids[i]));
            assert_eq!(point.next(), ids.get(i + 1).copied());
        }
    }

    #[test]
    fn set_time_without_propagation() {
        let (mut spline, ids) = four_points();
        spline.set_time(ids[1], 1.1, false).unwrap();
        let t = times(&spline);
        for (actual, expected) in t.iter().zip([0.0, 1.1, 2.0, 3.0]) {
            assert_approx_eq!(actual, expected, 0.00001);
        }
    }

    #[test]
    fn set_time_with_propagation() {
        let (mut spline, ids) = four_points();
        spline.schedule_command(0.5, "early");
        spline.schedule_command(1.5, "late");
        spline.set_time(ids[1], 1.1, true).unwrap();
        let t = times(&spline);
        for (actual, expected) in t.iter().zip([0.0, 1.1, 2.1, 3.1]) {
            assert_approx_eq!(actual, expected, 0.00001);
        }
        let scheduled = spline
            .scheduled_actions()
            .iter()
            .map(|a| a.path_time)
            .collect::<Vec<_>>();
        assert_approx_eq!(scheduled[0], 0.5);
        assert_approx_eq!(scheduled[1], 1.6);
    }

    #[test]
    fn set_time_rejections() {
        let (mut spline, ids) = four_points();
        assert_eq!(
            spline.set_time(ids[0], 0.5, false),
            Err(SplineError::FirstPointTime)
        );
        assert_eq!(
            spline.set_time(ids[1], 0.0, false),
            Err(SplineError::TimeNotAfterPrevious {
                time: 0.0,
                previous: 0.0
            })
        );
        assert_eq!(
            spline.set_time(ids[1], 2.0, true),
            Err(SplineError::TimeNotBeforeNext {
                time: 2.0,
                next: 2.0
            })
        );
        assert_eq!(times(&spline), vec![0.0, 1.0, 2.0, 3.0]);

        // The last point only has a lower bound
        spline.set_time(ids[3], 10.0, false).unwrap();
        assert_eq!(times(&spline), vec![0.0, 1.0, 2.0, 10.0]);
    }

    #[test]
    fn delete_guards() {
        let mut spline = Spline::new();
        let first = spline.add_control_point(Point2d::new(0.0, 0.0), Rad(0.0));
        assert_eq!(
            spline.delete_control_point(first),
            Err(SplineError::DeleteFirstPoint)
        );
        let second = spline.add_control_point(Point2d::new(5.0, 0.0), Rad(0.0));
        assert_eq!(
            spline.delete_control_point(first),
            Err(SplineError::DeleteFirstPoint)
        );
        assert_eq!(spline.len(), 2);
        spline.delete_control_point(second).unwrap();
        assert_eq!(spline.len(), 1);
        assert_eq!(spline.last(), Some(first));
        assert_eq!(
            spline.delete_control_point(second),
            Err(SplineError::UnknownControlPoint)
        );
    }

    #[test]
    fn delete_relinks_and_keeps_times() {
        let (mut spline, ids) = four_points();
        spline.delete_control_point(ids[2]).unwrap();
        assert_eq!(times(&spline), vec![0.0, 1.0, 3.0]);
        assert_eq!(spline.control_point(ids[1]).unwrap().next(), Some(ids[3]));
        assert_eq!(spline.control_point(ids[3]).unwrap().prev(), Some(ids[1]));
        for (id, point) in spline.control_points() {
            let expected = spline.auto_tangent(id);
            assert_approx_eq!(point.tangent().x, expected.x);
            assert_approx_eq!(point.tangent().y, expected.y);
        }
    }

    #[test]
    fn insert_guards() {
        let mut spline = Spline::new();
        spline.add_control_point(Point2d::new(0.0, 0.0), Rad(0.0));
        assert_eq!(
            spline.insert_control_point(0.0),
            Err(SplineError::NoPathToInsert)
        );
        assert_eq!(
            spline.insert_control_point(-0.1),
            Err(SplineError::NoPathToInsert)
        );
        spline.add_control_point_at(Point2d::new(5.0, 0.0), Rad(0.0), 0.5);
        assert!(matches!(
            spline.insert_control_point(-0.1),
            Err(SplineError::InsertTimeOutOfRange { .. })
        ));
        assert!(matches!(
            spline.insert_control_point(0.6),
            Err(SplineError::InsertTimeOutOfRange { .. })
        ));
        assert!(matches!(
            spline.insert_control_point(0.5),
            Err(SplineError::InsertTimeOutOfRange { .. })
        ));
        assert_eq!(spline.len(), 2);
    }

    #[test]
    fn insert_at_existing_time_is_rejected() {
        let (mut spline, _) = four_points();
        assert_eq!(
            spline.insert_control_point(2.0),
            Err(SplineError::TimeOccupied { time: 2.0 })
        );
        assert_eq!(spline.len(), 4);
    }

    #[test]
    fn inserted_point_carries_path_state() {
        let (mut spline, ids) = four_points();
        let expected = spline.evaluate(1.5).unwrap();
        let id = spline.insert_control_point(1.5).unwrap();
        let point = spline.control_point(id).unwrap();
        assert_eq!(point.tangent_mode(), TangentMode::Manual);
        assert_approx_eq!(point.time(), 1.5);
        assert_approx_eq!(point.position().x, expected.position.x);
        assert_approx_eq!(point.tangent().x, expected.field_velocity.x);
        assert_eq!(point.prev(), Some(ids[1]));
        assert_eq!(point.next(), Some(ids[2]));
        assert_eq!(times(&spline), vec![0.0, 1.0, 1.5, 2.0, 3.0]);
    }

    #[test]
    fn robot_action_zeroes_tangent_and_restores_it() {
        let (mut spline, ids) = four_points();
        let free = spline.control_point(ids[1]).unwrap().tangent();

        spline.set_robot_action(ids[1], Some("Shoot"), 2.0);
        let point = spline.control_point(ids[1]).unwrap();
        assert_eq!(
            point.robot_action(),
            Some(&RobotAction::HaltAndRun {
                command: "Shoot".into(),
                approx_duration: 2.0
            })
        );
        assert_eq!(point.tangent(), Vector2d::zero());
        assert_eq!(point.tangent_mode(), TangentMode::Manual);

        spline.set_robot_action(ids[1], None, 0.0);
        let point = spline.control_point(ids[1]).unwrap();
        assert!(point.robot_action().is_none());
        assert_eq!(point.tangent(), free);
        assert_eq!(point.tangent_mode(), TangentMode::Auto);
    }

    #[test]
    fn reset_tangent_restores_auto() {
        let (mut spline, ids) = four_points();
        let auto = spline.control_point(ids[2]).unwrap().tangent();
        spline.set_tangent(ids[2], Vector2d::new(1.0, 2.0));
        assert_eq!(
            spline.control_point(ids[2]).unwrap().tangent(),
            Vector2d::new(1.0, 2.0)
        );
        // Manual tangents survive moving the point
        spline.set_position(ids[2], Point2d::new(20.0, 5.0));
        assert_eq!(
            spline.control_point(ids[2]).unwrap().tangent(),
            Vector2d::new(1.0, 2.0)
        );
        spline.set_position(ids[2], Point2d::new(20.0, 0.0));
        spline.reset_tangent(ids[2]);
        assert_eq!(spline.control_point(ids[2]).unwrap().tangent(), auto);
    }

    #[test]
    fn tangent_handle_round_trip() {
        let (mut spline, ids) = four_points();
        spline.set_tangent_handle(ids[1], Point2d::new(12.0, 3.0));
        let point = spline.control_point(ids[1]).unwrap();
        assert_approx_eq!(point.tangent().x, 4.0);
        assert_approx_eq!(point.tangent().y, 6.0);
        assert_approx_eq!(point.tangent_handle().x, 12.0);
        assert_approx_eq!(point.tangent_handle().y, 3.0);
    }

    #[test]
    fn heading_stays_continuous_across_seam() {
        let (mut spline, ids) = four_points();
        spline.set_heading(ids[1], Rad(0.9 * PI));
        spline.set_heading(ids[1], Rad(-0.9 * PI));
        assert_approx_eq!(spline.control_point(ids[1]).unwrap().heading().0, 1.1 * PI);

        spline.set_heading_handle(ids[2], Point2d::new(21.0, 0.0));
        let point = spline.control_point(ids[2]).unwrap();
        assert_approx_eq!(point.heading().0, 0.5 * PI);
        assert_approx_eq!(point.heading_handle().x, 21.0);
        assert_approx_eq!(point.heading_handle().y, 0.0);
    }

    #[test]
    fn speed_multiplier_must_be_positive() {
        let mut spline = Spline::new();
        assert!(spline.set_speed_multiplier(0.0).is_err());
        assert!(spline.set_speed_multiplier(-1.0).is_err());
        assert!(spline.set_speed_multiplier(f64::NAN).is_err());
        spline.set_speed_multiplier(1.5).unwrap();
        assert_eq!(spline.speed_multiplier(), 1.5);
    }

    #[test]
    fn clear_restores_defaults() {
        let (mut spline, _) = four_points();
        spline.set_title("Two ball auto");
        spline.schedule_command(1.0, "Intake");
        spline.set_speed_multiplier(0.5).unwrap();
        spline.clear();
        assert!(spline.is_empty());
        assert!(spline.first().is_none());
        assert!(spline.scheduled_actions().is_empty());
        assert_eq!(spline.title(), DEFAULT_TITLE);
        assert_eq!(spline.description(), DEFAULT_DESCRIPTION);
        assert_eq!(spline.speed_multiplier(), 1.0);
    }

    #[test]
    fn non_finite_times_are_rejected() {
        let (mut spline, ids) = four_points();
        for time in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                spline.set_time(ids[2], time, false),
                Err(SplineError::NonFiniteTime { .. })
            ));
            assert!(spline.set_time(ids[3], time, true).is_err());
        }
        assert_eq!(times(&spline), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(spline.evaluate(1.5).unwrap().position.x.is_finite());
    }

    #[test]
    fn non_finite_append_times_are_coerced() {
        let (mut spline, _) = four_points();
        spline.add_control_point_at(Point2d::new(40.0, 0.0), Rad(0.0), f64::NAN);
        spline.add_control_point_at(Point2d::new(50.0, 0.0), Rad(0.0), f64::INFINITY);
        assert_eq!(times(&spline), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn halt_points_keep_zero_tangent() {
        let (mut spline, ids) = four_points();
        spline.set_robot_action(ids[1], Some("Shoot"), 1.0);

        spline.reset_tangent(ids[1]);
        spline.set_tangent(ids[1], Vector2d::new(3.0, 4.0));
        spline.set_tangent_handle(ids[1], Point2d::new(15.0, 5.0));
        spline.set_position(ids[1], Point2d::new(12.0, 1.0));

        let point = spline.control_point(ids[1]).unwrap();
        assert!(point.robot_action().is_some());
        assert_eq!(point.tangent(), Vector2d::zero());
        assert_eq!(point.tangent_mode(), TangentMode::Manual);

        spline.set_robot_action(ids[1], None, 0.0);
        let point = spline.control_point(ids[1]).unwrap();
        assert_eq!(point.tangent_mode(), TangentMode::Auto);
        assert_ne!(point.tangent(), Vector2d::zero());
    }

    #[test]
    fn backwards_propagation_keeps_schedule_ordered() {
        let (mut spline, ids) = four_points();
        spline.schedule_command(0.9, "a");
        spline.schedule_command(1.2, "b");
        spline.set_time(ids[1], 0.6, true).unwrap();
        spline.schedule_command(0.85, "c");
        let scheduled = spline
            .scheduled_actions()
            .iter()
            .map(|a| a.path_time)
            .collect::<Vec<_>>();
        assert_eq!(scheduled.len(), 3);
        assert!(scheduled.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invalid_path_delta_falls_back_to_default() {
        let (spline, _) = four_points();
        let expected = spline.curve_segments().count();
        assert_eq!(spline.curve_segments_with_delta(0.0).count(), expected);
        assert_eq!(spline.curve_segments_with_delta(-1.0).count(), expected);
        assert_eq!(spline.curve_segments_with_delta(f64::NAN).count(), expected);
    }
}
