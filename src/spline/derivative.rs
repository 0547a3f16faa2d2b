//! Automatic tangent computation.
//!
//! Tangents of [TangentMode::Auto] points follow the cardinal spline rule
//! `tension * (next - prev)`. The first and last points have only one neighbour, so their
//! tangent is the neighbour's tangent reflected about the chord between the two points.
//! That makes an end tangent depend on its neighbour's tangent, which is why edits refresh
//! interior points before end points.

use super::Spline;
use crate::control_point::TangentMode;
use crate::math::{reflect_about, unit_chord, Vector2d, ZERO_TOLERANCE};
use crate::ControlPointId;
use cgmath::prelude::*;
use itertools::Itertools;
use smallvec::SmallVec;

/// The tension scaling automatic position tangents.
/// Chosen empirically.
pub(crate) const DEFAULT_TENSION: f64 = 0.85;

/// The tension scaling automatic heading tangents.
pub(crate) const DEFAULT_HEADING_TENSION: f64 = 0.55;

type PointList = SmallVec<[ControlPointId; 8]>;

impl Spline {
    /// Computes the tangent the automatic rule gives a control point,
    /// regardless of its current [TangentMode].
    pub(crate) fn auto_tangent(&self, id: ControlPointId) -> Vector2d {
        let point = &self.points[id];
        let prev = point.prev.map(|id| &self.points[id]);
        let next = point.next.map(|id| &self.points[id]);

        match (prev, next) {
            (None, Some(next)) if next.next.is_some() => {
                if let Some(chord) = unit_chord(point.position, next.position) {
                    return reflected_tangent(chord, next.tangent);
                }
            }
            (Some(prev), None) if prev.prev.is_some() => {
                if let Some(chord) = unit_chord(prev.position, point.position) {
                    return reflected_tangent(chord, prev.tangent);
                }
            }
            _ => {}
        }

        let before = prev.map_or(point.position, |p| p.position);
        let after = next.map_or(point.position, |p| p.position);
        DEFAULT_TENSION * (after - before)
    }

    /// Computes the heading tangent of a control point.
    /// Missing neighbours are extrapolated linearly from the one that exists.
    pub(crate) fn auto_heading_tangent(&self, id: ControlPointId) -> f64 {
        let point = &self.points[id];
        let heading = point.heading.0;
        let prev = point.prev.map(|id| self.points[id].heading.0);
        let next = point.next.map(|id| self.points[id].heading.0);

        let (before, after) = match (prev, next) {
            (None, None) => return 0.0,
            (Some(prev), Some(next)) => (prev, next),
            (None, Some(next)) => (2.0 * heading - next, next),
            (Some(prev), None) => (prev, 2.0 * heading - prev),
        };
        DEFAULT_HEADING_TENSION * (after - before)
    }

    /// Recomputes the tangent of a control point if it is automatic.
    fn refresh_tangent(&mut self, id: ControlPointId) {
        if self.points[id].tangent_mode == TangentMode::Auto {
            self.points[id].tangent = self.auto_tangent(id);
        }
    }

    /// Recomputes the automatic tangents affected by a change to the `seeds`.
    ///
    /// The affected points are the seeds and their neighbours, plus either end of the path
    /// whose only neighbour is affected.
    pub(crate) fn refresh_tangents(&mut self, seeds: &[ControlPointId]) {
        let mut affected = self.with_neighbours(seeds);
        let is_affected_end = |end: Option<ControlPointId>, inner: Option<ControlPointId>| {
            end.filter(|_| inner.map_or(false, |inner| affected.contains(&inner)))
        };
        let first = is_affected_end(self.first, self.first.and_then(|id| self.points[id].next));
        let last = is_affected_end(self.last, self.last.and_then(|id| self.points[id].prev));
        affected.extend(first.into_iter().chain(last));

        let (ends, interior): (PointList, PointList) = affected
            .into_iter()
            .unique()
            .partition(|id| self.is_end(*id));

        for id in interior.into_iter().chain(ends) {
            self.refresh_tangent(id);
        }
    }

    /// Recomputes the heading tangents of the `seeds` and their neighbours.
    pub(crate) fn refresh_heading_tangents(&mut self, seeds: &[ControlPointId]) {
        let updates = self
            .with_neighbours(seeds)
            .into_iter()
            .unique()
            .map(|id| (id, self.auto_heading_tangent(id)))
            .collect::<SmallVec<[_; 8]>>();
        for (id, heading_tangent) in updates {
            self.points[id].heading_tangent = heading_tangent;
        }
    }

    /// Recomputes every automatic tangent along the path.
    ///
    /// Points are refreshed in path order, then the first point again,
    /// since its tangent depends on the tangent of the point after it.
    pub fn recompute_tangents(&mut self) {
        let ids = self.ids().collect::<Vec<_>>();
        for &id in &ids {
            self.refresh_tangent(id);
            self.points[id].heading_tangent = self.auto_heading_tangent(id);
        }
        if let Some(first) = self.first {
            self.refresh_tangent(first);
        }
    }

    /// The given points along with their immediate neighbours.
    fn with_neighbours(&self, seeds: &[ControlPointId]) -> PointList {
        seeds
            .iter()
            .flat_map(|&id| {
                let point = &self.points[id];
                [point.prev, Some(id), point.next]
            })
            .flatten()
            .collect()
    }

    fn is_end(&self, id: ControlPointId) -> bool {
        let point = &self.points[id];
        point.prev.is_none() || point.next.is_none()
    }
}

/// The tangent of an end point, given the unit chord towards (or from) its only neighbour
/// and that neighbour's tangent.
///
/// A stationary neighbour gives a zero tangent.
fn reflected_tangent(chord: Vector2d, neighbour_tangent: Vector2d) -> Vector2d {
    let speed = neighbour_tangent.magnitude();
    if speed > ZERO_TOLERANCE {
        reflect_about(neighbour_tangent / speed, chord) * speed
    } else {
        Vector2d::zero()
    }
}
