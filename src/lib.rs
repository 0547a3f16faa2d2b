//! Time-parameterized Kochanek-Bartels splines for planning and following robot paths.

pub use action::{ActionSchedule, RobotAction, ScheduledAction};
pub use cgmath;
pub use control_point::{ControlPoint, TangentMode};
pub use error::{PathFileError, SplineError};
pub use path::{PathFollower, PathIterator, PathPoint};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use spline::{Spline, DEFAULT_DESCRIPTION, DEFAULT_PATH_DELTA, DEFAULT_TITLE};
pub use util::Interval;

mod action;
mod control_point;
mod error;
pub mod math;
mod path;
mod spline;
mod util;

new_key_type! {
    /// Unique ID of a [ControlPoint].
    pub struct ControlPointId;
}

type ControlPointSet = SlotMap<ControlPointId, ControlPoint>;
