//! Error types.

use thiserror::Error;

/// A rejected edit of a [Spline](crate::Spline).
///
/// When an operation returns one of these the spline is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    /// The first control point fixes the start of the path in time.
    #[error("the time of the first control point cannot be changed")]
    FirstPointTime,

    #[error("control point time {time} is not finite")]
    NonFiniteTime { time: f64 },

    #[error("time {time} must be greater than the previous control point time {previous}")]
    TimeNotAfterPrevious { time: f64, previous: f64 },

    #[error("time {time} must be less than the next control point time {next}")]
    TimeNotBeforeNext { time: f64, next: f64 },

    /// The first control point defines the start of the path and cannot be removed.
    #[error("the first control point of a path cannot be deleted")]
    DeleteFirstPoint,

    /// Insertion needs an existing segment, i.e. at least two control points.
    #[error("there is no path to insert a control point into")]
    NoPathToInsert,

    #[error("insertion time {time} must be strictly between {start} and {end}")]
    InsertTimeOutOfRange { time: f64, start: f64, end: f64 },

    #[error("a control point already exists at time {time}")]
    TimeOccupied { time: f64 },

    /// The id does not refer to a control point of this spline (it may have been deleted).
    #[error("unknown control point")]
    UnknownControlPoint,

    #[error("speed multiplier must be positive, got {value}")]
    InvalidSpeedMultiplier { value: f64 },
}

/// A failure to read or write a path file.
#[derive(Error, Debug)]
pub enum PathFileError {
    #[error("path file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed path document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed, but does not describe a valid path.
    #[error("invalid path document: {0}")]
    Invalid(String),
}
