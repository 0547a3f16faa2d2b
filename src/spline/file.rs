//! Reading and writing path files.
//!
//! A path file is a JSON document holding the title, description and speed multiplier of a
//! path, its control points in order, and its scheduled commands.

use super::{Spline, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use crate::action::RobotAction;
use crate::control_point::{ControlPoint, TangentMode};
use crate::error::PathFileError;
use crate::math::{Point2d, Vector2d};
use cgmath::prelude::*;
use cgmath::Rad;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct PathDocument {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_description")]
    description: String,
    #[serde(rename = "speedMultiplier", default = "default_speed_multiplier")]
    speed_multiplier: f64,
    #[serde(rename = "controlPoints")]
    control_points: Vec<ControlPointRecord>,
    #[serde(rename = "robotScheduledActions", default)]
    scheduled_actions: Vec<ScheduledActionRecord>,
}

#[derive(Serialize, Deserialize)]
struct ControlPointRecord {
    #[serde(rename = "fieldX", default)]
    x: f64,
    #[serde(rename = "fieldY", default)]
    y: f64,
    #[serde(rename = "fieldHeading", default)]
    heading: f64,
    #[serde(default)]
    time: f64,
    #[serde(rename = "derivativesEdited", default)]
    derivatives_edited: bool,
    #[serde(rename = "field_dX", default)]
    dx: f64,
    #[serde(rename = "field_dY", default)]
    dy: f64,
    #[serde(rename = "field_dHeading", default)]
    d_heading: f64,
    #[serde(
        rename = "robotActionCommand",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    command: Option<String>,
    #[serde(
        rename = "robotActionDuration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    duration: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct ScheduledActionRecord {
    #[serde(rename = "robotScheduledActionTime", default)]
    path_time: f64,
    #[serde(rename = "robotActionCommand")]
    command: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_owned()
}

fn default_speed_multiplier() -> f64 {
    1.0
}

impl ControlPointRecord {
    fn new(point: &ControlPoint) -> Self {
        let (command, duration) = match &point.action {
            Some(RobotAction::HaltAndRun {
                command,
                approx_duration,
            }) => (Some(command.clone()), Some(*approx_duration)),
            _ => (None, None),
        };
        Self {
            x: point.position.x,
            y: point.position.y,
            heading: point.heading.0,
            time: point.time,
            derivatives_edited: point.tangent_mode == TangentMode::Manual,
            dx: point.tangent.x,
            dy: point.tangent.y,
            d_heading: point.heading_tangent,
            command,
            duration,
        }
    }

    /// Halt points are stopped, whatever tangent the record holds.
    fn to_control_point(&self) -> ControlPoint {
        let halts = self.command.is_some();
        ControlPoint {
            position: Point2d::new(self.x, self.y),
            heading: Rad(self.heading),
            tangent: if halts {
                Vector2d::zero()
            } else {
                Vector2d::new(self.dx, self.dy)
            },
            tangent_mode: if self.derivatives_edited || halts {
                TangentMode::Manual
            } else {
                TangentMode::Auto
            },
            heading_tangent: self.d_heading,
            action: self.command.clone().map(|command| RobotAction::HaltAndRun {
                command,
                approx_duration: self.duration.unwrap_or(0.0),
            }),
            ..ControlPoint::new(self.time)
        }
    }
}

impl Spline {
    /// Parses a path from a JSON document.
    ///
    /// Automatic tangents are recomputed from the loaded points. Manually edited tangents are
    /// kept as stored.
    pub fn from_json_str(json: &str) -> Result<Self, PathFileError> {
        let document: PathDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Serializes the path to a JSON document.
    pub fn to_json_string(&self) -> Result<String, PathFileError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// Replaces this path with one read from a path file.
    /// If the file cannot be loaded the path is left unchanged.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), PathFileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        *self = Self::from_json_str(&json)?;
        info!(
            "loaded path '{}' with {} control points from {}",
            self.title,
            self.len(),
            path.display()
        );
        Ok(())
    }

    /// Writes this path to a path file.
    pub fn save_path(&self, path: impl AsRef<Path>) -> Result<(), PathFileError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_string()?)?;
        info!("saved path '{}' to {}", self.title, path.display());
        Ok(())
    }

    fn from_document(document: PathDocument) -> Result<Self, PathFileError> {
        let mut spline = Spline::new();
        spline.title = document.title;
        spline.description = document.description;
        spline
            .set_speed_multiplier(document.speed_multiplier)
            .map_err(|err| PathFileError::Invalid(err.to_string()))?;

        for record in &document.control_points {
            let point = record.to_control_point();
            if !point.time.is_finite() {
                return Err(PathFileError::Invalid(format!(
                    "control point time {} is not finite",
                    point.time
                )));
            }
            if let Some(last) = spline.last {
                let previous = spline.points[last].time;
                if !(point.time > previous) {
                    return Err(PathFileError::Invalid(format!(
                        "control point time {} is not after the previous time {}",
                        point.time, previous
                    )));
                }
            }
            let id = spline.points.insert(ControlPoint {
                prev: spline.last,
                ..point
            });
            match spline.last {
                Some(last) => spline.points[last].next = Some(id),
                None => spline.first = Some(id),
            }
            spline.last = Some(id);
        }

        for action in &document.scheduled_actions {
            spline.schedule.schedule(action.path_time, &action.command);
        }

        spline.recompute_tangents();
        Ok(spline)
    }

    fn to_document(&self) -> PathDocument {
        PathDocument {
            title: self.title.clone(),
            description: self.description.clone(),
            speed_multiplier: self.speed_multiplier,
            control_points: self
                .control_points()
                .map(|(_, point)| ControlPointRecord::new(point))
                .collect(),
            scheduled_actions: self
                .schedule
                .iter()
                .map(|action| ScheduledActionRecord {
                    path_time: action.path_time,
                    command: action.command.clone(),
                })
                .collect(),
        }
    }
}
