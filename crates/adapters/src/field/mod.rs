// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field geometry and scoring target selection

mod selector;

pub use selector::FieldPoseSelector;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Robot pose on the field: position in inches, heading in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    /// Straight-line distance between the two positions, ignoring heading
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Pose seen from the opposite alliance's side of a rotationally
    /// symmetric field
    pub fn mirrored(&self, field: &FieldSize) -> Pose {
        Pose {
            x: field.length - self.x,
            y: field.width - self.y,
            heading: normalize_degrees(self.heading + 180.0),
        }
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.0}°)", self.x, self.y, self.heading)
    }
}

/// Wrap an angle into (-180, 180]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Field extents in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSize {
    pub length: f64,
    pub width: f64,
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            length: 690.9,
            width: 317.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    #[default]
    Blue,
    Red,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown alliance '{0}' (expected blue or red)")]
pub struct ParseAllianceError(pub String);

impl std::str::FromStr for Alliance {
    type Err = ParseAllianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blue" => Ok(Alliance::Blue),
            "red" => Ok(Alliance::Red),
            _ => Err(ParseAllianceError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alliance::Blue => write!(f, "blue"),
            Alliance::Red => write!(f, "red"),
        }
    }
}

/// Chooses where the robot scores and collects
///
/// Both poses are read lazily, when a drive task initializes, so they reflect
/// the alliance and selection at that moment.
pub trait PoseSelector: Clone + Send + Sync + 'static {
    fn target_score_pose(&self) -> Pose;

    fn target_station_pose(&self) -> Pose;
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
