// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Robot configuration loaded from TOML
//!
//! Every section falls back to its defaults, so an empty file describes the
//! stock robot. Setpoint tables are all-or-nothing: a `[arm.setpoints]`
//! table must list every level.

use crate::autos::Routine;
use crate::error::EngineError;
use crate::level::Level;
use rl_adapters::{Alliance, FieldSize, Pose};
use rl_core::{ConfigError, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotConfig {
    pub scheduler: SchedulerSection,
    pub arm: ArmConfig,
    pub elevator: ElevatorConfig,
    pub intake: IntakeConfig,
    pub drivebase: DrivebaseConfig,
    pub timeouts: Timeouts,
    pub field: FieldConfig,
    pub autonomous: AutonomousConfig,
    pub sim: SimConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    #[serde(with = "humantime_serde")]
    pub period: Duration,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            period: SchedulerConfig::default().period,
        }
    }
}

/// Arm or elevator target for every [`Level`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Setpoints {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
    pub l4: f64,
    pub station: f64,
    pub dealgae_high: f64,
    pub dealgae_low: f64,
}

impl Setpoints {
    pub fn get(&self, level: Level) -> f64 {
        match level {
            Level::L1 => self.l1,
            Level::L2 => self.l2,
            Level::L3 => self.l3,
            Level::L4 => self.l4,
            Level::Station => self.station,
            Level::DealgaeHigh => self.dealgae_high,
            Level::DealgaeLow => self.dealgae_low,
        }
    }
}

/// Arm angles in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmConfig {
    pub setpoints: Setpoints,
    pub stow: f64,
    pub tolerance: f64,
    pub manual_speed: f64,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            setpoints: Setpoints {
                l1: -10.0,
                l2: 45.0,
                l3: 45.0,
                l4: 60.0,
                station: 110.0,
                dealgae_high: 20.0,
                dealgae_low: 20.0,
            },
            stow: 90.0,
            tolerance: 3.0,
            manual_speed: 0.3,
        }
    }
}

/// Elevator heights in inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElevatorConfig {
    pub setpoints: Setpoints,
    pub stow: f64,
    pub tolerance: f64,
    pub manual_speed: f64,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            setpoints: Setpoints {
                l1: 4.0,
                l2: 12.0,
                l3: 28.0,
                l4: 52.0,
                station: 6.0,
                dealgae_high: 34.0,
                dealgae_low: 18.0,
            },
            stow: 0.0,
            tolerance: 1.0,
            manual_speed: 0.4,
        }
    }
}

/// Roller output fractions; the sign selects the direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    pub intake_speed: f64,
    pub shoot_speed: f64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            intake_speed: 0.6,
            shoot_speed: -0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrivebaseConfig {
    /// Inches from the reef pose that count as arrived
    pub reef_tolerance: f64,
    pub station_tolerance: f64,
    pub reef_speed_scale: f64,
    pub station_speed_scale: f64,
}

impl Default for DrivebaseConfig {
    fn default() -> Self {
        Self {
            reef_tolerance: 2.0,
            station_tolerance: 3.0,
            reef_speed_scale: 0.8,
            station_speed_scale: 1.0,
        }
    }
}

/// Caps on each stage of the automatic sequences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub stop_drive: Duration,
    #[serde(with = "humantime_serde")]
    pub shoot: Duration,
    #[serde(with = "humantime_serde")]
    pub retreat: Duration,
    #[serde(with = "humantime_serde")]
    pub pickup: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            stop_drive: Duration::from_millis(100),
            shoot: Duration::from_secs(2),
            retreat: Duration::from_millis(500),
            pickup: Duration::from_secs(3),
        }
    }
}

/// Target poses as seen from the blue alliance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub reef: Pose,
    pub station: Pose,
    pub length: f64,
    pub width: f64,
    pub alliance: Alliance,
}

impl FieldConfig {
    pub fn size(&self) -> FieldSize {
        FieldSize {
            length: self.length,
            width: self.width,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        let size = FieldSize::default();
        Self {
            reef: Pose::new(150.0, 130.0, 0.0),
            station: Pose::new(40.0, 30.0, -125.0),
            length: size.length,
            width: size.width,
            alliance: Alliance::Blue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutonomousConfig {
    pub default: Routine,
    /// How long the `leave` routine backs away
    #[serde(with = "humantime_serde")]
    pub leave: Duration,
}

impl Default for AutonomousConfig {
    fn default() -> Self {
        Self {
            default: Routine::ScoreL1,
            leave: Duration::from_millis(1500),
        }
    }
}

/// Simulated robot physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub start: Pose,
    /// Start the match holding a piece
    pub preload: bool,
    /// Inches per second at full drive output
    pub drive_speed: f64,
    /// Degrees per second
    pub arm_rate: f64,
    /// Inches per second
    pub elevator_rate: f64,
    /// Time the shooter must run before a held piece leaves
    #[serde(with = "humantime_serde")]
    pub eject_time: Duration,
    /// Time the intake must run at the station before a piece is held
    #[serde(with = "humantime_serde")]
    pub intake_time: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start: Pose::new(90.0, 130.0, 0.0),
            preload: true,
            drive_speed: 150.0,
            arm_rate: 180.0,
            elevator_rate: 40.0,
            eject_time: Duration::from_millis(250),
            intake_time: Duration::from_millis(300),
        }
    }
}

impl RobotConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: RobotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            period: self.scheduler.period,
        }
    }

    /// Reject values no mechanism can honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let magnitudes = [
            ("arm.tolerance", self.arm.tolerance),
            ("arm.manual_speed", self.arm.manual_speed),
            ("elevator.tolerance", self.elevator.tolerance),
            ("elevator.manual_speed", self.elevator.manual_speed),
            ("drivebase.reef_tolerance", self.drivebase.reef_tolerance),
            ("drivebase.station_tolerance", self.drivebase.station_tolerance),
            ("drivebase.reef_speed_scale", self.drivebase.reef_speed_scale),
            ("drivebase.station_speed_scale", self.drivebase.station_speed_scale),
            ("field.length", self.field.length),
            ("field.width", self.field.width),
            ("sim.drive_speed", self.sim.drive_speed),
            ("sim.arm_rate", self.sim.arm_rate),
            ("sim.elevator_rate", self.sim.elevator_rate),
        ];
        for (what, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(what, value));
            }
        }

        for (what, value) in [
            ("intake.intake_speed", self.intake.intake_speed),
            ("intake.shoot_speed", self.intake.shoot_speed),
        ] {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(invalid(what, value));
            }
        }

        let setpoints = Level::ALL.into_iter().flat_map(|level| {
            [
                (format!("arm.setpoints.{level}"), self.arm.setpoints.get(level)),
                (format!("elevator.setpoints.{level}"), self.elevator.setpoints.get(level)),
            ]
        });
        for (what, value) in setpoints.chain([
            ("arm.stow".to_string(), self.arm.stow),
            ("elevator.stow".to_string(), self.elevator.stow),
        ]) {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { what, value });
            }
        }

        let durations = [
            ("scheduler.period", self.scheduler.period),
            ("timeouts.stop_drive", self.timeouts.stop_drive),
            ("timeouts.shoot", self.timeouts.shoot),
            ("timeouts.retreat", self.timeouts.retreat),
            ("timeouts.pickup", self.timeouts.pickup),
            ("autonomous.leave", self.autonomous.leave),
        ];
        for (what, duration) in durations {
            if duration.is_zero() {
                return Err(ConfigError::InvalidDuration {
                    what: what.to_string(),
                    value: 0.0,
                });
            }
        }
        Ok(())
    }
}

fn invalid(what: &str, value: f64) -> ConfigError {
    ConfigError::InvalidValue {
        what: what.to_string(),
        value,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
