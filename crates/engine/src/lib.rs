// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reefline robot engine: configuration, the superstructure coordinator,
//! controller bindings, autonomous routines and the simulated robot loop

mod autos;
pub mod bindings;
mod config;
mod error;
mod gamepad;
mod level;
mod mode;
mod robot;
mod sim;
mod superstructure;

pub use autos::{AutoChooser, Routine};
pub use bindings::Controllers;
pub use config::{
    ArmConfig, AutonomousConfig, DrivebaseConfig, ElevatorConfig, FieldConfig, IntakeConfig,
    RobotConfig, SchedulerSection, Setpoints, SimConfig, Timeouts,
};
pub use error::EngineError;
pub use gamepad::{Axis, Button, Control, Gamepad};
pub use level::Level;
pub use mode::OperatorMode;
pub use robot::{Pacing, Robot, RobotStatus, SimAutoChooser, SimSuperStructure};
pub use sim::{Hold, Pad, SimWorld};
pub use superstructure::{Jog, StowPlan, SuperStructure, SuperStructureDeps};
