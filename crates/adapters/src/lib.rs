// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Collaborators the scheduler drives
//!
//! Each hardware concern is a trait that hands out primitive tasks and
//! triggers. Simulated implementations step simple physics so the rest of
//! the workspace can run without hardware.

pub mod actuator;
pub mod drivebase;
pub mod field;
pub mod sensor;
pub mod traced;

pub use actuator::{Actuator, ActuatorCall, ActuatorCommand, SimActuator};
pub use drivebase::{
    ChassisSpeeds, DriveCall, DriveCommand, Drivebase, PoseSupplier, SimDrivebase, SpeedsSupplier,
};
pub use field::{Alliance, FieldPoseSelector, FieldSize, ParseAllianceError, Pose, PoseSelector};
pub use sensor::{PieceSensor, SimSensor};
pub use traced::{TracedActuator, TracedDrivebase};
