// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drivetrain collaborator

mod sim;

pub use sim::{DriveCall, DriveCommand, SimDrivebase};

use crate::field::Pose;
use rl_core::{BoxTask, Resource};
use std::sync::Arc;

/// Lazily evaluated target pose
pub type PoseSupplier = Arc<dyn Fn() -> Pose + Send + Sync>;

/// Lazily evaluated velocity request, polled every tick
pub type SpeedsSupplier = Arc<dyn Fn() -> ChassisSpeeds + Send + Sync>;

/// Requested chassis velocity as fractions of full speed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    pub vx: f64,
    pub vy: f64,
    pub omega: f64,
}

pub trait Drivebase: Clone + Send + Sync + 'static {
    fn resource(&self) -> Resource;

    fn current_pose(&self) -> Pose;

    /// Drive toward the pose returned by `target`, read once when the task
    /// initializes. `speed_scale` limits the fraction of full speed used.
    fn drive_to_pose(&self, target: PoseSupplier, speed_scale: f64) -> BoxTask;

    /// Hold the chassis stopped
    fn stop(&self) -> BoxTask;

    /// Back away from whatever the robot is facing; stops on end
    fn retreat(&self) -> BoxTask;

    /// Teleoperated driving from a velocity supplier
    fn drive_with(&self, speeds: SpeedsSupplier, field_oriented: bool) -> BoxTask;

    fn is_near(&self, target: &Pose, current: &Pose, tolerance: f64) -> bool {
        target.distance_to(current) <= tolerance
    }
}
