// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kinematic simulated drivebase

use super::{ChassisSpeeds, Drivebase, PoseSupplier, SpeedsSupplier};
use crate::field::{normalize_degrees, Pose};
use rl_core::{BoxTask, FunctionalTask, Resource, TaskExt};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriveCommand {
    Idle,
    ToPose { target: Pose, speed_scale: f64 },
    Velocity {
        speeds: ChassisSpeeds,
        field_oriented: bool,
    },
    Retreat,
}

/// Recorded drivebase request
#[derive(Debug, Clone, PartialEq)]
pub enum DriveCall {
    DriveToPose { target: Pose, speed_scale: f64 },
    Stop,
    Retreat,
    DriveWith { field_oriented: bool },
}

struct SimState {
    pose: Pose,
    command: DriveCommand,
    calls: Vec<DriveCall>,
}

/// Drivebase that moves in straight lines at a capped speed
#[derive(Clone)]
pub struct SimDrivebase {
    resource: Resource,
    /// Inches per second at full speed
    max_speed: f64,
    /// Degrees per second at full rotation
    max_turn_rate: f64,
    /// Fraction of full speed used when retreating
    retreat_speed: f64,
    state: Arc<Mutex<SimState>>,
}

impl SimDrivebase {
    pub fn new(max_speed: f64) -> Self {
        Self {
            resource: Resource::new("drivebase"),
            max_speed,
            max_turn_rate: 360.0,
            retreat_speed: 0.3,
            state: Arc::new(Mutex::new(SimState {
                pose: Pose::default(),
                command: DriveCommand::Idle,
                calls: Vec::new(),
            })),
        }
    }

    pub fn with_pose(self, pose: Pose) -> Self {
        self.set_pose(pose);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_pose(&self, pose: Pose) {
        self.lock().pose = pose;
    }

    pub fn command(&self) -> DriveCommand {
        self.lock().command
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DriveCall> {
        self.lock().calls.clone()
    }

    /// Advance the physics by `dt`
    pub fn step(&self, dt: Duration) {
        let dt = dt.as_secs_f64();
        let mut state = self.lock();
        let pose = state.pose;
        state.pose = match state.command {
            DriveCommand::Idle => pose,
            DriveCommand::ToPose {
                target,
                speed_scale,
            } => {
                let travel = self.max_speed * speed_scale.clamp(0.0, 1.0) * dt;
                let distance = pose.distance_to(&target);
                let (x, y) = if distance <= travel {
                    (target.x, target.y)
                } else {
                    let ratio = travel / distance;
                    (
                        pose.x + (target.x - pose.x) * ratio,
                        pose.y + (target.y - pose.y) * ratio,
                    )
                };
                let turn = self.max_turn_rate * dt;
                let heading_error = normalize_degrees(target.heading - pose.heading);
                let heading = normalize_degrees(pose.heading + heading_error.clamp(-turn, turn));
                Pose::new(x, y, heading)
            }
            DriveCommand::Velocity {
                speeds,
                field_oriented,
            } => {
                let (mut vx, mut vy) = (speeds.vx * self.max_speed, speeds.vy * self.max_speed);
                if !field_oriented {
                    let (sin, cos) = pose.heading.to_radians().sin_cos();
                    (vx, vy) = (vx * cos - vy * sin, vx * sin + vy * cos);
                }
                Pose::new(
                    pose.x + vx * dt,
                    pose.y + vy * dt,
                    normalize_degrees(pose.heading + speeds.omega * self.max_turn_rate * dt),
                )
            }
            DriveCommand::Retreat => {
                let (sin, cos) = pose.heading.to_radians().sin_cos();
                let travel = self.max_speed * self.retreat_speed * dt;
                Pose::new(pose.x - cos * travel, pose.y - sin * travel, pose.heading)
            }
        };
    }

    fn record(&self, call: DriveCall, command: DriveCommand) {
        let mut state = self.lock();
        state.calls.push(call);
        state.command = command;
    }

    fn set_command(&self, command: DriveCommand) {
        self.lock().command = command;
    }
}

impl Drivebase for SimDrivebase {
    fn resource(&self) -> Resource {
        self.resource.clone()
    }

    fn current_pose(&self) -> Pose {
        self.lock().pose
    }

    fn drive_to_pose(&self, target: PoseSupplier, speed_scale: f64) -> BoxTask {
        let (start, end) = (self.clone(), self.clone());
        FunctionalTask::new("drive to pose")
            .requiring(self.resource.clone())
            .on_init(move |_| {
                let target = target();
                start.record(
                    DriveCall::DriveToPose {
                        target,
                        speed_scale,
                    },
                    DriveCommand::ToPose {
                        target,
                        speed_scale,
                    },
                );
            })
            .on_end(move |_, _| end.set_command(DriveCommand::Idle))
            .boxed()
    }

    fn stop(&self) -> BoxTask {
        let (start, tick) = (self.clone(), self.clone());
        FunctionalTask::new("drive stop")
            .requiring(self.resource.clone())
            .on_init(move |_| start.record(DriveCall::Stop, DriveCommand::Idle))
            .on_execute(move |_| tick.set_command(DriveCommand::Idle))
            .boxed()
    }

    fn retreat(&self) -> BoxTask {
        let (start, end) = (self.clone(), self.clone());
        FunctionalTask::new("drive retreat")
            .requiring(self.resource.clone())
            .on_init(move |_| start.record(DriveCall::Retreat, DriveCommand::Retreat))
            .on_end(move |_, _| end.set_command(DriveCommand::Idle))
            .boxed()
    }

    fn drive_with(&self, speeds: SpeedsSupplier, field_oriented: bool) -> BoxTask {
        let (start, tick, end) = (self.clone(), self.clone(), self.clone());
        let name = if field_oriented {
            "drive field-oriented"
        } else {
            "drive robot-oriented"
        };
        FunctionalTask::new(name)
            .requiring(self.resource.clone())
            .on_init(move |_| {
                start.record(
                    DriveCall::DriveWith { field_oriented },
                    DriveCommand::Velocity {
                        speeds: ChassisSpeeds::default(),
                        field_oriented,
                    },
                )
            })
            .on_execute(move |_| {
                tick.set_command(DriveCommand::Velocity {
                    speeds: speeds(),
                    field_oriented,
                })
            })
            .on_end(move |_, _| end.set_command(DriveCommand::Idle))
            .boxed()
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
