// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator that composes the mechanisms into scoring routines
//!
//! [`SuperStructure`] owns handles to the arm, elevator, intake/shooter,
//! drivebase, pose selector and piece sensor. Everything it returns is a
//! task or trigger for the scheduler to run; it never drives a mechanism
//! directly.

use crate::config::RobotConfig;
use crate::level::Level;
use crate::mode::OperatorMode;
use rl_adapters::{Actuator, Drivebase, PieceSensor, Pose, PoseSelector, PoseSupplier};
use rl_core::{
    defer, parallel, run, run_once, sequence, BoxTask, Clock, ConfigError, Resource, Scheduler,
    Task, TaskContext, TaskExt, Trigger,
};
use std::sync::Arc;

/// Collaborators the coordinator drives
pub struct SuperStructureDeps<A, D, P, S> {
    pub arm: A,
    pub elevator: A,
    pub intake: A,
    pub drivebase: D,
    pub poses: P,
    pub sensor: S,
}

/// Where the arm and elevator rest when no other task holds them
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StowPlan {
    /// Stop the motors and hold wherever the operator left them
    Hold,
    Setpoint { arm: f64, elevator: f64 },
}

/// Open-loop jog directions for manual control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jog {
    ElevatorUp,
    ElevatorDown,
    ArmUp,
    ArmDown,
}

#[derive(Clone)]
pub struct SuperStructure<A, D, P, S> {
    arm: A,
    elevator: A,
    intake: A,
    drivebase: D,
    poses: P,
    sensor: S,
    config: Arc<RobotConfig>,
    mode: OperatorMode,
    resource: Resource,
}

impl<A, D, P, S> SuperStructure<A, D, P, S>
where
    A: Actuator,
    D: Drivebase,
    P: PoseSelector,
    S: PieceSensor,
{
    pub fn new(deps: SuperStructureDeps<A, D, P, S>, config: RobotConfig) -> Self {
        Self {
            arm: deps.arm,
            elevator: deps.elevator,
            intake: deps.intake,
            drivebase: deps.drivebase,
            poses: deps.poses,
            sensor: deps.sensor,
            config: Arc::new(config),
            mode: OperatorMode::new(),
            resource: Resource::new("superstructure"),
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Read handle on the operator mode
    pub fn mode(&self) -> &OperatorMode {
        &self.mode
    }

    pub fn resource(&self) -> Resource {
        self.resource.clone()
    }

    pub fn drivebase(&self) -> &D {
        &self.drivebase
    }

    /// Arm and elevator move to the level's setpoints together
    pub fn structure_to(&self, level: Level) -> Result<BoxTask, ConfigError> {
        let arm = self.arm.move_to_setpoint(self.config.arm.setpoints.get(level));
        let elevator = self
            .elevator
            .move_to_setpoint(self.config.elevator.setpoints.get(level));
        Ok(arm
            .along_with(elevator)?
            .with_name(format!("structure to {level}"))
            .boxed())
    }

    /// Elevator within its height tolerance and arm within its angle tolerance
    pub fn structures_at(&self, level: Level) -> Trigger {
        let elevator = self.elevator.at_target(
            self.config.elevator.setpoints.get(level),
            self.config.elevator.tolerance,
        );
        let arm = self.arm.at_target(
            self.config.arm.setpoints.get(level),
            self.config.arm.tolerance,
        );
        elevator.and(&arm).named(format!("structure at {level}"))
    }

    pub fn at_reef(&self) -> Trigger {
        let poses = self.poses.clone();
        self.near(
            move || poses.target_score_pose(),
            self.config.drivebase.reef_tolerance,
        )
        .named("at reef")
    }

    pub fn at_station(&self) -> Trigger {
        let poses = self.poses.clone();
        self.near(
            move || poses.target_station_pose(),
            self.config.drivebase.station_tolerance,
        )
        .named("at station")
    }

    fn near(&self, target: impl Fn() -> Pose + Send + Sync + 'static, tolerance: f64) -> Trigger {
        let drivebase = self.drivebase.clone();
        Trigger::new(move || drivebase.is_near(&target(), &drivebase.current_pose(), tolerance))
    }

    /// Drive to the score pose selected when the task starts
    pub fn drive_to_reef(&self) -> BoxTask {
        let poses = self.poses.clone();
        let target: PoseSupplier = Arc::new(move || poses.target_score_pose());
        self.drive_to(target, self.config.drivebase.reef_speed_scale)
            .with_name("drive to reef")
            .boxed()
    }

    pub fn drive_to_station(&self) -> BoxTask {
        let poses = self.poses.clone();
        let target: PoseSupplier = Arc::new(move || poses.target_station_pose());
        self.drive_to(target, self.config.drivebase.station_speed_scale)
            .with_name("drive to station")
            .boxed()
    }

    fn drive_to(&self, target: PoseSupplier, speed_scale: f64) -> BoxTask {
        let drivebase = self.drivebase.clone();
        defer(
            move || drivebase.drive_to_pose(target.clone(), speed_scale),
            self.drivebase.resource(),
        )
        .boxed()
    }

    /// Drive up to the reef and place the held piece on `level`
    pub fn score(&self, level: Level) -> Result<BoxTask, ConfigError> {
        let timeouts = &self.config.timeouts;

        let approach = self
            .drive_to_reef()
            .along_with(self.structure_to(level)?)?
            .until(self.at_reef().and(&self.structures_at(level)));

        let settle = self.drivebase.stop().with_timeout(timeouts.stop_drive);

        let shoot = self
            .shoot()
            .along_with(self.structure_to(level)?)?
            .with_timeout(timeouts.shoot)
            .until(self.sensor.present().negate());

        let routine = sequence(vec![
            approach.boxed(),
            settle.boxed(),
            shoot.boxed(),
            self.retreat_and_stow()?,
        ])?;
        Ok(self.automatic(routine, format!("score {level}")))
    }

    /// Collect a piece from the station, then back away
    pub fn get_piece(&self) -> Result<BoxTask, ConfigError> {
        let collect = parallel(vec![
            self.drive_to_station(),
            self.structure_to(Level::Station)?,
            self.intake(),
        ])?
        .until(self.sensor.present())
        .with_timeout(self.config.timeouts.pickup);

        let routine = collect.and_then(self.retreat_and_stow()?);
        Ok(self.automatic(routine, "get piece".to_string()))
    }

    fn retreat_and_stow(&self) -> Result<BoxTask, ConfigError> {
        Ok(self
            .drivebase
            .retreat()
            .along_with(self.force_stow()?)?
            .with_timeout(self.config.timeouts.retreat)
            .boxed())
    }

    /// Mark the mode as locked while `routine` runs
    fn automatic(&self, routine: impl Task + 'static, name: String) -> BoxTask {
        let (start, end) = (self.mode.clone(), self.mode.clone());
        routine
            .before_starting(move |_| start.set_sequence_active(true))
            .finally_do(move |_, _| end.set_sequence_active(false))
            .with_name(name)
            .boxed()
    }

    /// Arm and elevator to their automatic-mode stow setpoints, whatever the mode
    pub fn force_stow(&self) -> Result<BoxTask, ConfigError> {
        Ok(self
            .arm
            .move_to_setpoint(self.config.arm.stow)
            .along_with(self.elevator.move_to_setpoint(self.config.elevator.stow))?
            .with_name("force stow")
            .boxed())
    }

    pub fn intake(&self) -> BoxTask {
        self.intake.run_at_speed(self.config.intake.intake_speed)
    }

    pub fn shoot(&self) -> BoxTask {
        self.intake.run_at_speed(self.config.intake.shoot_speed)
    }

    pub fn jog(&self, jog: Jog) -> BoxTask {
        match jog {
            Jog::ElevatorUp => self.elevator.run_at_speed(self.config.elevator.manual_speed),
            Jog::ElevatorDown => self.elevator.run_at_speed(-self.config.elevator.manual_speed),
            Jog::ArmUp => self.arm.run_at_speed(self.config.arm.manual_speed),
            Jog::ArmDown => self.arm.run_at_speed(-self.config.arm.manual_speed),
        }
    }

    /// Hold every manipulator stopped until something else takes over
    pub fn stop_all_manipulators(&self) -> Result<BoxTask, ConfigError> {
        Ok(parallel(vec![
            run(|_| {}, self.resource.clone()).boxed(),
            self.arm.stop(),
            self.elevator.stop(),
            self.intake.stop(),
        ])?
        .with_name("stop all manipulators")
        .boxed())
    }

    pub fn toggle_operator_controls(&self) -> BoxTask {
        self.mode_change("toggle operator controls", |mode| {
            mode.toggle();
        })
    }

    /// Switch to automatic mode
    pub fn enable_pid(&self) -> BoxTask {
        self.mode_change("enable pid", |mode| mode.set_manual(false))
    }

    /// Switch to manual mode
    pub fn disable_pid(&self) -> BoxTask {
        self.mode_change("disable pid", |mode| mode.set_manual(true))
    }

    fn mode_change(
        &self,
        name: &str,
        change: impl Fn(&OperatorMode) + Send + 'static,
    ) -> BoxTask {
        let this = self.clone();
        let task_name = name.to_string();
        run_once(
            move |ctx| {
                if this.mode.sequence_active() {
                    tracing::warn!(task = %task_name, "automatic sequence running, mode unchanged");
                    return;
                }
                change(&this.mode);
                tracing::info!(manual = this.mode.is_manual(), "operator mode changed");
                this.apply_stow(ctx);
            },
            self.resource.clone(),
        )
        .named(name)
        .boxed()
    }

    /// Re-derive the arm and elevator defaults from the current mode
    pub fn update_stow_command(&self) -> BoxTask {
        let this = self.clone();
        run_once(move |ctx| this.apply_stow(ctx), self.resource.clone())
            .named("update stow")
            .boxed()
    }

    pub fn stow_plan(&self) -> StowPlan {
        if self.mode.is_manual() {
            StowPlan::Hold
        } else {
            StowPlan::Setpoint {
                arm: self.config.arm.stow,
                elevator: self.config.elevator.stow,
            }
        }
    }

    fn stow_tasks(&self) -> [(Resource, BoxTask); 2] {
        let plan = self.stow_plan();
        let stow = |actuator: &A, setpoint: Option<f64>| {
            let task = match setpoint {
                Some(value) => actuator.move_to_setpoint(value),
                None => actuator.stop(),
            };
            (
                actuator.resource(),
                task.with_name(format!("{} stow", actuator.name())).boxed(),
            )
        };
        match plan {
            StowPlan::Hold => [stow(&self.arm, None), stow(&self.elevator, None)],
            StowPlan::Setpoint { arm, elevator } => {
                [stow(&self.arm, Some(arm)), stow(&self.elevator, Some(elevator))]
            }
        }
    }

    fn apply_stow(&self, ctx: &mut TaskContext<'_>) {
        tracing::debug!(plan = ?self.stow_plan(), "stow defaults updated");
        for (resource, task) in self.stow_tasks() {
            ctx.set_default(resource, task);
        }
    }

    /// Register the stow defaults for the current mode
    pub fn install_stow_defaults<C: Clock>(
        &self,
        scheduler: &mut Scheduler<C>,
    ) -> Result<(), ConfigError> {
        for (resource, task) in self.stow_tasks() {
            scheduler.set_default(resource, task)?;
        }
        Ok(())
    }

    pub fn is_operator_manual(&self) -> Trigger {
        self.mode.manual_trigger()
    }

    pub fn automatic_sequence_active(&self) -> Trigger {
        self.mode.sequence_trigger()
    }
}

#[cfg(test)]
#[path = "superstructure_tests.rs"]
mod tests;
