// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The robot loop: simulation step, then scheduler tick, once per period

use crate::autos::AutoChooser;
use crate::bindings;
use crate::config::RobotConfig;
use crate::error::EngineError;
use crate::sim::SimWorld;
use crate::superstructure::{SuperStructure, SuperStructureDeps};
use rl_adapters::{
    Actuator, Drivebase, FieldPoseSelector, Pose, SimActuator, SimDrivebase, SimSensor,
    TracedActuator, TracedDrivebase,
};
use rl_core::{Clock, FakeClock, Scheduler, SchedulerEvent, SystemClock, TaskId};
use serde::Serialize;
use std::time::{Duration, Instant};

pub type SimSuperStructure = SuperStructure<
    TracedActuator<SimActuator>,
    TracedDrivebase<SimDrivebase>,
    FieldPoseSelector,
    SimSensor,
>;

pub type SimAutoChooser = AutoChooser<
    TracedActuator<SimActuator>,
    TracedDrivebase<SimDrivebase>,
    FieldPoseSelector,
    SimSensor,
>;

/// How the loop waits for the next period
pub trait Pacing: Clock {
    fn wait_until(&self, deadline: Instant);
}

/// Fast simulation: jump straight to the deadline
impl Pacing for FakeClock {
    fn wait_until(&self, deadline: Instant) {
        let now = self.now();
        if deadline > now {
            self.advance(deadline - now);
        }
    }
}

impl Pacing for SystemClock {
    fn wait_until(&self, deadline: Instant) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Snapshot of the robot for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotStatus {
    pub elapsed_ms: u64,
    pub ticks: u64,
    pub pose: Pose,
    pub arm: f64,
    pub elevator: f64,
    pub piece: bool,
    pub manual: bool,
    pub active: Vec<String>,
}

pub struct Robot<C: Clock> {
    scheduler: Scheduler<C>,
    superstructure: SimSuperStructure,
    autos: SimAutoChooser,
    world: SimWorld,
    last_tick: Option<Instant>,
}

impl<C: Pacing> Robot<C> {
    pub fn new(config: RobotConfig, world: SimWorld, clock: C) -> Result<Self, EngineError> {
        config.validate()?;
        let superstructure = SuperStructure::new(
            SuperStructureDeps {
                arm: TracedActuator::new(world.arm.clone()),
                elevator: TracedActuator::new(world.elevator.clone()),
                intake: TracedActuator::new(world.intake.clone()),
                drivebase: TracedDrivebase::new(world.drivebase.clone()),
                poses: world.poses.clone(),
                sensor: world.sensor.clone(),
            },
            config.clone(),
        );
        let mut scheduler = Scheduler::with_config(config.scheduler_config(), clock);
        superstructure.install_stow_defaults(&mut scheduler)?;
        bindings::configure(&mut scheduler, &superstructure, &world.controllers)?;
        let autos = AutoChooser::new(superstructure.clone());
        tracing::info!(
            period = ?config.scheduler.period,
            auto = %autos.selected(),
            alliance = %world.poses.alliance(),
            "robot initialized"
        );

        Ok(Self {
            scheduler,
            superstructure,
            autos,
            world,
            last_tick: None,
        })
    }

    pub fn scheduler(&self) -> &Scheduler<C> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<C> {
        &mut self.scheduler
    }

    pub fn superstructure(&self) -> &SimSuperStructure {
        &self.superstructure
    }

    pub fn autos_mut(&mut self) -> &mut SimAutoChooser {
        &mut self.autos
    }

    pub fn world(&self) -> &SimWorld {
        &self.world
    }

    /// Schedule the selected autonomous routine
    pub fn run_autonomous(&mut self) -> Result<TaskId, EngineError> {
        let task = self.autos.selected_task()?;
        tracing::info!(routine = %self.autos.selected(), "autonomous started");
        Ok(self.scheduler.schedule_task(task))
    }

    /// Step the simulation by the time since the previous tick, then tick
    pub fn tick(&mut self) {
        let now = self.scheduler.clock().now();
        let dt = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.world.step(dt);
        self.scheduler.tick();
    }

    /// Run the loop for `duration` of robot time, handing every scheduler
    /// event to `sink` as it happens
    pub fn run_for(&mut self, duration: Duration, sink: impl FnMut(&SchedulerEvent)) {
        self.run_while(duration, || true, sink);
    }

    /// Like [`Robot::run_for`], but stops early once `running` reads false
    pub fn run_while(
        &mut self,
        duration: Duration,
        running: impl Fn() -> bool,
        mut sink: impl FnMut(&SchedulerEvent),
    ) {
        let period = self.scheduler.config().period;
        let start = self.scheduler.clock().now();
        let mut deadline = start;
        while deadline.duration_since(start) < duration {
            if !running() {
                tracing::info!(ticks = self.scheduler.tick_count(), "robot loop stopped");
                break;
            }
            self.tick();
            for event in self.scheduler.take_events() {
                sink(&event);
            }
            deadline += period;
            self.scheduler.clock().wait_until(deadline);
        }
    }

    pub fn status(&self) -> RobotStatus {
        let active = self
            .scheduler
            .active_ids()
            .iter()
            .filter_map(|id| self.scheduler.name(*id))
            .map(str::to_string)
            .collect();
        RobotStatus {
            elapsed_ms: self.world.elapsed().as_millis() as u64,
            ticks: self.scheduler.tick_count(),
            pose: self.world.drivebase.current_pose(),
            arm: self.world.arm.position(),
            elevator: self.world.elevator.position(),
            piece: self.world.sensor.is_present(),
            manual: self.superstructure.mode().is_manual(),
            active,
        }
    }
}

impl std::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Elapsed: {}ms ({} ticks)", self.elapsed_ms, self.ticks)?;
        writeln!(f, "  Pose: {}", self.pose)?;
        writeln!(f, "  Arm: {:.1}°", self.arm)?;
        writeln!(f, "  Elevator: {:.1} in", self.elevator)?;
        writeln!(f, "  Piece: {}", if self.piece { "held" } else { "none" })?;
        writeln!(
            f,
            "  Mode: {}",
            if self.manual { "manual" } else { "automatic" }
        )?;
        if self.active.is_empty() {
            write!(f, "  Active: none")
        } else {
            write!(f, "  Active: {}", self.active.join(", "))
        }
    }
}

#[cfg(test)]
#[path = "robot_tests.rs"]
mod tests;
