// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated robot: mechanism physics, game piece handling and scripted
//! controller input

use crate::bindings::Controllers;
use crate::config::RobotConfig;
use crate::error::EngineError;
use crate::gamepad::{Control, Gamepad};
use rl_adapters::{
    ActuatorCommand, Drivebase, FieldPoseSelector, PoseSelector, SimActuator, SimDrivebase,
    SimSensor,
};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pad {
    Driver,
    Operator,
}

/// Hold one control over a window of match time, e.g. `operator.a@1s..2s`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hold {
    pub pad: Pad,
    pub control: Control,
    pub from: Duration,
    pub until: Duration,
}

impl FromStr for Hold {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidHold {
            spec: s.to_string(),
            reason: reason.to_string(),
        };
        let (input, window) = s
            .split_once('@')
            .ok_or_else(|| invalid("expected INPUT@START..END"))?;
        let (pad, control) = match input.split_once('.') {
            Some(("driver", control)) => (Pad::Driver, control),
            Some(("operator", control)) => (Pad::Operator, control),
            Some(_) => return Err(invalid("gamepad must be 'driver' or 'operator'")),
            None => (Pad::Operator, input),
        };
        let (from, until) = window
            .split_once("..")
            .ok_or_else(|| invalid("expected a START..END window"))?;
        let parse = |text: &str| {
            humantime::parse_duration(text.trim()).map_err(|e| invalid(&e.to_string()))
        };
        let (from, until) = (parse(from)?, parse(until)?);
        if until <= from {
            return Err(invalid("window must end after it starts"));
        }
        Ok(Hold {
            pad,
            control: control.parse()?,
            from,
            until,
        })
    }
}

/// The simulated mechanisms, sensors and controllers of one robot
pub struct SimWorld {
    pub arm: SimActuator,
    pub elevator: SimActuator,
    pub intake: SimActuator,
    pub drivebase: SimDrivebase,
    pub sensor: SimSensor,
    pub poses: FieldPoseSelector,
    pub controllers: Controllers,
    holds: Vec<Hold>,
    elapsed: Duration,
    shooting: Duration,
    intaking: Duration,
    intake_speed: f64,
    shoot_speed: f64,
    station_tolerance: f64,
    eject_time: Duration,
    intake_time: Duration,
}

impl SimWorld {
    pub fn new(config: &RobotConfig) -> Self {
        let sim = &config.sim;
        let sensor = SimSensor::new();
        sensor.set_present(sim.preload);
        Self {
            arm: SimActuator::new("arm", sim.arm_rate).with_position(config.arm.stow),
            elevator: SimActuator::new("elevator", sim.elevator_rate)
                .with_position(config.elevator.stow),
            intake: SimActuator::new("intake", 1.0),
            drivebase: SimDrivebase::new(sim.drive_speed).with_pose(sim.start),
            sensor,
            poses: FieldPoseSelector::new(
                config.field.reef,
                config.field.station,
                config.field.size(),
                config.field.alliance,
            ),
            controllers: Controllers::default(),
            holds: Vec::new(),
            elapsed: Duration::ZERO,
            shooting: Duration::ZERO,
            intaking: Duration::ZERO,
            intake_speed: config.intake.intake_speed,
            shoot_speed: config.intake.shoot_speed,
            station_tolerance: config.drivebase.station_tolerance,
            eject_time: sim.eject_time,
            intake_time: sim.intake_time,
        }
    }

    pub fn with_holds(mut self, holds: Vec<Hold>) -> Self {
        self.holds = holds;
        self
    }

    /// Match time simulated so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn pad(&self, pad: Pad) -> &Gamepad {
        match pad {
            Pad::Driver => &self.controllers.driver,
            Pad::Operator => &self.controllers.operator,
        }
    }

    /// Advance physics by `dt`, then apply the scripted input for the new time
    pub fn step(&mut self, dt: Duration) {
        self.arm.step(dt);
        self.elevator.step(dt);
        self.intake.step(dt);
        self.drivebase.step(dt);
        self.elapsed += dt;
        self.step_piece(dt);

        // releases first so overlapping windows on one control stay held
        let (active, idle): (Vec<&Hold>, Vec<&Hold>) = self
            .holds
            .iter()
            .partition(|hold| (hold.from..hold.until).contains(&self.elapsed));
        for hold in idle {
            self.pad(hold.pad).let_go(hold.control);
        }
        for hold in active {
            self.pad(hold.pad).hold(hold.control);
        }
    }

    fn step_piece(&mut self, dt: Duration) {
        let held = self.sensor.is_present();
        let rollers = match self.intake.command() {
            ActuatorCommand::Speed(speed) => Some(speed),
            _ => None,
        };

        if held && rollers == Some(self.shoot_speed) {
            self.shooting += dt;
            if self.shooting >= self.eject_time {
                tracing::info!(elapsed = ?self.elapsed, "piece ejected");
                self.sensor.set_present(false);
                self.shooting = Duration::ZERO;
            }
        } else {
            self.shooting = Duration::ZERO;
        }

        let at_station = self.drivebase.is_near(
            &self.poses.target_station_pose(),
            &self.drivebase.current_pose(),
            self.station_tolerance,
        );
        if !held && at_station && rollers == Some(self.intake_speed) {
            self.intaking += dt;
            if self.intaking >= self.intake_time {
                tracing::info!(elapsed = ?self.elapsed, "piece collected");
                self.sensor.set_present(true);
                self.intaking = Duration::ZERO;
            }
        } else {
            self.intaking = Duration::ZERO;
        }
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
