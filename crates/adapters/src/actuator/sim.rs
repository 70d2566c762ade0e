// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! First-order simulated actuator

use super::Actuator;
use rl_core::{BoxTask, FunctionalTask, Resource, TaskExt};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// What the motor controller is currently asked to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCommand {
    Idle,
    Setpoint(f64),
    Speed(f64),
}

/// Recorded actuator request
#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    MoveTo(f64),
    RunAtSpeed(f64),
    Stop,
}

struct SimState {
    position: f64,
    command: ActuatorCommand,
    /// Units per second at full output
    max_rate: f64,
    calls: Vec<ActuatorCall>,
}

/// Actuator that slews toward its setpoint at a fixed rate
///
/// Clones share state, so a handle kept by the simulation can step the
/// physics of tasks handed to the scheduler.
#[derive(Clone)]
pub struct SimActuator {
    name: Arc<str>,
    resource: Resource,
    state: Arc<Mutex<SimState>>,
}

impl SimActuator {
    pub fn new(name: &str, max_rate: f64) -> Self {
        Self {
            name: Arc::from(name),
            resource: Resource::new(name),
            state: Arc::new(Mutex::new(SimState {
                position: 0.0,
                command: ActuatorCommand::Idle,
                max_rate,
                calls: Vec::new(),
            })),
        }
    }

    pub fn with_position(self, position: f64) -> Self {
        self.set_position(position);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_position(&self, position: f64) {
        self.lock().position = position;
    }

    pub fn command(&self) -> ActuatorCommand {
        self.lock().command
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.lock().calls.clone()
    }

    /// Advance the physics by `dt`
    pub fn step(&self, dt: Duration) {
        let mut state = self.lock();
        let max_step = state.max_rate * dt.as_secs_f64();
        match state.command {
            ActuatorCommand::Idle => {}
            ActuatorCommand::Setpoint(target) => {
                let error = target - state.position;
                state.position += error.clamp(-max_step, max_step);
            }
            ActuatorCommand::Speed(speed) => {
                state.position += speed.clamp(-1.0, 1.0) * max_step;
            }
        }
    }

    fn record(&self, call: ActuatorCall, command: ActuatorCommand) {
        let mut state = self.lock();
        state.calls.push(call);
        state.command = command;
    }

    fn set_command(&self, command: ActuatorCommand) {
        self.lock().command = command;
    }
}

impl Actuator for SimActuator {
    fn name(&self) -> &str {
        &self.name
    }

    fn resource(&self) -> Resource {
        self.resource.clone()
    }

    fn position(&self) -> f64 {
        self.lock().position
    }

    fn move_to_setpoint(&self, setpoint: f64) -> BoxTask {
        let this = self.clone();
        FunctionalTask::new(format!("{} to {setpoint}", self.name))
            .requiring(self.resource.clone())
            .on_init(move |_| {
                this.record(
                    ActuatorCall::MoveTo(setpoint),
                    ActuatorCommand::Setpoint(setpoint),
                )
            })
            .boxed()
    }

    fn run_at_speed(&self, speed: f64) -> BoxTask {
        let (start, tick, end) = (self.clone(), self.clone(), self.clone());
        FunctionalTask::new(format!("{} at speed {speed}", self.name))
            .requiring(self.resource.clone())
            .on_init(move |_| {
                start.record(ActuatorCall::RunAtSpeed(speed), ActuatorCommand::Speed(speed))
            })
            .on_execute(move |_| tick.set_command(ActuatorCommand::Speed(speed)))
            .on_end(move |_, _| end.set_command(ActuatorCommand::Idle))
            .boxed()
    }

    fn stop(&self) -> BoxTask {
        let (start, tick) = (self.clone(), self.clone());
        FunctionalTask::new(format!("{} stop", self.name))
            .requiring(self.resource.clone())
            .on_init(move |_| start.record(ActuatorCall::Stop, ActuatorCommand::Idle))
            .on_execute(move |_| tick.set_command(ActuatorCommand::Idle))
            .boxed()
    }
}

#[cfg(test)]
#[path = "sim_tests.rs"]
mod tests;
