// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-axis actuators (arm pivot, elevator, intake/shooter)

mod sim;

pub use sim::{ActuatorCall, ActuatorCommand, SimActuator};

use rl_core::{BoxTask, Resource, Trigger};

/// A single-axis mechanism that owns one exclusive resource
///
/// Tasks returned here require [`Actuator::resource`] and never finish on
/// their own; callers bound them with `until` or `with_timeout`.
pub trait Actuator: Clone + Send + Sync + 'static {
    fn name(&self) -> &str;

    fn resource(&self) -> Resource;

    /// Current position in the mechanism's units (degrees or inches)
    fn position(&self) -> f64;

    /// Drive to `setpoint` and hold it
    fn move_to_setpoint(&self, setpoint: f64) -> BoxTask;

    /// Run open-loop at `speed` (fraction of full output); stops on end
    fn run_at_speed(&self, speed: f64) -> BoxTask;

    /// Hold the motors stopped
    fn stop(&self) -> BoxTask;

    /// True while the position is within `tolerance` of `target`
    fn at_target(&self, target: f64, tolerance: f64) -> Trigger {
        let this = self.clone();
        Trigger::new(move || (this.position() - target).abs() <= tolerance)
            .named(format!("{} at {target}", self.name()))
    }
}
