// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced collaborator wrappers for consistent observability
//!
//! Each request opens an `info_span!` and the returned task logs its start
//! and end inside that span.

use crate::actuator::Actuator;
use crate::drivebase::{Drivebase, PoseSupplier, SpeedsSupplier};
use crate::field::Pose;
use rl_core::{BoxTask, Resource, TaskExt, Trigger};
use tracing::Span;

fn traced_task(task: BoxTask, span: Span) -> BoxTask {
    let start_span = span.clone();
    task.before_starting(move |_| {
        let _guard = start_span.enter();
        tracing::debug!("started");
    })
    .finally_do(move |_, interrupted| {
        let _guard = span.enter();
        tracing::debug!(interrupted, "ended");
    })
    .boxed()
}

/// Wrapper that adds tracing to any Actuator
#[derive(Clone)]
pub struct TracedActuator<A> {
    inner: A,
}

impl<A> TracedActuator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Actuator> Actuator for TracedActuator<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resource(&self) -> Resource {
        self.inner.resource()
    }

    fn position(&self) -> f64 {
        let position = self.inner.position();
        tracing::trace!(actuator = self.inner.name(), position, "read");
        position
    }

    fn move_to_setpoint(&self, setpoint: f64) -> BoxTask {
        let span = tracing::info_span!("actuator.move_to_setpoint", actuator = self.inner.name(), setpoint);
        let _guard = span.enter();
        tracing::debug!("requested");
        traced_task(self.inner.move_to_setpoint(setpoint), span.clone())
    }

    fn run_at_speed(&self, speed: f64) -> BoxTask {
        let span = tracing::info_span!("actuator.run_at_speed", actuator = self.inner.name(), speed);
        let _guard = span.enter();
        tracing::debug!("requested");
        traced_task(self.inner.run_at_speed(speed), span.clone())
    }

    fn stop(&self) -> BoxTask {
        let span = tracing::info_span!("actuator.stop", actuator = self.inner.name());
        let _guard = span.enter();
        tracing::debug!("requested");
        traced_task(self.inner.stop(), span.clone())
    }

    fn at_target(&self, target: f64, tolerance: f64) -> Trigger {
        self.inner.at_target(target, tolerance)
    }
}

/// Wrapper that adds tracing to any Drivebase
#[derive(Clone)]
pub struct TracedDrivebase<D> {
    inner: D,
}

impl<D> TracedDrivebase<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Drivebase> Drivebase for TracedDrivebase<D> {
    fn resource(&self) -> Resource {
        self.inner.resource()
    }

    fn current_pose(&self) -> Pose {
        self.inner.current_pose()
    }

    fn drive_to_pose(&self, target: PoseSupplier, speed_scale: f64) -> BoxTask {
        let span = tracing::info_span!("drivebase.drive_to_pose", speed_scale);
        let _guard = span.enter();
        tracing::debug!(from = %self.inner.current_pose(), "requested");
        // log the resolved target when the task starts, not when it is built
        let logged = target.clone();
        let target: PoseSupplier = std::sync::Arc::new(move || {
            let pose = logged();
            tracing::info!(target = %pose, "target resolved");
            pose
        });
        traced_task(self.inner.drive_to_pose(target, speed_scale), span.clone())
    }

    fn stop(&self) -> BoxTask {
        let span = tracing::info_span!("drivebase.stop");
        let _guard = span.enter();
        traced_task(self.inner.stop(), span.clone())
    }

    fn retreat(&self) -> BoxTask {
        let span = tracing::info_span!("drivebase.retreat");
        let _guard = span.enter();
        traced_task(self.inner.retreat(), span.clone())
    }

    fn drive_with(&self, speeds: SpeedsSupplier, field_oriented: bool) -> BoxTask {
        let span = tracing::info_span!("drivebase.drive_with", field_oriented);
        let _guard = span.enter();
        traced_task(self.inner.drive_with(speeds, field_oriented), span.clone())
    }

    fn is_near(&self, target: &Pose, current: &Pose, tolerance: f64) -> bool {
        self.inner.is_near(target, current, tolerance)
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
