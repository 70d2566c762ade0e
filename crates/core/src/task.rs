// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle and primitive tasks
//!
//! A task is the unit of timed or conditional action. The scheduler drives
//! every task through the same lifecycle:
//!
//! 1. `initialize()` - once, when the task starts
//! 2. `execute()` then `is_finished()` - once per tick while running
//! 3. `end(interrupted)` - exactly once, on completion, preemption or cancel
//!
//! Constructing a task never performs side effects. Side effects only happen
//! inside the lifecycle calls, which receive a [`TaskContext`] carrying the
//! tick time and a queue of [`TaskEffect`]s for the scheduler.

use crate::error::ConditionError;
use crate::id::TaskId;
use crate::resource::{Resource, ResourceSet};
use crate::trigger::Trigger;
use serde::Serialize;
use std::time::{Duration, Instant};

/// What happens when a conflicting task is started while this one runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptBehavior {
    /// This task yields: it is interrupted and the incoming task starts
    #[default]
    CancelSelf,
    /// The incoming task is rejected and this task keeps running
    CancelIncoming,
}

/// Lifecycle state of a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not running; ready to be initialized
    Idle,
    /// Initialized this tick, not yet executed
    Initialized,
    /// Executed at least once
    Executing,
    /// Cleanup has run; requires a reset before running again
    Ended { interrupted: bool },
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Initialized | TaskState::Executing)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, TaskState::Ended { .. })
    }
}

/// Requests a task files with the scheduler from inside a lifecycle call
pub enum TaskEffect {
    /// Register a one-shot task and start it on the next tick
    Schedule(BoxTask),
    /// Cancel an active task on the next tick
    Cancel(TaskId),
    /// Replace the default task of a resource
    SetDefault { resource: Resource, task: BoxTask },
    /// A condition evaluated by the task failed
    ConditionFailed {
        trigger: String,
        error: ConditionError,
    },
}

impl std::fmt::Debug for TaskEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskEffect::Schedule(task) => f.debug_tuple("Schedule").field(&task.name()).finish(),
            TaskEffect::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            TaskEffect::SetDefault { resource, task } => f
                .debug_struct("SetDefault")
                .field("resource", resource)
                .field("task", &task.name())
                .finish(),
            TaskEffect::ConditionFailed { trigger, error } => f
                .debug_struct("ConditionFailed")
                .field("trigger", trigger)
                .field("error", error)
                .finish(),
        }
    }
}

/// Per-call view of the scheduler handed to every lifecycle method
pub struct TaskContext<'a> {
    now: Instant,
    effects: &'a mut Vec<TaskEffect>,
}

impl<'a> TaskContext<'a> {
    pub fn new(now: Instant, effects: &'a mut Vec<TaskEffect>) -> Self {
        Self { now, effects }
    }

    /// Time of the current tick
    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn schedule(&mut self, task: impl Task + 'static) {
        self.effects.push(TaskEffect::Schedule(Box::new(task)));
    }

    pub fn cancel(&mut self, id: TaskId) {
        self.effects.push(TaskEffect::Cancel(id));
    }

    pub fn set_default(&mut self, resource: Resource, task: impl Task + 'static) {
        self.effects.push(TaskEffect::SetDefault {
            resource,
            task: Box::new(task),
        });
    }

    pub fn condition_failed(&mut self, trigger: &str, error: ConditionError) {
        self.effects.push(TaskEffect::ConditionFailed {
            trigger: trigger.to_string(),
            error,
        });
    }
}

/// A composable unit of action with declared resource requirements
pub trait Task: Send {
    fn name(&self) -> &str;

    /// Resources this task holds exclusively while active
    fn requirements(&self) -> &ResourceSet;

    fn initialize(&mut self, _ctx: &mut TaskContext<'_>) {}

    fn execute(&mut self, _ctx: &mut TaskContext<'_>) {}

    fn is_finished(&mut self, _ctx: &mut TaskContext<'_>) -> bool {
        false
    }

    /// Cleanup. Must not fail: collaborator faults are logged, not propagated.
    fn end(&mut self, _ctx: &mut TaskContext<'_>, _interrupted: bool) {}

    /// Return to `Idle` so the task can run again. Composites reset their
    /// children.
    fn reset(&mut self) {}

    fn interrupt_behavior(&self) -> InterruptBehavior {
        InterruptBehavior::CancelSelf
    }
}

/// Owned, type-erased task
pub type BoxTask = Box<dyn Task>;

impl Task for BoxTask {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn requirements(&self) -> &ResourceSet {
        (**self).requirements()
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        (**self).initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        (**self).execute(ctx)
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        (**self).is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        (**self).end(ctx, interrupted)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn interrupt_behavior(&self) -> InterruptBehavior {
        (**self).interrupt_behavior()
    }
}

type Action = Box<dyn FnMut(&mut TaskContext<'_>) + Send>;
type EndAction = Box<dyn FnMut(&mut TaskContext<'_>, bool) + Send>;
type Predicate = Box<dyn FnMut(&mut TaskContext<'_>) -> bool + Send>;

/// Task assembled from closures
///
/// Every hook is optional. Without a `finish_when` predicate the task runs
/// until it is cancelled or superseded.
pub struct FunctionalTask {
    name: String,
    requirements: ResourceSet,
    on_init: Option<Action>,
    on_execute: Option<Action>,
    finished: Option<Predicate>,
    on_end: Option<EndAction>,
}

impl FunctionalTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: ResourceSet::new(),
            on_init: None,
            on_execute: None,
            finished: None,
            on_end: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn requiring(mut self, requirements: impl Into<ResourceSet>) -> Self {
        self.requirements = requirements.into();
        self
    }

    pub fn on_init(mut self, action: impl FnMut(&mut TaskContext<'_>) + Send + 'static) -> Self {
        self.on_init = Some(Box::new(action));
        self
    }

    pub fn on_execute(
        mut self,
        action: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    ) -> Self {
        self.on_execute = Some(Box::new(action));
        self
    }

    pub fn finish_when(
        mut self,
        predicate: impl FnMut(&mut TaskContext<'_>) -> bool + Send + 'static,
    ) -> Self {
        self.finished = Some(Box::new(predicate));
        self
    }

    pub fn on_end(
        mut self,
        action: impl FnMut(&mut TaskContext<'_>, bool) + Send + 'static,
    ) -> Self {
        self.on_end = Some(Box::new(action));
        self
    }
}

impl Task for FunctionalTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        if let Some(action) = self.on_init.as_mut() {
            action(ctx);
        }
    }

    fn execute(&mut self, ctx: &mut TaskContext<'_>) {
        if let Some(action) = self.on_execute.as_mut() {
            action(ctx);
        }
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        match self.finished.as_mut() {
            Some(predicate) => predicate(ctx),
            None => false,
        }
    }

    fn end(&mut self, ctx: &mut TaskContext<'_>, interrupted: bool) {
        if let Some(action) = self.on_end.as_mut() {
            action(ctx, interrupted);
        }
    }
}

/// Run `action` once at initialization and finish immediately
pub fn run_once(
    action: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    requirements: impl Into<ResourceSet>,
) -> FunctionalTask {
    FunctionalTask::new("run_once")
        .requiring(requirements)
        .on_init(action)
        .finish_when(|_| true)
}

/// Run `action` every tick; never finishes on its own
pub fn run(
    action: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    requirements: impl Into<ResourceSet>,
) -> FunctionalTask {
    FunctionalTask::new("run")
        .requiring(requirements)
        .on_execute(action)
}

/// Run `on_tick` every tick and `on_end` once when cancelled or superseded
pub fn run_end(
    on_tick: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    mut on_end: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    requirements: impl Into<ResourceSet>,
) -> FunctionalTask {
    FunctionalTask::new("run_end")
        .requiring(requirements)
        .on_execute(on_tick)
        .on_end(move |ctx, _| on_end(ctx))
}

/// Run `on_start` at initialization and `on_end` once when cancelled
pub fn start_end(
    on_start: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    mut on_end: impl FnMut(&mut TaskContext<'_>) + Send + 'static,
    requirements: impl Into<ResourceSet>,
) -> FunctionalTask {
    FunctionalTask::new("start_end")
        .requiring(requirements)
        .on_init(on_start)
        .on_end(move |ctx, _| on_end(ctx))
}

/// Task that does nothing and finishes immediately
pub fn none() -> FunctionalTask {
    FunctionalTask::new("none").finish_when(|_| true)
}

/// Finishes once `duration` has elapsed since initialization
pub fn wait(duration: Duration) -> Wait {
    Wait {
        duration,
        started: None,
        requirements: ResourceSet::new(),
    }
}

/// Finishes on the first tick `condition` reads true
pub fn wait_until(condition: Trigger) -> WaitUntil {
    WaitUntil {
        condition,
        requirements: ResourceSet::new(),
    }
}

pub struct Wait {
    duration: Duration,
    started: Option<Instant>,
    requirements: ResourceSet,
}

impl Task for Wait {
    fn name(&self) -> &str {
        "wait"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn initialize(&mut self, ctx: &mut TaskContext<'_>) {
        self.started = Some(ctx.now());
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        self.started
            .is_some_and(|started| ctx.now().duration_since(started) >= self.duration)
    }

    fn reset(&mut self) {
        self.started = None;
    }
}

pub struct WaitUntil {
    condition: Trigger,
    requirements: ResourceSet,
}

impl Task for WaitUntil {
    fn name(&self) -> &str {
        "wait_until"
    }

    fn requirements(&self) -> &ResourceSet {
        &self.requirements
    }

    fn is_finished(&mut self, ctx: &mut TaskContext<'_>) -> bool {
        self.condition.poll(ctx)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
