// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative periodic scheduler
//!
//! Each call to [`Scheduler::tick`] runs one cycle:
//!
//! 1. poll every binding's trigger once and queue start/cancel requests
//! 2. process queued cancels (interrupted cleanup)
//! 3. process queued starts, preempting conflicting holders
//! 4. execute every active task and end the ones that finished
//! 5. start the default task of every idle resource
//!
//! The scheduler owns the task registry, the active list and the
//! resource-to-holder map. At most one active task holds a resource.

use crate::binding::{Binding, BindingAction, BindingKind};
use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, ScheduleError};
use crate::event::SchedulerEvent;
use crate::id::{SequentialIdGen, TaskId};
use crate::resource::Resource;
use crate::task::{BoxTask, InterruptBehavior, Task, TaskContext, TaskEffect, TaskState};
use crate::trigger::Trigger;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// Loop timing for the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Nominal tick period; ticks that take longer are logged as overruns
    pub period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(20),
        }
    }
}

struct TaskSlot {
    task: BoxTask,
    state: TaskState,
    /// One-shot tasks leave the registry once they end
    transient: bool,
}

#[derive(Clone, Copy)]
enum StartOrigin<'a> {
    Requested,
    Default(&'a Resource),
}

pub struct Scheduler<C: Clock = SystemClock> {
    clock: C,
    config: SchedulerConfig,
    ids: SequentialIdGen,
    slots: HashMap<TaskId, TaskSlot>,
    active: Vec<TaskId>,
    holders: HashMap<Resource, TaskId>,
    defaults: BTreeMap<Resource, TaskId>,
    bindings: Vec<Binding>,
    pending_starts: Vec<TaskId>,
    pending_cancels: Vec<TaskId>,
    events: Vec<SchedulerEvent>,
    tick_count: u64,
    now: Instant,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(SchedulerConfig::default(), clock)
    }

    pub fn with_config(config: SchedulerConfig, clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            config,
            ids: SequentialIdGen::new(),
            slots: HashMap::new(),
            active: Vec::new(),
            holders: HashMap::new(),
            defaults: BTreeMap::new(),
            bindings: Vec::new(),
            pending_starts: Vec::new(),
            pending_cancels: Vec::new(),
            events: Vec::new(),
            tick_count: 0,
            now,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Add a task to the registry; it stays idle until scheduled
    pub fn register(&mut self, task: impl Task + 'static) -> TaskId {
        self.insert_slot(Box::new(task), false)
    }

    /// Remove a task from the registry, interrupting it if active, along
    /// with any bindings or default registrations that reference it
    pub fn unregister(&mut self, id: TaskId) -> Result<(), ScheduleError> {
        if !self.slots.contains_key(&id) {
            return Err(ScheduleError::UnknownTask(id));
        }
        self.end_task(id, true);
        self.remove_slot(id);
        self.defaults.retain(|_, default| *default != id);
        Ok(())
    }

    /// Queue a start for the next tick. Scheduling an active task is a no-op.
    pub fn schedule(&mut self, id: TaskId) -> Result<(), ScheduleError> {
        if !self.slots.contains_key(&id) {
            return Err(ScheduleError::UnknownTask(id));
        }
        self.queue_start(id);
        Ok(())
    }

    /// Register a one-shot task and queue its start
    pub fn schedule_task(&mut self, task: impl Task + 'static) -> TaskId {
        let id = self.insert_slot(Box::new(task), true);
        self.queue_start(id);
        id
    }

    /// Queue a cancel for the next tick and drop any queued start
    pub fn cancel(&mut self, id: TaskId) {
        self.pending_starts.retain(|pending| *pending != id);
        if self.active.contains(&id) && !self.pending_cancels.contains(&id) {
            self.pending_cancels.push(id);
        }
    }

    /// Interrupt every active task immediately
    pub fn cancel_all(&mut self) {
        self.pending_starts.clear();
        self.pending_cancels.clear();
        for id in self.active.clone() {
            self.end_task(id, true);
        }
    }

    /// Register `task` as the default for `resource`, replacing any previous
    /// default. The task must require `resource`.
    pub fn set_default(
        &mut self,
        resource: Resource,
        task: impl Task + 'static,
    ) -> Result<TaskId, ConfigError> {
        self.install_default(resource, Box::new(task))
    }

    pub fn clear_default(&mut self, resource: &Resource) {
        if let Some(old) = self.defaults.remove(resource) {
            self.end_task(old, true);
            self.remove_slot(old);
        }
    }

    pub fn default_for(&self, resource: &Resource) -> Option<TaskId> {
        self.defaults.get(resource).copied()
    }

    /// Bind `trigger` to a registered task with the given start policy
    pub fn bind(
        &mut self,
        trigger: Trigger,
        kind: BindingKind,
        id: TaskId,
    ) -> Result<(), ScheduleError> {
        if !self.slots.contains_key(&id) {
            return Err(ScheduleError::UnknownTask(id));
        }
        tracing::debug!(trigger = trigger.name(), ?kind, %id, "binding registered");
        self.bindings.push(Binding::new(trigger, kind, id));
        Ok(())
    }

    /// Run one scheduler cycle
    pub fn tick(&mut self) {
        self.tick_count += 1;
        self.now = self.clock.now();

        self.poll_bindings();

        for id in std::mem::take(&mut self.pending_cancels) {
            self.end_task(id, true);
        }

        for id in std::mem::take(&mut self.pending_starts) {
            self.start_task(id, StartOrigin::Requested);
        }

        self.run_active();
        self.start_defaults();

        let elapsed = self.clock.now().saturating_duration_since(self.now);
        if elapsed > self.config.period {
            tracing::warn!(
                tick = self.tick_count,
                elapsed_ms = elapsed.as_millis() as u64,
                period_ms = self.config.period.as_millis() as u64,
                "scheduler tick overran its period"
            );
        }
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.active.contains(&id)
    }

    /// Active task currently holding `resource`
    pub fn holder(&self, resource: &Resource) -> Option<TaskId> {
        self.holders.get(resource).copied()
    }

    /// Active tasks in start order
    pub fn active_ids(&self) -> &[TaskId] {
        &self.active
    }

    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.slots.get(&id).map(|slot| slot.state)
    }

    pub fn name(&self, id: TaskId) -> Option<&str> {
        self.slots.get(&id).map(|slot| slot.task.name())
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Drain the event log
    pub fn take_events(&mut self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut self.events)
    }

    fn insert_slot(&mut self, task: BoxTask, transient: bool) -> TaskId {
        let id = self.ids.next_id();
        self.slots.insert(
            id,
            TaskSlot {
                task,
                state: TaskState::Idle,
                transient,
            },
        );
        id
    }

    fn remove_slot(&mut self, id: TaskId) {
        self.slots.remove(&id);
        self.bindings.retain(|binding| binding.task != id);
        self.pending_starts.retain(|pending| *pending != id);
        self.pending_cancels.retain(|pending| *pending != id);
    }

    fn queue_start(&mut self, id: TaskId) {
        if !self.active.contains(&id) && !self.pending_starts.contains(&id) {
            self.pending_starts.push(id);
        }
    }

    fn install_default(&mut self, resource: Resource, task: BoxTask) -> Result<TaskId, ConfigError> {
        if !task.requirements().contains(&resource) {
            return Err(ConfigError::DefaultMissingResource { resource });
        }
        let name = task.name().to_string();
        let id = self.insert_slot(task, false);
        tracing::debug!(%resource, task = %name, %id, "default task set");
        if let Some(old) = self.defaults.insert(resource, id) {
            // a running old default yields so the new one starts this tick
            self.end_task(old, true);
            self.remove_slot(old);
        }
        Ok(id)
    }

    fn poll_bindings(&mut self) {
        let tick = self.tick_count;
        let mut actions = Vec::new();

        for binding in &mut self.bindings {
            let current = match binding.trigger.evaluate() {
                Ok(value) => value,
                Err(error) => {
                    tracing::warn!(
                        trigger = binding.trigger.name(),
                        %error,
                        "condition failed, reading as false"
                    );
                    self.events.push(SchedulerEvent::ConditionFailed {
                        tick,
                        trigger: binding.trigger.name().to_string(),
                        error: error.to_string(),
                    });
                    false
                }
            };
            if let Some(action) = binding.kind.action(binding.previous, current) {
                actions.push((action, binding.task));
            }
            binding.previous = current;
        }

        for (action, id) in actions {
            match action {
                BindingAction::Start => self.queue_start(id),
                BindingAction::Cancel => self.cancel(id),
                BindingAction::Toggle => {
                    if self.active.contains(&id) || self.pending_starts.contains(&id) {
                        self.cancel(id);
                    } else {
                        self.queue_start(id);
                    }
                }
            }
        }
    }

    fn start_task(&mut self, id: TaskId, origin: StartOrigin<'_>) -> bool {
        if self.active.contains(&id) {
            return false;
        }
        let Some(slot) = self.slots.get(&id) else {
            return false;
        };

        let mut conflicts: Vec<TaskId> = slot
            .task
            .requirements()
            .iter()
            .filter_map(|resource| self.holders.get(resource).copied())
            .collect();
        conflicts.sort();
        conflicts.dedup();

        for holder in &conflicts {
            let stubborn = self.slots.get(holder).is_some_and(|h| {
                h.task.interrupt_behavior() == InterruptBehavior::CancelIncoming
            });
            if stubborn {
                let name = slot.task.name().to_string();
                let transient = slot.transient;
                tracing::info!(task = %name, %id, %holder, "start rejected, holder is not interruptible");
                self.events.push(SchedulerEvent::Rejected {
                    tick: self.tick_count,
                    id,
                    name,
                    holder: *holder,
                });
                if transient {
                    self.remove_slot(id);
                }
                return false;
            }
        }

        for holder in conflicts {
            tracing::info!(%holder, incoming = %id, "preempting conflicting task");
            self.end_task(holder, true);
        }

        let Some(slot) = self.slots.get_mut(&id) else {
            return false;
        };
        if slot.state.is_ended() {
            slot.task.reset();
            slot.state = TaskState::Idle;
        }

        let mut effects = Vec::new();
        slot.task
            .initialize(&mut TaskContext::new(self.now, &mut effects));
        slot.state = TaskState::Initialized;
        let name = slot.task.name().to_string();
        let requirements = slot.task.requirements().clone();

        for resource in requirements.iter() {
            self.holders.insert(resource.clone(), id);
        }
        self.active.push(id);

        let tick = self.tick_count;
        match origin {
            StartOrigin::Requested => {
                tracing::debug!(task = %name, %id, resources = %requirements, "task initialized");
                self.events
                    .push(SchedulerEvent::Initialized { tick, id, name });
            }
            StartOrigin::Default(resource) => {
                tracing::debug!(task = %name, %id, %resource, "default task started");
                self.events.push(SchedulerEvent::DefaultStarted {
                    tick,
                    id,
                    name,
                    resource: resource.clone(),
                });
            }
        }

        self.apply_effects(effects);
        true
    }

    fn run_active(&mut self) {
        for id in self.active.clone() {
            if !self.active.contains(&id) {
                continue;
            }
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            let mut effects = Vec::new();
            let finished = {
                let mut ctx = TaskContext::new(self.now, &mut effects);
                slot.task.execute(&mut ctx);
                slot.state = TaskState::Executing;
                slot.task.is_finished(&mut ctx)
            };
            self.apply_effects(effects);
            if finished {
                self.end_task(id, false);
            }
        }
    }

    fn start_defaults(&mut self) {
        let defaults: Vec<(Resource, TaskId)> = self
            .defaults
            .iter()
            .map(|(resource, id)| (resource.clone(), *id))
            .collect();

        for (resource, id) in defaults {
            if self.holders.contains_key(&resource) || self.active.contains(&id) {
                continue;
            }
            let claimed = self.pending_starts.iter().any(|pending| {
                self.slots
                    .get(pending)
                    .is_some_and(|slot| slot.task.requirements().contains(&resource))
            });
            if claimed {
                continue;
            }
            // a default never preempts; wait until all of its resources are idle
            let Some(slot) = self.slots.get(&id) else {
                continue;
            };
            if slot
                .task
                .requirements()
                .iter()
                .any(|r| self.holders.contains_key(r))
            {
                continue;
            }
            self.start_task(id, StartOrigin::Default(&resource));
        }
    }

    /// Run cleanup, then free the task's resources
    fn end_task(&mut self, id: TaskId, interrupted: bool) {
        let Some(position) = self.active.iter().position(|active| *active == id) else {
            return;
        };
        self.active.remove(position);
        let Some(slot) = self.slots.get_mut(&id) else {
            return;
        };

        let mut effects = Vec::new();
        slot.task
            .end(&mut TaskContext::new(self.now, &mut effects), interrupted);
        slot.state = TaskState::Ended { interrupted };
        let name = slot.task.name().to_string();
        let transient = slot.transient;

        self.holders.retain(|_, holder| *holder != id);

        let tick = self.tick_count;
        if interrupted {
            tracing::debug!(task = %name, %id, interrupted, "task interrupted");
            self.events
                .push(SchedulerEvent::Interrupted { tick, id, name });
        } else {
            tracing::debug!(task = %name, %id, interrupted, "task finished");
            self.events.push(SchedulerEvent::Finished { tick, id, name });
        }

        if transient {
            self.remove_slot(id);
        }
        self.apply_effects(effects);
    }

    fn apply_effects(&mut self, effects: Vec<TaskEffect>) {
        for effect in effects {
            match effect {
                TaskEffect::Schedule(task) => {
                    let id = self.insert_slot(task, true);
                    self.queue_start(id);
                }
                TaskEffect::Cancel(id) => self.cancel(id),
                TaskEffect::SetDefault { resource, task } => {
                    if let Err(error) = self.install_default(resource, task) {
                        tracing::warn!(%error, "default task rejected");
                    }
                }
                TaskEffect::ConditionFailed { trigger, error } => {
                    self.events.push(SchedulerEvent::ConditionFailed {
                        tick: self.tick_count,
                        trigger,
                        error: error.to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
