// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler observability log

use crate::id::TaskId;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Something the scheduler did during a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    /// Task started and ran its initialization
    Initialized { tick: u64, id: TaskId, name: String },

    /// Task's termination predicate returned true; cleanup ran normally
    Finished { tick: u64, id: TaskId, name: String },

    /// Task was cancelled or preempted; cleanup ran as interrupted
    Interrupted { tick: u64, id: TaskId, name: String },

    /// Start refused because a non-interruptible task holds a resource
    Rejected {
        tick: u64,
        id: TaskId,
        name: String,
        holder: TaskId,
    },

    /// Default task started on an idle resource
    DefaultStarted {
        tick: u64,
        id: TaskId,
        name: String,
        resource: Resource,
    },

    /// A trigger condition failed and read as false
    ConditionFailed {
        tick: u64,
        trigger: String,
        error: String,
    },
}

impl SchedulerEvent {
    pub fn tick(&self) -> u64 {
        match self {
            SchedulerEvent::Initialized { tick, .. }
            | SchedulerEvent::Finished { tick, .. }
            | SchedulerEvent::Interrupted { tick, .. }
            | SchedulerEvent::Rejected { tick, .. }
            | SchedulerEvent::DefaultStarted { tick, .. }
            | SchedulerEvent::ConditionFailed { tick, .. } => *tick,
        }
    }

    /// Task the event concerns, if any
    pub fn task(&self) -> Option<TaskId> {
        match self {
            SchedulerEvent::Initialized { id, .. }
            | SchedulerEvent::Finished { id, .. }
            | SchedulerEvent::Interrupted { id, .. }
            | SchedulerEvent::Rejected { id, .. }
            | SchedulerEvent::DefaultStarted { id, .. } => Some(*id),
            SchedulerEvent::ConditionFailed { .. } => None,
        }
    }
}

impl std::fmt::Display for SchedulerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerEvent::Initialized { tick, id, name } => {
                write!(f, "[{tick:>5}] initialized  {name} ({id})")
            }
            SchedulerEvent::Finished { tick, id, name } => {
                write!(f, "[{tick:>5}] finished     {name} ({id})")
            }
            SchedulerEvent::Interrupted { tick, id, name } => {
                write!(f, "[{tick:>5}] interrupted  {name} ({id})")
            }
            SchedulerEvent::Rejected {
                tick,
                id,
                name,
                holder,
            } => write!(f, "[{tick:>5}] rejected     {name} ({id}), held by {holder}"),
            SchedulerEvent::DefaultStarted {
                tick,
                id,
                name,
                resource,
            } => write!(f, "[{tick:>5}] default      {name} ({id}) on {resource}"),
            SchedulerEvent::ConditionFailed {
                tick,
                trigger,
                error,
            } => write!(f, "[{tick:>5}] condition    {trigger} failed: {error}"),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
