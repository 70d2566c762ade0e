// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rl-core: cooperative task scheduling for multi-actuator robots
//!
//! This crate provides:
//! - Resources and resource sets that model exclusive actuator groups
//! - The `Task` lifecycle and primitive task builders
//! - Combinators (sequence, parallel, race, until, timeout, defer)
//! - Polled `Trigger` conditions with edge detection and debouncing
//! - The periodic `Scheduler` that ties them together

pub mod clock;
pub mod id;

pub mod binding;
pub mod combinators;
pub mod error;
pub mod event;
pub mod resource;
pub mod scheduler;
pub mod task;
pub mod trigger;

// Re-exports
pub use binding::{BindingAction, BindingKind};
pub use clock::{Clock, FakeClock, SystemClock};
pub use combinators::{
    deadline, defer, parallel, race, race_until, sequence, with_timeout, BeforeStarting, Deadline,
    Decorated, Defer, FinallyDo, Parallel, Race, RaceUntil, Sequence, TaskExt,
};
pub use error::{duration_from_secs, ConditionError, ConfigError, ScheduleError};
pub use event::SchedulerEvent;
pub use id::{SequentialIdGen, TaskId};
pub use resource::{Resource, ResourceSet};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use task::{
    none, run, run_end, run_once, start_end, wait, wait_until, BoxTask, FunctionalTask,
    InterruptBehavior, Task, TaskContext, TaskEffect, TaskState, Wait, WaitUntil,
};
pub use trigger::{DebounceKind, Trigger};
