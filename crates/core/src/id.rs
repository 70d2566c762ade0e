// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task handles

use serde::{Deserialize, Serialize};

/// Scheduler-assigned handle for a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Hands out monotonically increasing task ids, starting at 1
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    next: u64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}
