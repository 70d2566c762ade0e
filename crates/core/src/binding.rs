// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger-to-task start policies

use crate::id::TaskId;
use crate::trigger::Trigger;
use serde::{Deserialize, Serialize};

/// When a bound trigger starts or cancels its task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Start on the rising edge
    OnTrue,
    /// Start on the falling edge
    OnFalse,
    /// Start on the rising edge, cancel on the falling edge
    WhileTrue,
    /// Start on the falling edge, cancel on the rising edge
    WhileFalse,
    /// On the rising edge, cancel the task if active, otherwise start it
    ToggleOnTrue,
}

/// Request a binding files for its task on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    Start,
    Cancel,
    Toggle,
}

impl BindingKind {
    /// Action for a transition from `previous` to `current`, if any
    pub fn action(self, previous: bool, current: bool) -> Option<BindingAction> {
        let rising = !previous && current;
        let falling = previous && !current;
        match self {
            BindingKind::OnTrue if rising => Some(BindingAction::Start),
            BindingKind::OnFalse if falling => Some(BindingAction::Start),
            BindingKind::WhileTrue if rising => Some(BindingAction::Start),
            BindingKind::WhileTrue if falling => Some(BindingAction::Cancel),
            BindingKind::WhileFalse if falling => Some(BindingAction::Start),
            BindingKind::WhileFalse if rising => Some(BindingAction::Cancel),
            BindingKind::ToggleOnTrue if rising => Some(BindingAction::Toggle),
            _ => None,
        }
    }
}

/// A trigger bound to a registered task, with the previous poll cached
pub(crate) struct Binding {
    pub(crate) trigger: Trigger,
    pub(crate) kind: BindingKind,
    pub(crate) task: TaskId,
    pub(crate) previous: bool,
}

impl Binding {
    pub(crate) fn new(trigger: Trigger, kind: BindingKind, task: TaskId) -> Self {
        // the first poll is treated as a transition from false
        Self {
            trigger,
            kind,
            task,
            previous: false,
        }
    }
}
