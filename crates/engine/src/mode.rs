// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator control mode
//!
//! The robot starts in manual mode: the operator jogs each mechanism and the
//! arm and elevator hold position when released. Automatic mode binds the
//! face buttons to level presets and stows to fixed setpoints.

use rl_core::Trigger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared mode state. Clones observe the same flags; only the coordinator's
/// tasks change them.
#[derive(Debug, Clone)]
pub struct OperatorMode {
    manual: Arc<AtomicBool>,
    sequence_active: Arc<AtomicBool>,
}

impl OperatorMode {
    pub(crate) fn new() -> Self {
        Self {
            manual: Arc::new(AtomicBool::new(true)),
            sequence_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_manual(&self) -> bool {
        self.manual.load(Ordering::SeqCst)
    }

    /// True while a score or pickup sequence is running
    pub fn sequence_active(&self) -> bool {
        self.sequence_active.load(Ordering::SeqCst)
    }

    /// Flip the mode, returning whether it is now manual
    pub(crate) fn toggle(&self) -> bool {
        !self.manual.fetch_xor(true, Ordering::SeqCst)
    }

    pub(crate) fn set_manual(&self, manual: bool) {
        self.manual.store(manual, Ordering::SeqCst);
    }

    pub(crate) fn set_sequence_active(&self, active: bool) {
        self.sequence_active.store(active, Ordering::SeqCst);
    }

    pub fn manual_trigger(&self) -> Trigger {
        let manual = self.manual.clone();
        Trigger::new(move || manual.load(Ordering::SeqCst)).named("operator manual")
    }

    pub fn sequence_trigger(&self) -> Trigger {
        let active = self.sequence_active.clone();
        Trigger::new(move || active.load(Ordering::SeqCst)).named("sequence active")
    }
}
