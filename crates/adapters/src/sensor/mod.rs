// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game piece sensing

use rl_core::{ConditionError, Trigger};
use std::sync::{Arc, Mutex, MutexGuard};

/// Beam-break style sensor reporting whether a game piece is held
pub trait PieceSensor: Clone + Send + Sync + 'static {
    fn present(&self) -> Trigger;
}

#[derive(Default)]
struct SensorState {
    present: bool,
    fault: Option<String>,
}

/// Settable piece sensor with fault injection
#[derive(Clone, Default)]
pub struct SimSensor {
    state: Arc<Mutex<SensorState>>,
}

impl SimSensor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SensorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_present(&self, present: bool) {
        self.lock().present = present;
    }

    pub fn is_present(&self) -> bool {
        self.lock().present
    }

    /// While set, every read of [`PieceSensor::present`] fails
    pub fn set_fault(&self, fault: Option<&str>) {
        self.lock().fault = fault.map(str::to_string);
    }
}

impl PieceSensor for SimSensor {
    fn present(&self) -> Trigger {
        let this = self.clone();
        Trigger::fallible(move || {
            let state = this.lock();
            match &state.fault {
                Some(fault) => Err(ConditionError::new(fault.clone())),
                None => Ok(state.present),
            }
        })
        .named("piece present")
    }
}
