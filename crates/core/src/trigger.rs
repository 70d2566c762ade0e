// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polled boolean conditions
//!
//! A [`Trigger`] wraps a zero-argument condition. Derived triggers are
//! evaluated fresh on every poll; only [`Trigger::debounce`] keeps state.
//! Edge detection lives in the scheduler's bindings, not here.

use crate::clock::Clock;
use crate::error::ConditionError;
use crate::task::TaskContext;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type Condition = dyn Fn() -> Result<bool, ConditionError> + Send + Sync;

/// Which value changes a debounce delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceKind {
    /// Delay false -> true; falling edges pass through immediately
    Rising,
    /// Delay true -> false; rising edges pass through immediately
    Falling,
    /// Delay both directions
    Both,
}

#[derive(Clone)]
pub struct Trigger {
    name: Arc<str>,
    condition: Arc<Condition>,
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger").field("name", &self.name).finish()
    }
}

impl Trigger {
    pub fn new(condition: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self::fallible(move || Ok(condition()))
    }

    /// Trigger over a condition that may fail to evaluate
    pub fn fallible(
        condition: impl Fn() -> Result<bool, ConditionError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: Arc::from("trigger"),
            condition: Arc::new(condition),
        }
    }

    pub fn constant(value: bool) -> Self {
        Self::new(move || value).named(if value { "true" } else { "false" })
    }

    pub fn named(mut self, name: impl AsRef<str>) -> Self {
        self.name = Arc::from(name.as_ref());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self) -> Result<bool, ConditionError> {
        (self.condition)()
    }

    /// Ad-hoc read; a failed evaluation is logged and reads as false
    pub fn get(&self) -> bool {
        match self.evaluate() {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(trigger = %self.name, %error, "condition failed, reading as false");
                false
            }
        }
    }

    /// Read from inside a task lifecycle call; a failure reads as false and
    /// is reported to the scheduler
    pub fn poll(&self, ctx: &mut TaskContext<'_>) -> bool {
        match self.evaluate() {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(trigger = %self.name, %error, "condition failed, reading as false");
                ctx.condition_failed(&self.name, error);
                false
            }
        }
    }

    /// Both conditions, short-circuiting left to right
    ///
    /// A failed operand counts as false. The failure is returned only when
    /// the result depends on it, i.e. when the other side is not false.
    pub fn and(&self, other: &Trigger) -> Trigger {
        let (lhs, rhs) = (self.clone(), other.clone());
        Trigger {
            name: Arc::from(format!("({} && {})", self.name, other.name)),
            condition: Arc::new(move || match lhs.evaluate() {
                Ok(false) => Ok(false),
                Ok(true) => rhs.evaluate(),
                Err(error) => match rhs.evaluate() {
                    Ok(false) => Ok(false),
                    _ => Err(error),
                },
            }),
        }
    }

    /// Either condition, short-circuiting left to right
    ///
    /// A failed operand counts as false, so a true operand on the other
    /// side still makes the whole condition true.
    pub fn or(&self, other: &Trigger) -> Trigger {
        let (lhs, rhs) = (self.clone(), other.clone());
        Trigger {
            name: Arc::from(format!("({} || {})", self.name, other.name)),
            condition: Arc::new(move || match lhs.evaluate() {
                Ok(true) => Ok(true),
                Ok(false) => rhs.evaluate(),
                Err(error) => match rhs.evaluate() {
                    Ok(true) => Ok(true),
                    _ => Err(error),
                },
            }),
        }
    }

    /// Inverted condition. A failure stays a failure (and so reads false):
    /// a faulted sensor never asserts its negation.
    pub fn negate(&self) -> Trigger {
        let inner = self.clone();
        Trigger {
            name: Arc::from(format!("!{}", self.name)),
            condition: Arc::new(move || Ok(!inner.evaluate()?)),
        }
    }

    /// Suppress value changes until they have held stably for `duration`
    /// as measured on `clock`. The debounced value starts false, so a
    /// condition that is true from the start counts as a rising change.
    pub fn debounce(&self, duration: Duration, kind: DebounceKind, clock: impl Clock) -> Trigger {
        let inner = self.clone();
        let state = Arc::new(Mutex::new(Debounce::new(kind)));
        Trigger {
            name: self.name.clone(),
            condition: Arc::new(move || {
                let raw = inner.evaluate()?;
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                Ok(state.update(raw, clock.now(), duration))
            }),
        }
    }
}

struct Debounce {
    kind: DebounceKind,
    /// Starts false, like the bindings' edge detection
    stable: bool,
    pending_since: Option<Instant>,
}

impl Debounce {
    fn new(kind: DebounceKind) -> Self {
        Self {
            kind,
            stable: false,
            pending_since: None,
        }
    }

    fn update(&mut self, raw: bool, now: Instant, duration: Duration) -> bool {
        if raw == self.stable {
            self.pending_since = None;
            return self.stable;
        }

        let delayed = match self.kind {
            DebounceKind::Rising => raw,
            DebounceKind::Falling => !raw,
            DebounceKind::Both => true,
        };
        if !delayed {
            self.stable = raw;
            self.pending_since = None;
            return self.stable;
        }

        let since = *self.pending_since.get_or_insert(now);
        if now.duration_since(since) >= duration {
            self.stable = raw;
            self.pending_since = None;
        }
        self.stable
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
