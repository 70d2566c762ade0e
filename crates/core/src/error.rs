// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for task composition and scheduling

use crate::id::TaskId;
use crate::resource::{Resource, ResourceSet};
use std::time::Duration;
use thiserror::Error;

/// Malformed composition or configuration, rejected at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{kind} requires at least one child task")]
    EmptyComposite { kind: &'static str },
    #[error("parallel children overlap on resources {overlap}")]
    OverlappingRequirements { overlap: ResourceSet },
    #[error("invalid duration for {what}: {value}s (must be finite and positive)")]
    InvalidDuration { what: String, value: f64 },
    #[error("invalid value for {what}: {value}")]
    InvalidValue { what: String, value: f64 },
    #[error("default task for {resource} must require {resource}")]
    DefaultMissingResource { resource: Resource },
}

/// Usage errors reported when a task is scheduled or bound
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unknown task {0}: it was never registered, was unregistered, or already ended")]
    UnknownTask(TaskId),
}

/// A trigger condition that could not be evaluated this tick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConditionError(pub String);

impl ConditionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Convert a duration given in seconds, rejecting negative, zero and
/// non-finite values
pub fn duration_from_secs(what: &str, secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidDuration {
            what: what.to_string(),
            value: secs,
        });
    }
    Ok(Duration::from_secs_f64(secs))
}
