// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the robot engine

use rl_core::{ConfigError, ScheduleError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running the robot
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unknown autonomous routine '{name}' (available: {available})")]
    UnknownAuto { name: String, available: String },
    #[error("unknown gamepad input '{0}'")]
    UnknownInput(String),
    #[error("invalid hold '{spec}': {reason}")]
    InvalidHold { spec: String, reason: String },
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}
