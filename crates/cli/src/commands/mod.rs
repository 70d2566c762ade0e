// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod autos;
pub mod check;
pub mod sim;

use crate::error::RlError;
use rl_engine::RobotConfig;
use std::path::Path;

/// Load the config at `path`, or the built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<RobotConfig, RlError> {
    match path {
        Some(path) => {
            let config =
                RobotConfig::load(path).map_err(|err| RlError::config_invalid(path, err))?;
            tracing::info!(path = %path.display(), "loaded robot config");
            Ok(config)
        }
        None => Ok(RobotConfig::default()),
    }
}
