// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Autonomous routine listing

use crate::output::{self, OutputFormat};
use clap::Args;
use rl_engine::Routine;
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Args)]
pub struct AutosArgs {
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct RoutineInfo {
    name: &'static str,
    description: &'static str,
    default: bool,
}

impl fmt::Display for RoutineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.default { "*" } else { " " };
        write!(f, "{} {:<10} {}", marker, self.name, self.description)
    }
}

pub fn handle(args: AutosArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config)?;
    let routines: Vec<RoutineInfo> = Routine::ALL
        .iter()
        .map(|routine| RoutineInfo {
            name: routine.as_str(),
            description: routine.description(),
            default: *routine == config.autonomous.default,
        })
        .collect();
    output::print_list(&routines, args.format);
    Ok(())
}
