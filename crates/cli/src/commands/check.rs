// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config validation command

use crate::output::{self, OutputFormat};
use clap::Args;
use rl_engine::{Level, RobotConfig};
use serde::Serialize;
use std::fmt;
use std::path::Path;

#[derive(Args)]
pub struct CheckArgs {
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CheckReport {
    source: String,
    config: RobotConfig,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.config;
        writeln!(f, "Config OK: {}", self.source)?;
        writeln!(f, "  Period: {}", humantime::format_duration(c.scheduler.period))?;
        writeln!(f, "  Alliance: {}", c.field.alliance)?;
        writeln!(f, "  Reef: {}", c.field.reef)?;
        writeln!(f, "  Station: {}", c.field.station)?;
        writeln!(f, "  Autonomous: {}", c.autonomous.default)?;
        writeln!(f, "  Setpoints:")?;
        writeln!(f, "    {:<14} {:>8} {:>10}", "LEVEL", "ARM", "ELEVATOR")?;
        for level in Level::ALL {
            writeln!(
                f,
                "    {:<14} {:>8.1} {:>10.1}",
                level.as_str(),
                c.arm.setpoints.get(level),
                c.elevator.setpoints.get(level)
            )?;
        }
        write!(
            f,
            "  Timeouts: stop-drive {}, shoot {}, retreat {}, pickup {}",
            humantime::format_duration(c.timeouts.stop_drive),
            humantime::format_duration(c.timeouts.shoot),
            humantime::format_duration(c.timeouts.retreat),
            humantime::format_duration(c.timeouts.pickup)
        )
    }
}

pub fn handle(args: CheckArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let loaded = super::load_config(config)?;
    let report = CheckReport {
        source: config
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
        config: loaded,
    };
    output::print(&report, args.format);
    Ok(())
}
