// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulated match: autonomous routine plus scripted controller input

use crate::error::RlError;
use crate::output::{self, OutputFormat};
use clap::Args;
use rl_adapters::Alliance;
use rl_core::{FakeClock, SchedulerEvent, SystemClock};
use rl_engine::{EngineError, Hold, Pacing, Robot, RobotStatus, SimWorld};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct SimArgs {
    /// Autonomous routine to run (see `rl autos`); config default when omitted
    #[arg(long)]
    pub auto: Option<String>,

    /// Skip autonomous and only run the teleop bindings
    #[arg(long, conflicts_with = "auto")]
    pub no_auto: bool,

    /// Simulated match time
    #[arg(long, default_value = "15s", value_parser = humantime::parse_duration)]
    pub duration: Duration,

    /// Override the configured alliance; the start pose is mirrored with it
    #[arg(long)]
    pub alliance: Option<Alliance>,

    /// Hold a control for a window, e.g. operator.a@1s..2s (repeatable)
    #[arg(long = "hold", value_name = "SPEC")]
    pub holds: Vec<String>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn handle(args: SimArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let mut config = super::load_config(config)?;
    if let Some(alliance) = args.alliance {
        if alliance != config.field.alliance {
            config.sim.start = config.sim.start.mirrored(&config.field.size());
            config.field.alliance = alliance;
        }
    }

    let holds = args
        .holds
        .iter()
        .map(|spec| {
            spec.parse::<Hold>()
                .map_err(|err| RlError::bad_hold(spec, err))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let world = SimWorld::new(&config).with_holds(holds);

    if args.realtime {
        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
        })?;
        let robot = Robot::new(config, world, SystemClock)?;
        simulate(robot, &args, || running.load(Ordering::SeqCst))
    } else {
        let robot = Robot::new(config, world, FakeClock::new())?;
        simulate(robot, &args, || true)
    }
}

fn simulate<C: Pacing>(
    mut robot: Robot<C>,
    args: &SimArgs,
    running: impl Fn() -> bool,
) -> anyhow::Result<()> {
    if !args.no_auto {
        if let Some(name) = &args.auto {
            robot.autos_mut().select(name).map_err(|err| match err {
                EngineError::UnknownAuto { .. } => anyhow::Error::new(RlError::unknown_routine(name)),
                other => anyhow::Error::new(other),
            })?;
        }
        robot.run_autonomous()?;
    }

    let format = args.format;
    robot.run_while(args.duration, running, |event: &SchedulerEvent| {
        output::print_line(event, format)
    });

    let summary = Summary {
        status: robot.status(),
    };
    tracing::info!(
        ticks = summary.status.ticks,
        piece = summary.status.piece,
        "simulation finished"
    );
    output::print_line(&summary, format);
    Ok(())
}

/// Final line of the run
#[derive(Serialize)]
struct Summary {
    status: RobotStatus,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}", self.status)
    }
}
