// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Autonomous routine selection

use crate::error::EngineError;
use crate::level::Level;
use crate::superstructure::SuperStructure;
use rl_adapters::{Actuator, Drivebase, PieceSensor, PoseSelector};
use rl_core::{BoxTask, ConfigError, TaskExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Routine {
    ScoreL1,
    ScoreL2,
    ScoreL3,
    ScoreL4,
    GetPiece,
    Leave,
}

impl Routine {
    pub const ALL: [Routine; 6] = [
        Routine::ScoreL1,
        Routine::ScoreL2,
        Routine::ScoreL3,
        Routine::ScoreL4,
        Routine::GetPiece,
        Routine::Leave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Routine::ScoreL1 => "score-l1",
            Routine::ScoreL2 => "score-l2",
            Routine::ScoreL3 => "score-l3",
            Routine::ScoreL4 => "score-l4",
            Routine::GetPiece => "get-piece",
            Routine::Leave => "leave",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Routine::ScoreL1 => "drive to the reef and score the preload on L1",
            Routine::ScoreL2 => "drive to the reef and score the preload on L2",
            Routine::ScoreL3 => "drive to the reef and score the preload on L3",
            Routine::ScoreL4 => "drive to the reef and score the preload on L4",
            Routine::GetPiece => "collect a piece from the station",
            Routine::Leave => "back out of the starting zone",
        }
    }

    fn build<A, D, P, S>(self, superstructure: &SuperStructure<A, D, P, S>) -> Result<BoxTask, ConfigError>
    where
        A: Actuator,
        D: Drivebase,
        P: PoseSelector,
        S: PieceSensor,
    {
        match self {
            Routine::ScoreL1 => superstructure.score(Level::L1),
            Routine::ScoreL2 => superstructure.score(Level::L2),
            Routine::ScoreL3 => superstructure.score(Level::L3),
            Routine::ScoreL4 => superstructure.score(Level::L4),
            Routine::GetPiece => superstructure.get_piece(),
            Routine::Leave => Ok(superstructure
                .drivebase()
                .retreat()
                .with_timeout(superstructure.config().autonomous.leave)
                .with_name("leave")
                .boxed()),
        }
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Routine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Routine::ALL
            .into_iter()
            .find(|routine| routine.as_str() == s)
            .ok_or_else(|| EngineError::UnknownAuto {
                name: s.to_string(),
                available: Routine::ALL.map(Routine::as_str).join(", "),
            })
    }
}

/// Named autonomous routines with one selected
pub struct AutoChooser<A, D, P, S> {
    superstructure: SuperStructure<A, D, P, S>,
    selected: Routine,
}

impl<A, D, P, S> AutoChooser<A, D, P, S>
where
    A: Actuator,
    D: Drivebase,
    P: PoseSelector,
    S: PieceSensor,
{
    pub fn new(superstructure: SuperStructure<A, D, P, S>) -> Self {
        let selected = superstructure.config().autonomous.default;
        Self {
            superstructure,
            selected,
        }
    }

    pub fn selected(&self) -> Routine {
        self.selected
    }

    pub fn select(&mut self, name: &str) -> Result<(), EngineError> {
        self.selected = name.parse()?;
        tracing::info!(routine = %self.selected, "autonomous selected");
        Ok(())
    }

    /// Build a fresh task for the selected routine
    pub fn selected_task(&self) -> Result<BoxTask, EngineError> {
        Ok(self.selected.build(&self.superstructure)?)
    }
}
