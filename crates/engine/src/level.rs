// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structure positions the arm and elevator can be driven to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
    Station,
    DealgaeHigh,
    DealgaeLow,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::L1,
        Level::L2,
        Level::L3,
        Level::L4,
        Level::Station,
        Level::DealgaeHigh,
        Level::DealgaeLow,
    ];

    /// The four reef branches a piece can be scored on
    pub const REEF: [Level; 4] = [Level::L1, Level::L2, Level::L3, Level::L4];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
            Level::L4 => "L4",
            Level::Station => "station",
            Level::DealgaeHigh => "dealgae-high",
            Level::DealgaeLow => "dealgae-low",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown level '{s}'"))
    }
}
