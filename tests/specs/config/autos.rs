// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rl autos` lists the routine chooser

use crate::prelude::*;

#[test]
fn lists_routines_with_the_default_marked() {
    rl().args(&["autos"])
        .passes()
        .stdout_has("* score-l1")
        .stdout_has("  score-l4   drive to the reef and score the preload on L4")
        .stdout_has("  get-piece  collect a piece from the station")
        .stdout_has("  leave");
}

#[test]
fn text_listing_is_aligned() {
    rl().args(&["autos"]).passes().stdout_eq(
        "* score-l1   drive to the reef and score the preload on L1
  score-l2   drive to the reef and score the preload on L2
  score-l3   drive to the reef and score the preload on L3
  score-l4   drive to the reef and score the preload on L4
  get-piece  collect a piece from the station
  leave      back out of the starting zone
",
    );
}

#[test]
fn default_follows_the_config() {
    let temp = Project::empty();
    temp.file("robot.toml", "[autonomous]\ndefault = \"leave\"\n");
    temp.rl()
        .args(&["autos", "--config", "robot.toml"])
        .passes()
        .stdout_has("* leave")
        .stdout_has("  score-l1");
}

#[test]
fn json_lists_every_routine() {
    let run = rl().args(&["autos", "--format", "json"]).passes();
    let json = run.json();
    let routines = json.as_array().unwrap();
    assert_eq!(routines.len(), 6);
    assert_eq!(routines[0]["name"], "score-l1");
    assert_eq!(routines[0]["default"], true);
    assert!(routines[1..].iter().all(|r| r["default"] == false));
}
