// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rl check` validates config files

use crate::prelude::*;

#[test]
fn defaults_are_valid() {
    rl().args(&["check"])
        .passes()
        .stdout_has("Config OK: built-in defaults")
        .stdout_has("Period: 20ms")
        .stdout_has("Alliance: blue")
        .stdout_has("Autonomous: score-l1")
        .stdout_has("dealgae-high")
        .stdout_has("shoot 2s");
}

#[test]
fn partial_file_overrides_only_what_it_names() {
    let temp = Project::empty();
    temp.file(
        "robot.toml",
        r#"
[field]
alliance = "red"

[timeouts]
shoot = "1s 500ms"

[autonomous]
default = "get-piece"
"#,
    );
    temp.rl()
        .args(&["check", "--config", "robot.toml"])
        .passes()
        .stdout_has("Config OK: robot.toml")
        .stdout_has("Alliance: red")
        .stdout_has("Autonomous: get-piece")
        .stdout_has("shoot 1s 500ms")
        .stdout_has("pickup 3s");
}

#[test]
fn json_output_round_trips_the_resolved_config() {
    let run = rl().args(&["check", "--format", "json"]).passes();
    let json = run.json();
    assert_eq!(json["source"], "built-in defaults");
    assert_eq!(json["config"]["scheduler"]["period"], "20ms");
    assert_eq!(json["config"]["arm"]["setpoints"]["l4"], 60.0);
    assert_eq!(json["config"]["field"]["alliance"], "blue");
}

#[test]
fn negative_tolerance_is_rejected() {
    let temp = Project::empty();
    temp.file("robot.toml", "[elevator]\ntolerance = -1.0\n");
    temp.rl()
        .args(&["check", "--config", "robot.toml"])
        .fails()
        .stderr_has("invalid robot config")
        .stderr_has("tolerance");
}

#[test]
fn zero_period_is_rejected() {
    let temp = Project::empty();
    temp.file("robot.toml", "[scheduler]\nperiod = \"0s\"\n");
    temp.rl()
        .args(&["check", "--config", "robot.toml"])
        .fails()
        .stderr_has("period");
}
