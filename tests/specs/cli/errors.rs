// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures a user can run into and what they are told

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    rl().args(&["fly"]).fails().stderr_has("unrecognized subcommand");
}

#[test]
fn missing_config_file_suggests_the_defaults() {
    let temp = Project::empty();
    temp.rl()
        .args(&["check", "--config", "missing.toml"])
        .fails()
        .stderr_has("error: invalid robot config 'missing.toml'")
        .stderr_has("failed to read missing.toml")
        .stderr_has("built-in defaults");
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = Project::empty();
    temp.file("robot.toml", "[arm]\nstow = 90.0\nwobble = 1\n");
    temp.rl()
        .args(&["check", "--config", "robot.toml"])
        .fails()
        .stderr_has("wobble")
        .stderr_has("rl check --config robot.toml");
}

#[test]
fn unknown_routine_lists_the_alternatives() {
    rl().args(&["sim", "--auto", "dance", "--duration", "100ms"])
        .fails()
        .stderr_has("unknown autonomous routine 'dance'")
        .stderr_has("score-l1, score-l2, score-l3, score-l4, get-piece, leave")
        .stdout_lacks("initialized");
}

#[test]
fn malformed_hold_shows_the_expected_form() {
    rl().args(&["sim", "--hold", "operator.a@2s..1s"])
        .fails()
        .stderr_has("invalid --hold 'operator.a@2s..1s'")
        .stderr_has("[driver.|operator.]CONTROL@START..END");
}

#[test]
fn unknown_control_in_hold_is_rejected() {
    rl().args(&["sim", "--hold", "operator.turbo@0s..1s"])
        .fails()
        .stderr_has("turbo");
}

#[test]
fn auto_and_no_auto_conflict() {
    rl().args(&["sim", "--auto", "leave", "--no-auto"])
        .fails()
        .stderr_has("cannot be used with");
}
