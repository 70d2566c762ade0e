// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rl sim` running autonomous routines

use crate::prelude::*;

#[test]
fn score_l2_places_the_preload() {
    rl().args(&["sim", "--auto", "score-l2", "--duration", "3s"])
        .passes()
        .stdout_has("initialized  score L2")
        .stdout_has("finished     score L2")
        .stdout_has("Piece: none")
        .stdout_has("Arm: 90.0°")
        .stdout_has("Mode: manual")
        .stdout_has("Elapsed: 2980ms (150 ticks)");
}

#[test]
fn defaults_start_on_every_mechanism() {
    rl().args(&["sim", "--no-auto", "--duration", "100ms"])
        .passes()
        .stdout_has("default      arm stow")
        .stdout_has("default      elevator stow")
        .stdout_has("default      drive robot-oriented")
        .stdout_lacks("score")
        .stdout_has("Piece: held");
}

#[test]
fn configured_default_routine_runs_without_auto_flag() {
    let temp = Project::empty();
    temp.file("robot.toml", "[autonomous]\ndefault = \"leave\"\n");
    temp.rl()
        .args(&["sim", "--config", "robot.toml", "--duration", "2s"])
        .passes()
        .stdout_has("initialized  leave")
        .stdout_has("finished     leave");
}

#[test]
fn red_alliance_mirrors_the_run() {
    rl().args(&[
        "sim",
        "--alliance",
        "red",
        "--auto",
        "score-l1",
        "--duration",
        "4s",
    ])
    .passes()
    .stdout_has("finished     score L1")
    .stdout_has("Piece: none");
}

#[test]
fn json_streams_one_event_per_line_then_the_status() {
    let run = rl()
        .args(&[
            "sim",
            "--auto",
            "leave",
            "--duration",
            "2s",
            "--format",
            "json",
        ])
        .passes();
    let lines = run.json_lines();
    let (status, events) = lines.split_last().unwrap();

    assert!(events.iter().all(|e| e["event"].is_string()));
    assert!(events
        .iter()
        .any(|e| e["event"] == "finished" && e["name"] == "leave"));
    assert_eq!(status["status"]["ticks"], 100);
    assert_eq!(status["status"]["piece"], true);
}

#[test]
fn verbose_logs_go_to_stderr() {
    rl().args(&["-v", "sim", "--auto", "leave", "--duration", "100ms"])
        .passes()
        .stderr_has("robot initialized")
        .stderr_has("autonomous started")
        .stdout_lacks("robot initialized");
}

#[test]
fn rust_log_overrides_verbosity() {
    rl().env("RUST_LOG", "off")
        .args(&["-vv", "sim", "--no-auto", "--duration", "100ms"])
        .passes()
        .stderr_lacks("robot initialized");
}
