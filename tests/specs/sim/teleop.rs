// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rl sim` with scripted controller input

use crate::prelude::*;

#[test]
fn both_triggers_switch_to_automatic() {
    rl().args(&[
        "sim",
        "--no-auto",
        "--duration",
        "1s",
        "--hold",
        "operator.lt@0s..100ms",
        "--hold",
        "operator.rt@0s..100ms",
    ])
    .passes()
    .stdout_has("toggle operator controls")
    .stdout_has("Mode: automatic");
}

#[test]
fn manual_jog_moves_the_elevator() {
    rl().args(&[
        "sim",
        "--no-auto",
        "--duration",
        "1s",
        "--hold",
        "operator.a@0s..500ms",
    ])
    .passes()
    .stdout_has("Mode: manual")
    .stdout_lacks("Elevator: 0.0 in");
}

#[test]
fn operator_input_interrupts_autonomous() {
    rl().args(&[
        "sim",
        "--duration",
        "400ms",
        "--hold",
        "operator.a@200ms..300ms",
    ])
    .passes()
    .stdout_has("interrupted  score L1");
}

#[test]
fn shooting_ejects_the_preload() {
    rl().args(&[
        "sim",
        "--no-auto",
        "--duration",
        "1s",
        "--hold",
        "rb@0s..500ms",
    ])
    .passes()
    .stdout_has("Piece: none");
}
