// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    rl().args(&["--help"])
        .passes()
        .stdout_has("check")
        .stdout_has("autos")
        .stdout_has("sim")
        .stdout_has("--config");
}

#[test]
fn version_prints_the_package_version() {
    rl().args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn sim_help_documents_the_hold_syntax() {
    rl().args(&["sim", "--help"])
        .passes()
        .stdout_has("--hold")
        .stdout_has("operator.a@1s..2s")
        .stdout_has("--realtime");
}
