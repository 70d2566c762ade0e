// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Every error carries what went wrong, why it might have happened, and
//! how to fix it.

use rl_engine::{EngineError, Routine};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct RlError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for RlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for RlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures users actually hit.
impl RlError {
    /// A robot config file that could not be read or did not validate.
    pub fn config_invalid(path: &Path, err: EngineError) -> Self {
        let error = RlError::new(format!("invalid robot config '{}'", path.display()))
            .with_context(err.to_string());
        let error = match &err {
            EngineError::Io { .. } => error
                .with_suggestion("Check the path passed to --config")
                .with_suggestion("Run without --config to use the built-in defaults"),
            _ => error
                .with_suggestion(format!("Validate the file: rl check --config {}", path.display()))
                .with_suggestion("Print the defaults for reference: rl check --format json"),
        };
        error.with_source(err)
    }

    /// An autonomous routine name that is not in the chooser.
    pub fn unknown_routine(name: &str) -> Self {
        let available: Vec<&str> = Routine::ALL.iter().map(|r| r.as_str()).collect();
        RlError::new(format!("unknown autonomous routine '{}'", name))
            .with_context(format!("Available routines: {}", available.join(", ")))
            .with_suggestion("List routines with descriptions: rl autos")
    }

    /// A malformed `--hold` schedule entry.
    pub fn bad_hold(spec: &str, err: EngineError) -> Self {
        RlError::new(format!("invalid --hold '{}'", spec))
            .with_context(err.to_string())
            .with_suggestion("Use the form [driver.|operator.]CONTROL@START..END, e.g. operator.a@1s..2s")
            .with_source(err)
    }
}
