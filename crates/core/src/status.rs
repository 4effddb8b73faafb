// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The six-state step/task status enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a single step.
///
/// `SUCCESS`, `FAILED`, and `SKIPPED` are terminal for a single execution;
/// `KILLED` is terminal but re-runnable. `PENDING` is the only legal
/// starting state for a fresh execution of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
    Killed,
}

impl Status {
    /// Terminal for the current execution (won't transition on its own).
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Pending | Status::Running)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Pending => "PENDING",
            Status::Running => "RUNNING",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
            Status::Skipped => "SKIPPED",
            Status::Killed => "KILLED",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
