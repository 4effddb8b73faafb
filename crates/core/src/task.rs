// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One row of the input table: an ordered pipeline of steps sharing a name.

use crate::status::Status;
use crate::step::Step;

/// One task: a stable 1-based id, a name/info pair, and its ordered steps.
///
/// `run_counter` is the generation counter described in the engine's
/// concurrency protocol: workers capture it at submission and recheck it
/// after every suspension point, retiring without side effects on mismatch.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub info: String,
    pub steps: Vec<Step>,
    pub run_counter: u64,
}

impl Task {
    pub fn new(id: u64, name: String, info: String, steps: Vec<Step>) -> Self {
        Self {
            id,
            name,
            info,
            steps,
            run_counter: 0,
        }
    }

    /// Index of the first step whose status isn't `SUCCESS`, or `None` if
    /// every step already succeeded.
    pub fn first_non_success_step(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.status != Status::Success)
    }

    /// True once every step has reached a terminal status.
    pub fn is_finished(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_terminal())
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
