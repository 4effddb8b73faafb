// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single command within a task: the unit of execution, state, and logging.

use std::path::PathBuf;
use std::time::Instant;

use crate::debug_ring::DebugRing;
use crate::process_handle::ProcessHandle;
use crate::status::Status;

/// One command in a task's pipeline, plus its mutable execution fields.
///
/// `log_path_stdout`/`log_path_stderr` are assigned once at load and never
/// reassigned (I8); the files themselves may be deleted and recreated on
/// rerun.
#[derive(Debug, Clone)]
pub struct Step {
    pub command: String,
    pub status: Status,
    pub process_handle: Option<ProcessHandle>,
    pub log_path_stdout: PathBuf,
    pub log_path_stderr: PathBuf,
    pub start_time: Option<Instant>,
    pub debug_log: DebugRing,
}

impl Step {
    pub fn new(command: String, log_path_stdout: PathBuf, log_path_stderr: PathBuf) -> Self {
        Self {
            command,
            status: Status::Pending,
            process_handle: None,
            log_path_stdout,
            log_path_stderr,
            start_time: None,
            debug_log: DebugRing::default(),
        }
    }

    /// Duration since `start_time`, or `None` if the step isn't running.
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.start_time.map(|t| t.elapsed())
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
