// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lightweight token a [`crate::Step`] holds while a subprocess is live.
//!
//! The engine keeps the real `tokio::process::Child` local to the async
//! task that owns its `.wait()` call; only the pid travels into the model
//! so [`crate::Step::process_handle`] can stay `Copy` and cheap to store
//! under the model lock. Killing a process group only ever needs the pid.

/// Reference to a live subprocess, carried on [`crate::Step`] while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
    /// The pid of the subprocess, which is also its process group id
    /// (the supervisor always launches with `setsid`).
    pub pid: u32,
}

impl ProcessHandle {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }
}
