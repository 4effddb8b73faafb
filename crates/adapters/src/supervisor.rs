// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(unsafe_code)]

//! Launches a shell command in its own process group and terminates the
//! whole group with a bounded SIGTERM-then-SIGKILL escalation.
//!
//! The pid is also the process-group id: every launch runs `setsid()` in
//! the child before `exec`, so the new process becomes session and
//! process-group leader. `KillGroup` therefore only needs the pid — it
//! never needs a reference to the `tokio::process::Child` that owns the
//! `.wait()` call, which lets the engine keep that `Child` local to the
//! task that launched it while still allowing any other task to kill it.

use std::fs::File;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use oj_core::ProcessHandle;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};

use crate::error::SupervisorError;

const KILL_ESCALATION_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A launched subprocess. Holds the live `Child` so `.wait()` can be
/// called exactly once by whichever task owns this handle; `pid()` is
/// `Copy`-able out as an [`oj_core::ProcessHandle`] for anyone else who
/// only needs to kill the group.
pub struct Handle {
    pid: u32,
    child: Child,
}

impl Handle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn process_handle(&self) -> ProcessHandle {
        ProcessHandle::new(self.pid)
    }

    /// Blocks until the process terminates; returns an exit code that
    /// compares unequal to 0 for any non-success termination, including
    /// signal termination (represented as the negated signal number).
    pub async fn wait(&mut self) -> Result<i32, SupervisorError> {
        let status = self.child.wait().await.map_err(SupervisorError::Wait)?;
        Ok(exit_code(status))
    }
}

fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

/// Spawn `command` under a system shell, in a new process group, with
/// stdout/stderr redirected to freshly-truncated log files.
pub async fn launch(
    command: &str,
    stdout_path: &Path,
    stderr_path: &Path,
) -> Result<Handle, SupervisorError> {
    let stdout_file = File::create(stdout_path).map_err(|source| SupervisorError::LogOpen {
        path: stdout_path.to_path_buf(),
        source,
    })?;
    let stderr_file = File::create(stderr_path).map_err(|source| SupervisorError::LogOpen {
        path: stderr_path.to_path_buf(),
        source,
    })?;

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file))
        .stderr(Stdio::from(stderr_file));

    #[cfg(unix)]
    {
        use std::io;
        // SAFETY: setsid() is async-signal-safe and is the only thing run
        // between fork and exec here; it detaches the child into its own
        // session and process group so the whole group can later be
        // signalled as a unit.
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    let child = cmd.spawn().map_err(SupervisorError::Spawn)?;
    let pid = child.id().unwrap_or(0);
    Ok(Handle { pid, child })
}

/// Resolve the process group for `pid` and send it SIGTERM. Returns the
/// pgid to poll, or `None` if the group was already gone.
#[cfg(unix)]
fn send_sigterm(pid: u32) -> Option<libc::pid_t> {
    let pgid = unsafe { libc::getpgid(pid as libc::pid_t) };
    if pgid == -1 {
        return None;
    }
    // SAFETY: signalling a process group id (negative pid) we just
    // resolved via getpgid; no memory is touched.
    unsafe {
        libc::kill(-pgid, libc::SIGTERM);
    }
    Some(pgid)
}

#[cfg(unix)]
fn is_alive(pgid: libc::pid_t) -> bool {
    unsafe { libc::kill(pgid, 0) == 0 }
}

#[cfg(unix)]
fn send_sigkill(pgid: libc::pid_t) {
    // SAFETY: same process group already verified alive by the caller.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

/// SIGTERM the whole process group, wait up to 2 seconds, then SIGKILL if
/// it's still alive. A no-op if the group is already gone.
///
/// Used by an async worker to clean up its own in-flight subprocess after
/// discovering its generation is stale — always called outside the model
/// lock, so sleeping here only ever parks the calling task.
pub async fn kill_group(pid: u32) {
    #[cfg(unix)]
    {
        let Some(pgid) = send_sigterm(pid) else {
            return;
        };

        let deadline = Instant::now() + KILL_ESCALATION_TIMEOUT;
        while Instant::now() < deadline {
            if !is_alive(pgid) {
                return;
            }
            sleep(POLL_INTERVAL).await;
        }

        if is_alive(pgid) {
            send_sigkill(pgid);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
    }
}

/// Same escalation as [`kill_group`], but synchronous: parks the calling
/// OS thread instead of yielding to the async runtime.
///
/// This is the one supervisor call the engine makes while still holding
/// the model lock (Rerun/Kill/Cleanup) — an intentional trade-off (worst
/// case it stalls other workers trying to acquire the lock for up to 2
/// seconds) documented alongside the lock itself.
pub fn kill_group_blocking(pid: u32) {
    #[cfg(unix)]
    {
        let Some(pgid) = send_sigterm(pid) else {
            return;
        };

        let deadline = std::time::Instant::now() + KILL_ESCALATION_TIMEOUT;
        while std::time::Instant::now() < deadline {
            if !is_alive(pgid) {
                return;
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        if is_alive(pgid) {
            send_sigkill(pgid);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
