// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `run_task`: the sequential per-task worker loop.
//!
//! A worker captures its task's generation at submission time and rechecks
//! it under the lock after every suspension point (`Launch`, `Wait`). A
//! mismatch means a `Rerun`/`Kill`/`Cleanup` has already claimed this task;
//! the worker retires without touching step state any further.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use oj_adapters::{kill_group, launch, SupervisorError};
use oj_core::{ModelState, Status, Task, TaskModel};
use tracing::debug;

fn find_task_mut(state: &mut ModelState, task_id: u64) -> Option<&mut Task> {
    state.tasks.iter_mut().find(|t| t.id == task_id)
}

enum LaunchDecision {
    Stale,
    StepAlreadyStarted,
    Launch {
        command: String,
        stdout: PathBuf,
        stderr: PathBuf,
    },
}

enum WaitOutcome {
    Stale,
    ExternallyChanged,
    Failed,
    Succeeded,
}

/// Run task `task_id`'s steps from `from_step` to completion, so long as
/// its `run_counter` still equals `gen`. Exits silently the moment it
/// doesn't.
pub async fn run_task(model: Arc<TaskModel>, task_id: u64, gen: u64, from_step: usize) {
    let step_count = model.with_state(|state| {
        find_task_mut(state, task_id)
            .map(|t| t.steps.len())
            .unwrap_or(0)
    });

    let mut i = from_step;
    while i < step_count {
        let decision = model.with_state(|state| {
            let Some(task) = find_task_mut(state, task_id) else {
                return LaunchDecision::Stale;
            };
            if task.run_counter != gen {
                return LaunchDecision::Stale;
            }
            let step = &mut task.steps[i];
            if step.status != Status::Pending {
                step.debug_log
                    .push(format!("step left {} before launch, not re-running", step.status));
                return LaunchDecision::StepAlreadyStarted;
            }
            step.status = Status::Running;
            step.start_time = Some(Instant::now());
            LaunchDecision::Launch {
                command: step.command.clone(),
                stdout: step.log_path_stdout.clone(),
                stderr: step.log_path_stderr.clone(),
            }
        });

        let (command, stdout, stderr) = match decision {
            LaunchDecision::Stale => return,
            LaunchDecision::StepAlreadyStarted => {
                i += 1;
                continue;
            }
            LaunchDecision::Launch { command, stdout, stderr } => (command, stdout, stderr),
        };

        let mut handle = match launch(&command, &stdout, &stderr).await {
            Ok(handle) => handle,
            Err(err) => {
                model.with_state(|state| {
                    let Some(task) = find_task_mut(state, task_id) else {
                        return;
                    };
                    if task.run_counter != gen {
                        return;
                    }
                    task.steps[i].status = Status::Failed;
                    task.steps[i].start_time = None;
                    task.steps[i].debug_log.push(format!("launch failed: {err}"));
                    skip_remaining(task, i + 1);
                });
                append_launch_diagnostic(&stderr, &err);
                return;
            }
        };

        let pid = handle.pid();
        let stale_after_launch = model.with_state(|state| {
            let Some(task) = find_task_mut(state, task_id) else {
                return true;
            };
            if task.run_counter != gen {
                return true;
            }
            task.steps[i].process_handle = Some(handle.process_handle());
            false
        });
        if stale_after_launch {
            kill_group(pid).await;
            return;
        }

        let wait_result = handle.wait().await;

        let outcome = model.with_state(|state| {
            let Some(task) = find_task_mut(state, task_id) else {
                return WaitOutcome::Stale;
            };
            if task.run_counter != gen {
                return WaitOutcome::Stale;
            }
            let duration = task.steps[i].elapsed();
            task.steps[i].process_handle = None;
            task.steps[i].start_time = None;

            if task.steps[i].status != Status::Running {
                // Not currently reachable: Kill/Rerun always bump run_counter,
                // so the generation check above already retires this worker
                // before it gets here. Kept as a guard in case that invariant
                // ever changes.
                return WaitOutcome::ExternallyChanged;
            }

            let exit_code = wait_result.as_ref().copied().unwrap_or(-1);
            let success = exit_code == 0;
            task.steps[i].status = if success { Status::Success } else { Status::Failed };
            task.steps[i].debug_log.push(match duration {
                Some(d) => format!("exited {exit_code} after {d:?}"),
                None => format!("exited {exit_code}"),
            });

            if !success {
                skip_remaining(task, i + 1);
                return WaitOutcome::Failed;
            }
            WaitOutcome::Succeeded
        });

        match outcome {
            WaitOutcome::Stale | WaitOutcome::ExternallyChanged | WaitOutcome::Failed => return,
            WaitOutcome::Succeeded => i += 1,
        }
    }

    debug!(task_id, gen, "task run completed");
}

/// Mark every step from `from` onward `SKIPPED`. Called once a step fails;
/// the remaining steps in the prefix are always `PENDING` at this point.
fn skip_remaining(task: &mut Task, from: usize) {
    for step in task.steps.iter_mut().skip(from) {
        step.status = Status::Skipped;
    }
}

/// Best-effort note appended to the step's stderr log when `Launch` itself
/// failed (as opposed to the command running and exiting non-zero).
fn append_launch_diagnostic(stderr_path: &Path, err: &SupervisorError) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(stderr_path) {
        let _ = writeln!(file, "[supervisor] launch failed: {err}");
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
