// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Controller Facade: the only surface a view or CLI driver touches.
//!
//! Every mutating method here takes the model lock for its entire
//! state transition, including the `KillGroup` call for `rerun`/`kill`/
//! `shutdown` — the one deliberate lock-held-across-a-blocking-call
//! exception described alongside the model's re-entrant mutex.

use std::sync::Arc;

use oj_adapters::kill_group_blocking;
use oj_core::{log_paths, ModelState, Status, Task, TaskModel};
use oj_storage::StateStore;
use tracing::warn;

use crate::error::ControllerError;
use crate::executor::run_task;
use crate::scheduler::Scheduler;

pub struct Controller {
    model: Arc<TaskModel>,
    scheduler: Arc<Scheduler>,
}

impl Controller {
    pub fn new(model: Arc<TaskModel>, scheduler: Arc<Scheduler>) -> Self {
        Self { model, scheduler }
    }

    pub fn model(&self) -> &Arc<TaskModel> {
        &self.model
    }

    /// Submit every task whose steps aren't all `SUCCESS` yet, each from
    /// its first non-`SUCCESS` step.
    pub fn start_initial(&self) {
        let submissions = self.model.with_state(|state| {
            state
                .tasks
                .iter_mut()
                .filter_map(|task| {
                    let from_step = task.first_non_success_step()?;
                    task.run_counter += 1;
                    Some((task.id, task.run_counter, from_step))
                })
                .collect::<Vec<_>>()
        });

        for (task_id, gen, from_step) in submissions {
            self.submit(task_id, gen, from_step);
        }
    }

    /// Bump the task's generation, kill any live handle and reset
    /// `[from_step, end)` to `PENDING` with truncated logs, then resubmit.
    ///
    /// Rejected (policy in §4.3.3) if `from_step > 0` and an earlier step
    /// hasn't `SUCCESS`ed.
    pub fn rerun(&self, task_id: u64, from_step: usize) -> Result<(), ControllerError> {
        let gen = self.model.with_state(|state| {
            let task =
                find_task_mut(state, task_id).ok_or(ControllerError::NoSuchTask(task_id))?;

            if from_step > task.steps.len() || (from_step == task.steps.len() && from_step > 0) {
                return Err(ControllerError::NoSuchStep { task_id, from_step });
            }
            if from_step > 0 {
                if let Some(offending_step) = task.steps[..from_step]
                    .iter()
                    .position(|s| s.status != Status::Success)
                {
                    return Err(ControllerError::PrecedingStepsNotSucceeded {
                        task_id,
                        from_step,
                        offending_step,
                    });
                }
            }

            task.run_counter += 1;
            for step in task.steps.iter_mut().skip(from_step) {
                if let Some(handle) = step.process_handle.take() {
                    kill_group_blocking(handle.pid);
                }
                step.status = Status::Pending;
                step.start_time = None;
                log_paths::truncate_step_logs(&step.log_path_stdout, &step.log_path_stderr);
            }
            Ok(task.run_counter)
        })?;

        self.submit(task_id, gen, from_step);
        Ok(())
    }

    /// Kill whichever step is currently `RUNNING`, skip every subsequent
    /// `PENDING` step, and invalidate the task's current worker. A no-op
    /// (beyond bumping the generation again) if nothing is running.
    pub fn kill(&self, task_id: u64) -> Result<(), ControllerError> {
        self.model.with_state(|state| {
            let task =
                find_task_mut(state, task_id).ok_or(ControllerError::NoSuchTask(task_id))?;
            task.run_counter += 1;

            let running = task.steps.iter().position(|s| s.status == Status::Running);
            if let Some(idx) = running {
                if let Some(handle) = task.steps[idx].process_handle.take() {
                    kill_group_blocking(handle.pid);
                }
                task.steps[idx].status = Status::Killed;
                task.steps[idx].start_time = None;
                for step in task.steps.iter_mut().skip(idx + 1) {
                    if step.status == Status::Pending {
                        step.status = Status::Skipped;
                    }
                }
            }
            Ok(())
        })
    }

    /// Invalidate every task's worker, kill every live subprocess, and
    /// persist a final snapshot. State-save failures are logged, not
    /// propagated — shutdown always completes.
    pub fn shutdown(&self) {
        self.model.with_state(|state| {
            for task in state.tasks.iter_mut() {
                task.run_counter += 1;
                for step in task.steps.iter_mut() {
                    if let Some(handle) = step.process_handle.take() {
                        kill_group_blocking(handle.pid);
                    }
                }
            }
        });

        if let Err(err) = StateStore::save(&self.model) {
            warn!(error = %err, "failed to save state on shutdown");
        }
    }

    fn submit(&self, task_id: u64, gen: u64, from_step: usize) {
        let model = self.model.clone();
        self.scheduler
            .submit(async move { run_task(model, task_id, gen, from_step).await });
    }
}

fn find_task_mut(state: &mut ModelState, task_id: u64) -> Option<&mut Task> {
    state.tasks.iter_mut().find(|t| t.id == task_id)
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
