// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("task {task_id} has no step {from_step}")]
    NoSuchStep { task_id: u64, from_step: usize },

    #[error(
        "cannot rerun task {task_id} from step {from_step}: step {offending_step} has not succeeded"
    )]
    PrecedingStepsNotSucceeded {
        task_id: u64,
        from_step: usize,
        offending_step: usize,
    },

    #[error("no task with id {0}")]
    NoSuchTask(u64),
}
