// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The on-disk JSON shape, kept separate from the live `oj_core` model so
//! the wire format can stay stable while the in-memory types evolve.

use oj_core::Status;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    pub source_csv_sha256: String,
    pub tasks: Vec<TaskState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskState {
    pub id: u64,
    pub name: String,
    pub info: String,
    pub steps: Vec<StepState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepState {
    pub status: Status,
}
