// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash-safe persistence of task/step statuses, keyed to input-table
//! integrity.
//!
//! Saves are atomic (write to `.tmp`, fsync, rename-over); loads that fail
//! to parse or whose hash no longer matches the input table are treated
//! identically — discard and warn, never propagated as a fatal error.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use oj_core::{Status, TaskModel};
use tracing::warn;

use crate::error::StateError;
use crate::hash::sha256_hex;
use crate::wire::{StateDocument, StepState, TaskState};

pub struct StateStore;

impl StateStore {
    /// Serialize the current task/step statuses and atomically replace
    /// `model.state_path`. I/O failures are logged and leave any existing
    /// state file untouched — the engine never aborts on a save failure.
    pub fn save(model: &TaskModel) -> Result<(), StateError> {
        let source_csv_sha256 =
            sha256_hex(&model.input_path).map_err(|source| StateError::Io {
                path: model.input_path.clone(),
                source,
            })?;

        let doc = model.with_state(|state| StateDocument {
            source_csv_sha256: source_csv_sha256.clone(),
            tasks: state
                .tasks
                .iter()
                .map(|t| TaskState {
                    id: t.id,
                    name: t.name.clone(),
                    info: t.info.clone(),
                    steps: t
                        .steps
                        .iter()
                        .map(|s| StepState { status: s.status })
                        .collect(),
                })
                .collect(),
        });

        write_atomic(&model.state_path, &doc)
    }

    /// If a valid, hash-matching state file exists, merge its statuses into
    /// `model`'s current tasks. Any failure (missing file, parse error,
    /// hash mismatch) results in a fresh model and a warning; it is never
    /// surfaced to the caller.
    pub fn resume(model: &TaskModel) {
        if !model.state_path.exists() {
            return;
        }

        let doc = match load_document(&model.state_path) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(path = %model.state_path.display(), error = %err, "discarding unreadable state file");
                let _ = std::fs::remove_file(&model.state_path);
                return;
            }
        };

        let current_hash = match sha256_hex(&model.input_path) {
            Ok(h) => h,
            Err(err) => {
                warn!(path = %model.input_path.display(), error = %err, "could not hash input table, starting fresh");
                return;
            }
        };

        if doc.source_csv_sha256 != current_hash {
            warn!(path = %model.input_path.display(), "input table changed since last run, discarding saved state");
            let _ = std::fs::remove_file(&model.state_path);
            return;
        }

        model.with_state(|state| {
            let saved_by_id: std::collections::HashMap<u64, &TaskState> =
                doc.tasks.iter().map(|t| (t.id, t)).collect();

            for task in state.tasks.iter_mut() {
                let Some(saved) = saved_by_id.get(&task.id) else {
                    continue;
                };
                if saved.name != task.name {
                    warn!(id = task.id, "skipping saved state, task name changed");
                    continue;
                }

                let interrupted_at = saved
                    .steps
                    .iter()
                    .position(|s| matches!(s.status, Status::Running | Status::Killed));

                let restore_upto = interrupted_at.unwrap_or(saved.steps.len());
                for i in 0..restore_upto {
                    if let (Some(step), Some(saved_step)) =
                        (task.steps.get_mut(i), saved.steps.get(i))
                    {
                        step.status = saved_step.status;
                    }
                }
            }
        });
    }
}

fn load_document(path: &Path) -> Result<StateDocument, StateError> {
    let file = File::open(path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| StateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, doc: &StateDocument) -> Result<(), StateError> {
    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path).map_err(|source| StateError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, doc).map_err(|source| StateError::Json {
            path: tmp_path.clone(),
            source,
        })?;
        let file = writer.into_inner().map_err(|e| StateError::Io {
            path: tmp_path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all().map_err(|source| StateError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    std::fs::rename(&tmp_path, path).map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "state_store_tests.rs"]
mod tests;
