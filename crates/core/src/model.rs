// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskModel`: the parsed task list plus the one re-entrant mutex that
//! guards every mutable task/step field.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use parking_lot::ReentrantMutex;

use crate::error::LoadError;
use crate::log_paths;
use crate::task::Task;
use crate::step::Step;

/// The dynamic header derived from the input table: "TaskName", "Info",
/// then one short label per command column, taken from the longest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub labels: Vec<String>,
}

/// All mutable state guarded by [`TaskModel`]'s lock.
#[derive(Debug, Default)]
pub struct ModelState {
    pub tasks: Vec<Task>,
}

/// The parsed task table plus the paths derived from it and the lock
/// guarding every mutable field.
///
/// The lock is re-entrant specifically so that `KillGroup` (which may log
/// to a step's debug ring) can be invoked from inside a function already
/// holding the lock. Cross-thread access is still serialized: only
/// same-thread reentry is permitted, and the inner `RefCell` turns that
/// reentry into ordinary runtime-checked borrowing.
#[derive(Debug)]
pub struct TaskModel {
    pub header: Header,
    pub input_path: PathBuf,
    pub state_path: PathBuf,
    pub log_root: PathBuf,
    state: ReentrantMutex<RefCell<ModelState>>,
}

impl TaskModel {
    /// Parse the input table and create the log-root directory.
    ///
    /// Does not consult a saved state file — pair this with
    /// `oj_storage::StateStore::load` to resume.
    pub fn load(input_path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let input_path = input_path.as_ref().to_path_buf();
        let (header, tasks, log_root) = load_tasks_from_csv(&input_path)?;
        let state_path = log_paths::state_path_for_input(&input_path);

        Ok(Self {
            header,
            input_path,
            state_path,
            log_root,
            state: ReentrantMutex::new(RefCell::new(ModelState { tasks })),
        })
    }

    /// Run `f` with shared access to the model state under the lock.
    ///
    /// `f` may call back into another method on `self` that also locks
    /// (e.g. a kill routine logging to a step's debug ring) because the
    /// mutex is re-entrant on the calling thread.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ModelState) -> R) -> R {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        f(&mut state)
    }
}

fn load_tasks_from_csv(
    input_path: &Path,
) -> Result<(Header, Vec<Task>, PathBuf), LoadError> {
    if !input_path.exists() {
        return Err(LoadError::NotFound(input_path.to_path_buf()));
    }

    let bytes = std::fs::read(input_path).map_err(|source| LoadError::Io {
        path: input_path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: input_path.to_path_buf(),
            source,
        })?;
        if record.is_empty() {
            continue;
        }
        let name_is_blank = record.get(0).map(|s| s.trim().is_empty()).unwrap_or(true);
        if name_is_blank {
            continue;
        }
        rows.push(record);
    }

    let header = derive_header(&rows);
    let log_root = log_paths::log_root_for_input(input_path);
    std::fs::create_dir_all(&log_root).map_err(|source| LoadError::LogDirCreate {
        path: log_root.clone(),
        source,
    })?;

    let mut tasks = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let id = (i + 1) as u64;
        let name = row.get(0).unwrap_or("").trim().to_string();
        if name.is_empty() {
            return Err(LoadError::EmptyTaskName { row: id });
        }
        let info = row.get(1).map(|s| s.trim().to_string()).unwrap_or_default();
        let commands: Vec<String> = row
            .iter()
            .skip(2)
            .filter(|cmd| !cmd.trim().is_empty())
            .map(|cmd| cmd.to_string())
            .collect();

        let task_dir = log_paths::task_log_dir(&log_root, id, &name);
        std::fs::create_dir_all(&task_dir).map_err(|source| LoadError::LogDirCreate {
            path: task_dir.clone(),
            source,
        })?;

        let steps = commands
            .into_iter()
            .enumerate()
            .map(|(step_index, command)| {
                Step::new(
                    command,
                    log_paths::step_stdout_path(&task_dir, step_index),
                    log_paths::step_stderr_path(&task_dir, step_index),
                )
            })
            .collect();

        tasks.push(Task::new(id, name, info, steps));
    }

    Ok((header, tasks, log_root))
}

/// The dynamic header's command labels come from the *longest* row: the
/// first whitespace-delimited token of each command cell, with any
/// leading path stripped (basename only).
fn derive_header(rows: &[csv::StringRecord]) -> Header {
    let mut labels = vec!["TaskName".to_string(), "Info".to_string()];

    if let Some(longest) = rows.iter().max_by_key(|r| r.len()) {
        if longest.len() > 2 {
            for cmd in longest.iter().skip(2) {
                labels.push(command_label(cmd));
            }
        }
    }

    Header { labels }
}

fn command_label(cmd: &str) -> String {
    let first_token = cmd.trim().split_whitespace().next().unwrap_or("");
    first_token
        .rsplit('/')
        .next()
        .unwrap_or(first_token)
        .to_string()
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
