// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The one error surfaced to the caller: everything else is reflected in
//! step statuses and debug logs.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input table '{0}' was not found")]
    NotFound(PathBuf),

    #[error("failed to read input table '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input table '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} has an empty task name after trimming")]
    EmptyTaskName { row: u64 },

    #[error("failed to create log directory '{path}': {source}")]
    LogDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
