// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to open log file '{path}': {source}")]
    LogOpen {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to wait on subprocess: {0}")]
    Wait(#[source] std::io::Error),
}
