// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// State-store errors are never fatal to the caller (§7): every variant
/// here is logged and the engine continues, either with a fresh model or
/// with the previous on-disk state left untouched.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse state document '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
