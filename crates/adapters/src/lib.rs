// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oj-adapters: the process supervisor — launch, wait, and group-kill a
//! shell subprocess.

mod error;
mod supervisor;

pub use error::SupervisorError;
pub use supervisor::{kill_group, kill_group_blocking, launch, Handle};
