// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `--watch` status view: a plain-text table re-rendered in place.
//!
//! A thin consumer of the Controller Facade — it reads task/step fields
//! under the model's lock and never reaches into engine internals.

use oj_core::TaskModel;

use crate::color;
use crate::table::{Column, Table};

/// ANSI sequence: move cursor to top-left (home position).
/// Used instead of `\x1B[2J` (clear screen) to avoid pushing old content
/// into terminal scrollback.
const CURSOR_HOME: &str = "\x1B[H";

/// ANSI sequence: clear from cursor position to end of screen. Removes
/// leftover lines from a previous (longer) render.
const CLEAR_TO_END: &str = "\x1B[J";

/// ANSI sequence: clear from cursor position to end of line. Removes
/// leftover characters from a previous (wider) render on the same line.
const CLEAR_TO_EOL: &str = "\x1B[K";

/// Render one frame of the status table for `model`.
pub fn render(model: &TaskModel) -> String {
    let header = &model.header.labels;
    let step_count = header.len().saturating_sub(2);

    let mut columns = vec![Column::left("ID"), Column::left("NAME")];
    for label in header.iter().skip(2) {
        columns.push(Column::status(label));
    }

    let mut table = Table::new(columns);
    model.with_state(|state| {
        for task in &state.tasks {
            let mut row = vec![task.id.to_string(), task.name.clone()];
            for i in 0..step_count {
                row.push(
                    task.steps
                        .get(i)
                        .map(|s| s.status.to_string())
                        .unwrap_or_default(),
                );
            }
            table.row(row);
        }
    });

    let mut buf = Vec::new();
    table.render(&mut buf);
    let mut out = String::from_utf8_lossy(&buf).into_owned();
    if out.is_empty() {
        out.push_str(&color::muted("(no tasks)\n"));
    }
    out
}

/// Wrap a rendered frame for in-place terminal redraw.
///
/// When `is_tty` is true the frame is bracketed with ANSI cursor-home
/// before and clear-to-end after, and each line gets a clear-to-EOL so a
/// shorter line doesn't leave remnants of a previous, wider frame. When
/// false the content is returned as-is (suitable for piped output).
pub fn frame(content: &str, is_tty: bool) -> String {
    if is_tty {
        let cleared = content.replace('\n', &format!("{CLEAR_TO_EOL}\n"));
        format!("{CURSOR_HOME}{cleared}{CLEAR_TO_END}")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
