// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! oj - a small interactive task runner driven by a CSV table.

mod color;
mod table;
mod view;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use oj_core::TaskModel;
use oj_engine::{Controller, Scheduler};
use oj_storage::StateStore;

/// How often the `--watch` view redraws.
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// How often the non-watch main loop polls for overall completion.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "oj", version, about = "Run a table of shell commands with bounded concurrency")]
struct Cli {
    /// Path to the task table (CSV)
    #[arg(default_value = "tasks.csv")]
    csv_path: PathBuf,

    /// Maximum number of steps running at once
    #[arg(short = 'w', long = "max-workers")]
    max_workers: Option<usize>,

    /// Redraw a live status table until interrupted
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() {
    init_logging();

    let code = match run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            if err.downcast_ref::<oj_core::LoadError>().is_some() {
                1
            } else {
                2
            }
        }
    };
    std::process::exit(code);
}

fn init_logging() {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let max_workers = cli.max_workers.unwrap_or_else(default_max_workers);

    let model = Arc::new(TaskModel::load(&cli.csv_path)?);
    StateStore::resume(&model);

    let scheduler = Arc::new(Scheduler::new(max_workers));
    let controller = Controller::new(model.clone(), scheduler);

    controller.start_initial();

    if cli.watch {
        watch_until_interrupted(&controller).await;
    } else {
        run_until_finished_or_interrupted(&controller).await;
    }

    controller.shutdown();
    Ok(())
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Block until every task has reached a terminal state for all its steps,
/// or until SIGINT arrives first.
async fn run_until_finished_or_interrupted(controller: &Controller) {
    loop {
        if all_tasks_finished(controller) {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => return,
        }
    }
}

/// Redraw the status table on a fixed interval until SIGINT arrives.
async fn watch_until_interrupted(controller: &Controller) {
    use std::io::{IsTerminal, Write};

    let is_tty = std::io::stdout().is_terminal();
    loop {
        let content = view::render(controller.model());
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{}", view::frame(&content, is_tty));
        let _ = stdout.flush();

        tokio::select! {
            _ = tokio::time::sleep(REDRAW_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => return,
        }
    }
}

fn all_tasks_finished(controller: &Controller) -> bool {
    controller
        .model()
        .with_state(|state| state.tasks.iter().all(|t| t.is_finished()))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
