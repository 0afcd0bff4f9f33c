//! Grading pipeline for the routine harness.
//!
//! Loads problem case files from `eval/cases/`, runs each test through the
//! harness binary, and records pass/fail reports under `eval/results/`.

mod binary;
mod case;
mod cli;
mod config;
mod judge;
mod report;
mod results;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::run::RunOptions;

#[derive(Parser)]
#[command(name = "eval", version, about = "Grade harness routines against case files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the id and routine of every case.
    List,
    /// Run every test of a case and write a report.
    Run {
        case_id: String,
        /// Use this harness binary instead of building the workspace one.
        #[arg(long)]
        harness_bin: Option<PathBuf>,
        /// Per-test timeout, overriding the case file.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Aggregate all persisted reports for a case.
    Report { case_id: String },
    /// Delete persisted reports for a case.
    Clean { case_id: String },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;
    match cli.command {
        Command::List => cli::list_cases(&repo_root),
        Command::Run {
            case_id,
            harness_bin,
            timeout_secs,
        } => {
            let options = RunOptions {
                harness_bin,
                timeout_secs,
            };
            cli::run_case_by_id(&repo_root, &case_id, &options)
        }
        Command::Report { case_id } => cli::report_case(&repo_root, &case_id),
        Command::Clean { case_id } => cli::clean_case(&repo_root, &case_id),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
