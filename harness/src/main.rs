//! Routine dispatch harness.
//!
//! Runs exactly one named routine against stdin and prints the encoded
//! result to stdout without a trailing newline. Every failure exits with
//! status 1 and leaves stdout empty.
//!
//! The first argument is always the routine name and anything after it is
//! ignored. `--list` is the only reserved name. Help and version flags are
//! disabled so that `--help` is just another unknown routine.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

use harness::dispatch::{HarnessError, dispatch};
use harness::{exit_codes, logging, registry};

const LIST_ROUTINES: &str = "--list";

#[derive(Parser)]
#[command(
    name = "harness",
    about = "Run one named routine against integers on stdin",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Routine name (exact, case-sensitive) followed by ignored arguments.
    /// `--list` prints the registered routines instead.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

impl Cli {
    fn routine(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    fn ignored(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{}", err.render().to_string().trim_end());
            std::process::exit(exit_codes::INVALID);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        let code = err
            .downcast_ref::<HarnessError>()
            .map_or(exit_codes::INVALID, HarnessError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let Some(name) = cli.routine() else {
        bail!("missing routine name");
    };
    if !cli.ignored().is_empty() {
        debug!(ignored = ?cli.ignored(), "ignoring extra arguments");
    }
    if name == LIST_ROUTINES {
        return list_routines();
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    dispatch(name, &mut input, &mut output)?;
    Ok(())
}

fn list_routines() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for routine in registry::routines() {
        writeln!(stdout, "{}\t{}", routine.name, routine.summary).context("write routine list")?;
    }
    Ok(())
}
