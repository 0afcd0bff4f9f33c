//! Resolve a routine by name and run it against an input stream.
//!
//! This is the single boundary where decode failures and unknown names
//! become a [`HarnessError`]; the binary maps that to an exit status.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::exit_codes;
use crate::io::decode::{DecodeError, TokenReader};
use crate::io::encode::{Value, write_value};
use crate::registry;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("unknown routine '{0}'")]
    UnknownRoutine(String),
    #[error("malformed input for routine '{routine}'")]
    Decode {
        routine: &'static str,
        #[source]
        source: DecodeError,
    },
    #[error("failed to write result")]
    Write(#[source] io::Error),
}

impl HarnessError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::UnknownRoutine(_)
            | HarnessError::Decode { .. }
            | HarnessError::Write(_) => exit_codes::INVALID,
        }
    }
}

/// Resolve `name`, decode its arguments from `input` and compute the result.
#[instrument(skip(input))]
pub fn evaluate(name: &str, input: &mut dyn BufRead) -> Result<Value, HarnessError> {
    let routine =
        registry::lookup(name).ok_or_else(|| HarnessError::UnknownRoutine(name.to_owned()))?;
    debug!(summary = routine.summary, "routine resolved");

    let mut reader = TokenReader::new(input);
    let value = routine
        .invoke(&mut reader)
        .map_err(|source| HarnessError::Decode {
            routine: routine.name,
            source,
        })?;
    debug!(tokens = reader.consumed(), "routine finished");
    Ok(value)
}

/// Run the full pipeline: resolve, decode, compute, encode to `output`.
///
/// Nothing is written to `output` unless the routine produced a value.
pub fn dispatch(
    name: &str,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), HarnessError> {
    let value = evaluate(name, input)?;
    write_value(output, &value).map_err(HarnessError::Write)
}
