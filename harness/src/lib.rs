//! Single-shot routine dispatch harness.
//!
//! A caller names one routine on the command line and feeds its input on
//! stdin as whitespace-delimited integers; the harness prints the encoded
//! result on stdout. The pieces are kept apart:
//!
//! - **[`core`]**: Pure routine payloads. No I/O.
//! - **[`io`]**: Token decoding from the input stream and result encoding.
//! - **[`registry`]**: The fixed table binding names to routines.
//! - **[`dispatch`]**: Name resolution and the decode → compute → encode
//!   pipeline, with one typed error for every failure.

pub mod core;
pub mod dispatch;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod registry;
