//! Stream-facing halves of a routine invocation: token decoding from stdin
//! and result encoding to stdout.

pub mod decode;
pub mod encode;
