//! Routine payloads.
//!
//! Core modules must be free of I/O side effects. Each routine is a total
//! function over its decoded arguments; the harness only cares about the
//! argument shape and the result type.

pub mod pair_sum;
pub mod palindrome;
