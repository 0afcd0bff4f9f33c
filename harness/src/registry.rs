//! The closed set of routines the harness can run.
//!
//! Each [`Routine`] binds a name to an adapter that decodes the routine's
//! argument shape, calls the pure compute step, and wraps the result in a
//! [`Value`]. Adding a routine means adding one entry to [`ROUTINES`].

use crate::core::palindrome::is_palindrome;
use crate::core::pair_sum::{find_optimal_pair, two_sum};
use crate::io::decode::{Decode, DecodeError, PairSumArgs, ScalarArg, TokenReader};
use crate::io::encode::Value;

type Adapter = fn(&mut TokenReader<'_>) -> Result<Value, DecodeError>;

/// A named decode → compute → encode binding.
pub struct Routine {
    /// Exact, case-sensitive name used on the command line.
    pub name: &'static str,
    /// One-line description for `--list` output and logs.
    pub summary: &'static str,
    adapter: Adapter,
}

impl Routine {
    /// Decode this routine's arguments from `reader` and compute its result.
    pub fn invoke(&self, reader: &mut TokenReader<'_>) -> Result<Value, DecodeError> {
        (self.adapter)(reader)
    }
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish()
    }
}

static ROUTINES: &[Routine] = &[
    Routine {
        name: "twoSum",
        summary: "indices of two elements summing to the target, or []",
        adapter: run_two_sum,
    },
    Routine {
        name: "isPalindrome",
        summary: "whether an integer's digits read the same reversed",
        adapter: run_is_palindrome,
    },
    Routine {
        name: "findOptimalPair",
        summary: "two-pointer pair search on an ascending sequence, or [-1,-1]",
        adapter: run_find_optimal_pair,
    },
];

/// Every registered routine, in registration order.
pub fn routines() -> &'static [Routine] {
    ROUTINES
}

/// Look up a routine by exact name.
pub fn lookup(name: &str) -> Option<&'static Routine> {
    ROUTINES.iter().find(|routine| routine.name == name)
}

fn run_two_sum(reader: &mut TokenReader<'_>) -> Result<Value, DecodeError> {
    let args = PairSumArgs::decode(reader)?;
    let indices = match two_sum(&args.nums, args.target) {
        Some(pair) => index_pair(pair),
        None => Vec::new(),
    };
    Ok(indices.into())
}

fn run_is_palindrome(reader: &mut TokenReader<'_>) -> Result<Value, DecodeError> {
    let ScalarArg(x) = ScalarArg::decode(reader)?;
    Ok(is_palindrome(x).into())
}

fn run_find_optimal_pair(reader: &mut TokenReader<'_>) -> Result<Value, DecodeError> {
    let args = PairSumArgs::decode(reader)?;
    let indices = match find_optimal_pair(&args.nums, args.target) {
        Some(pair) => index_pair(pair),
        None => vec![-1, -1],
    };
    Ok(indices.into())
}

fn index_pair((first, second): (usize, usize)) -> Vec<i64> {
    // Slice indices are below isize::MAX, so the casts are lossless.
    vec![first as i64, second as i64]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn invoke(name: &str, input: &str) -> Result<Value, DecodeError> {
        let routine = lookup(name).expect("registered routine");
        let mut source = input.as_bytes();
        let mut reader = TokenReader::new(&mut source);
        routine.invoke(&mut reader)
    }

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = routines().iter().map(|routine| routine.name).collect();
        assert_eq!(names.len(), routines().len());
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        assert!(lookup("twoSum").is_some());
        assert!(lookup("twosum").is_none());
        assert!(lookup("TwoSum").is_none());
        assert!(lookup(" twoSum").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn two_sum_adapter_returns_indices_or_empty() {
        assert_eq!(
            invoke("twoSum", "4\n2 7 11 15\n9").expect("invoke"),
            Value::IntList(vec![0, 1])
        );
        assert_eq!(
            invoke("twoSum", "3\n1 2 3\n100").expect("invoke"),
            Value::IntList(Vec::new())
        );
    }

    #[test]
    fn palindrome_adapter_returns_bool() {
        assert_eq!(invoke("isPalindrome", "121").expect("invoke"), Value::Bool(true));
        assert_eq!(invoke("isPalindrome", "-121").expect("invoke"), Value::Bool(false));
    }

    #[test]
    fn find_optimal_pair_adapter_reports_miss_as_negative_pair() {
        assert_eq!(
            invoke("findOptimalPair", "4\n1 2 4 7\n9").expect("invoke"),
            Value::IntList(vec![1, 3])
        );
        assert_eq!(
            invoke("findOptimalPair", "3\n1 2 3\n100").expect("invoke"),
            Value::IntList(vec![-1, -1])
        );
    }

    #[test]
    fn adapters_surface_decode_errors() {
        let err = invoke("twoSum", "2\n1").expect_err("short input");
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
        let err = invoke("isPalindrome", "abc").expect_err("bad token");
        assert!(matches!(err, DecodeError::InvalidInteger { .. }));
    }
}
