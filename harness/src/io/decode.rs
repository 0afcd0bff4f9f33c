//! Token-level decoding of routine arguments.
//!
//! Input is a single stream of whitespace-delimited integers. A
//! [`TokenReader`] hands tokens out strictly in order; once a token is
//! consumed it is gone, and nothing past the last token a shape needs is
//! ever read.

use std::collections::VecDeque;
use std::io::{self, BufRead};

use thiserror::Error;

/// Why the input stream could not be turned into routine arguments.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("input ended before {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("expected an integer, found '{token}'")]
    InvalidInteger { token: String },
    #[error("expected a non-negative element count, found '{token}'")]
    InvalidCount { token: String },
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),
}

/// Sequential cursor over whitespace-delimited tokens.
///
/// The reader holds the only borrow of its source for as long as it lives,
/// so decode order is whatever order the `next_*` calls are made in.
pub struct TokenReader<'a> {
    source: &'a mut dyn BufRead,
    pending: VecDeque<String>,
    consumed: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(source: &'a mut dyn BufRead) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            consumed: 0,
        }
    }

    /// Number of tokens handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Next token parsed as a signed integer.
    ///
    /// `expected` names the value being read and only shows up in the
    /// end-of-input error.
    pub fn next_i64(&mut self, expected: &'static str) -> Result<i64, DecodeError> {
        let token = self.next_token(expected)?;
        token
            .parse()
            .map_err(|_| DecodeError::InvalidInteger { token })
    }

    /// Next token parsed as an element count.
    pub fn next_count(&mut self, expected: &'static str) -> Result<usize, DecodeError> {
        let token = self.next_token(expected)?;
        token.parse().map_err(|_| DecodeError::InvalidCount { token })
    }

    fn next_token(&mut self, expected: &'static str) -> Result<String, DecodeError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                self.consumed += 1;
                return Ok(token);
            }
            let mut line = String::new();
            if self.source.read_line(&mut line)? == 0 {
                return Err(DecodeError::UnexpectedEof { expected });
            }
            self.pending
                .extend(line.split_ascii_whitespace().map(str::to_owned));
        }
    }
}

/// An argument shape a routine can declare.
pub trait Decode: Sized {
    fn decode(reader: &mut TokenReader<'_>) -> Result<Self, DecodeError>;
}

/// Sequence-plus-scalar shape: `n`, then `n` integers, then one integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSumArgs {
    pub nums: Vec<i64>,
    pub target: i64,
}

impl Decode for PairSumArgs {
    fn decode(reader: &mut TokenReader<'_>) -> Result<Self, DecodeError> {
        let len = reader.next_count("element count")?;
        // The count is untrusted; let the vector grow as elements arrive.
        let mut nums = Vec::new();
        for _ in 0..len {
            nums.push(reader.next_i64("sequence element")?);
        }
        let target = reader.next_i64("target")?;
        Ok(Self { nums, target })
    }
}

/// Scalar shape: a single integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarArg(pub i64);

impl Decode for ScalarArg {
    fn decode(reader: &mut TokenReader<'_>) -> Result<Self, DecodeError> {
        reader.next_i64("integer").map(ScalarArg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str<T: Decode>(input: &str) -> Result<T, DecodeError> {
        let mut source = input.as_bytes();
        let mut reader = TokenReader::new(&mut source);
        T::decode(&mut reader)
    }

    #[test]
    fn pair_sum_args_span_lines() {
        let args: PairSumArgs = decode_str("4\n2 7 11 15\n9").expect("decode");
        assert_eq!(
            args,
            PairSumArgs {
                nums: vec![2, 7, 11, 15],
                target: 9,
            }
        );
    }

    #[test]
    fn pair_sum_args_accept_any_whitespace() {
        let args: PairSumArgs = decode_str("  2\t-3\r\n\n 4   -1 ").expect("decode");
        assert_eq!(args.nums, vec![-3, 4]);
        assert_eq!(args.target, -1);
    }

    #[test]
    fn pair_sum_args_with_zero_elements() {
        let args: PairSumArgs = decode_str("0 5").expect("decode");
        assert!(args.nums.is_empty());
        assert_eq!(args.target, 5);
    }

    #[test]
    fn missing_target_is_unexpected_eof() {
        let err = decode_str::<PairSumArgs>("2\n1").expect_err("short input");
        assert!(matches!(
            err,
            DecodeError::UnexpectedEof {
                expected: "sequence element"
            }
        ));

        let err = decode_str::<PairSumArgs>("2\n1 2").expect_err("short input");
        assert!(matches!(
            err,
            DecodeError::UnexpectedEof { expected: "target" }
        ));
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = decode_str::<PairSumArgs>("-1 5").expect_err("negative count");
        assert!(matches!(&err, DecodeError::InvalidCount { token } if token == "-1"));
    }

    #[test]
    fn non_integer_token_is_rejected() {
        let err = decode_str::<ScalarArg>("12a").expect_err("bad token");
        assert!(matches!(&err, DecodeError::InvalidInteger { token } if token == "12a"));
        assert!(err.to_string().contains("12a"));
    }

    #[test]
    fn scalar_on_empty_input_is_unexpected_eof() {
        let err = decode_str::<ScalarArg>("").expect_err("empty");
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
        let err = decode_str::<ScalarArg>(" \n\n ").expect_err("blank");
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
    }

    #[test]
    fn reader_stops_at_last_needed_token() {
        let mut source = "121 7 8\n".as_bytes();
        let mut reader = TokenReader::new(&mut source);
        assert_eq!(ScalarArg::decode(&mut reader).expect("decode"), ScalarArg(121));
        assert_eq!(reader.consumed(), 1);
        assert_eq!(reader.next_i64("next").expect("next"), 7);
        assert_eq!(reader.consumed(), 2);
    }

    #[test]
    fn integer_overflow_is_invalid() {
        let err = decode_str::<ScalarArg>("9223372036854775808").expect_err("overflow");
        assert!(matches!(err, DecodeError::InvalidInteger { .. }));
    }
}
