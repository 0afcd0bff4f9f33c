//! Canonical text encoding of routine results.

use std::fmt;
use std::io::{self, Write};

/// A routine's result, prior to serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Encoded as `[a,b,c]` with no spaces; empty is `[]`.
    IntList(Vec<i64>),
    /// Encoded as `true` or `false`.
    Bool(bool),
}

impl From<Vec<i64>> for Value {
    fn from(values: Vec<i64>) -> Self {
        Value::IntList(values)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::IntList(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Value::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Write the encoded value in one shot and flush. No trailing newline.
pub fn write_value(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    out.write_all(value.to_string().as_bytes())?;
    out.flush()
}
