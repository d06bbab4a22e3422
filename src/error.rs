//! Load-time errors and run-time faults.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to build a [`Grid`](crate::grid::Grid) from program text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program source is empty")]
    EmptySource,

    #[error("row {row} has {found} cells, expected {expected}")]
    JaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot read program {}: {source}", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A grid lookup outside the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("({x}, {y}) is outside the {width}x{height} grid")]
pub struct OutOfBounds {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

/// What went wrong in a faulted step or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("input exhausted")]
    InputExhausted,

    #[error("step budget exceeded")]
    StepBudgetExceeded,

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("value is not a valid character code")]
    InvalidCodePoint,
}

/// A recoverable run-time error together with where it happened.
///
/// The interpreter that produced it is left untouched by the faulting
/// instruction and can still be inspected or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    /// The instruction being executed, `None` for a blank cell or when the
    /// fault came from the run loop rather than an instruction.
    pub opcode: Option<char>,
    pub position: (i64, i64),
    pub stack_depth: usize,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.position;
        write!(f, "{} at ({x}, {y}) on ", self.kind)?;
        match self.opcode {
            Some(c) => write!(f, "'{c}'")?,
            None => write!(f, "blank cell")?,
        }
        write!(f, " with stack depth {}", self.stack_depth)
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_message_has_context() {
        let fault = Fault {
            kind: FaultKind::StackUnderflow,
            opcode: Some('+'),
            position: (3, 1),
            stack_depth: 1,
        };
        assert_eq!(
            fault.to_string(),
            "stack underflow at (3, 1) on '+' with stack depth 1"
        );
    }

    #[test]
    fn test_jagged_message() {
        let err = LoadError::JaggedRows {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(err.to_string(), "row 2 has 3 cells, expected 4");
    }
}
