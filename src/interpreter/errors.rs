//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents every failure the
//! engine can hit while executing a script. There is no static validation
//! pass: bracket errors are only discovered when the offending instruction
//! is reached (`]`) or when the script ends (`[`).
//!
//! All runtime errors are fatal for the current `step()`/`run()` call. The
//! engine is left on the failing instruction and any output already written
//! stays in the output channel.

use crate::memory::MemoryError;
use std::fmt;
use std::io;

/// Runtime errors that can occur during execution
///
/// Positions are character indices into the script.
#[derive(Debug)]
pub enum RuntimeError {
    /// `]` executed with no open loop
    UnmatchedCloseBracket { position: usize },

    /// `[` positions still open when the script ended, oldest first
    UnmatchedOpenBracket { positions: Vec<usize> },

    /// `,` hit an exhausted input channel under [`EofPolicy::Fail`](super::engine::EofPolicy::Fail)
    EndOfInput { position: usize },

    /// Cell access outside the tape
    OutOfRange {
        index: usize,
        memsize: Option<usize>,
        position: usize,
    },

    /// `.` on a value the output channel cannot represent
    InvalidSymbol { value: i64, position: usize },

    /// Any other failure reported by the memory layer
    Memory { source: MemoryError, position: usize },

    /// The backing store of a channel failed
    Io { source: io::Error, position: usize },
}

impl RuntimeError {
    /// Lift a memory error raised while executing the instruction at `position`
    pub fn from_memory(error: MemoryError, position: usize) -> Self {
        match error {
            MemoryError::OutOfRange { index, memsize } => RuntimeError::OutOfRange {
                index,
                memsize,
                position,
            },
            source => RuntimeError::Memory { source, position },
        }
    }

    /// Script position the error points at
    ///
    /// For unclosed loops this is the innermost one.
    pub fn position(&self) -> Option<usize> {
        match self {
            RuntimeError::UnmatchedCloseBracket { position } => Some(*position),
            RuntimeError::UnmatchedOpenBracket { positions } => positions.last().copied(),
            RuntimeError::EndOfInput { position } => Some(*position),
            RuntimeError::OutOfRange { position, .. } => Some(*position),
            RuntimeError::InvalidSymbol { position, .. } => Some(*position),
            RuntimeError::Memory { position, .. } => Some(*position),
            RuntimeError::Io { position, .. } => Some(*position),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UnmatchedCloseBracket { position } => {
                write!(f, "Unmatched ']' at position {}", position)
            }
            RuntimeError::UnmatchedOpenBracket { positions } => {
                let list = positions
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Unmatched '[' at position{} {}",
                    if positions.len() == 1 { "" } else { "s" },
                    list
                )
            }
            RuntimeError::EndOfInput { position } => {
                write!(f, "End of input at position {}", position)
            }
            RuntimeError::OutOfRange {
                index,
                memsize,
                position,
            } => match memsize {
                Some(memsize) => write!(
                    f,
                    "Memory index {} out of range for tape of {} cells at position {}",
                    index, memsize, position
                ),
                None => write!(
                    f,
                    "Memory index {} out of range at position {}",
                    index, position
                ),
            },
            RuntimeError::InvalidSymbol { value, position } => {
                write!(
                    f,
                    "Cell value {} cannot be written to the output channel at position {}",
                    value, position
                )
            }
            RuntimeError::Memory { source, position } => {
                write!(f, "{} at position {}", source, position)
            }
            RuntimeError::Io { source, position } => {
                write!(f, "I/O error at position {}: {}", position, source)
            }
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Memory { source, .. } => Some(source),
            RuntimeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
