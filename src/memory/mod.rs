//! Tape memory for the interpreter
//!
//! This module provides the cell storage the engine reads and writes:
//! - [`sparse`]: hash-map backed tape, only non-zero cells are stored
//! - [`contiguous`]: byte-buffer backed tape with O(1) access and run access
//! - [`dump`]: hex rendering of a tape for diagnostics
//!
//! # Cell Normalization
//!
//! Every write goes through [`MemoryConfig::normalize`]:
//! ```text
//! cellsize = ∞            →  value stored as-is
//! cellsize = n, Wrap      →  value mod n        (always in 0..n)
//! cellsize = n, Clamp     →  min(max(value, 0), n - 1)
//! ```
//!
//! Wrapping is Euclidean, so `-1` on a 256-cell becomes `255` rather than
//! a negative remainder.

pub mod contiguous;
pub mod dump;
pub mod sparse;

pub use contiguous::ContiguousMemory;
pub use dump::Dump;
pub use sparse::SparseMemory;

use crate::interpreter::constants::{DEFAULT_CELLSIZE, DEFAULT_MEMSIZE};
use std::fmt;

/// How a write that falls outside `0..cellsize` is brought back into range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Modular arithmetic
    #[default]
    Wrap,
    /// Saturate at `0` and `cellsize - 1`
    Clamp,
}

/// Shape of a tape: how many cells, how wide each one is, and what happens on overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Number of addressable cells (`None` = unbounded)
    pub memsize: Option<usize>,
    /// Number of distinct values a cell can hold (`None` = unbounded)
    pub cellsize: Option<u64>,
    pub overflow: Overflow,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            memsize: Some(DEFAULT_MEMSIZE),
            cellsize: Some(DEFAULT_CELLSIZE),
            overflow: Overflow::Wrap,
        }
    }
}

impl MemoryConfig {
    pub fn with_memsize(mut self, memsize: Option<usize>) -> Self {
        self.memsize = memsize;
        self
    }

    pub fn with_cellsize(mut self, cellsize: Option<u64>) -> Self {
        self.cellsize = cellsize;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Reject shapes no tape can represent (zero cells, zero-width cells)
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.memsize == Some(0) {
            return Err(MemoryError::EmptyTape);
        }
        if self.cellsize == Some(0) {
            return Err(MemoryError::UnsupportedCellSize {
                cellsize: self.cellsize,
            });
        }
        Ok(())
    }

    /// Bring a raw value into the range this configuration allows
    pub fn normalize(&self, value: i64) -> i64 {
        let Some(cellsize) = self.cellsize else {
            return value;
        };
        // A cellsize beyond i64::MAX cannot be reached by any i64 value
        let Ok(cellsize) = i64::try_from(cellsize) else {
            return value.max(0);
        };

        match self.overflow {
            Overflow::Wrap => value.rem_euclid(cellsize),
            Overflow::Clamp => value.clamp(0, cellsize - 1),
        }
    }

    /// Check `index` against the memsize bound
    pub fn check_index(&self, index: usize) -> Result<(), MemoryError> {
        match self.memsize {
            Some(memsize) if index >= memsize => Err(MemoryError::OutOfRange {
                index,
                memsize: Some(memsize),
            }),
            _ => Ok(()),
        }
    }

    /// Highest index the data pointer may reach
    pub fn last_index(&self) -> usize {
        self.memsize.map_or(usize::MAX, |memsize| memsize.saturating_sub(1))
    }
}

/// Errors raised by the memory layer
///
/// These are converted to [`RuntimeError`](crate::interpreter::errors::RuntimeError)
/// at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Index outside `0..memsize`
    OutOfRange { index: usize, memsize: Option<usize> },

    /// The backing store cannot hold cells of this width
    UnsupportedCellSize { cellsize: Option<u64> },

    /// A tape with no cells
    EmptyTape,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfRange { index, memsize } => match memsize {
                Some(memsize) => write!(
                    f,
                    "Memory index {} out of range for tape of {} cells",
                    index, memsize
                ),
                None => write!(f, "Memory index {} out of range", index),
            },
            MemoryError::UnsupportedCellSize { cellsize } => match cellsize {
                Some(size) => write!(f, "Unsupported cell size {}", size),
                None => write!(f, "Unbounded cells are not supported by this tape"),
            },
            MemoryError::EmptyTape => write!(f, "Tape must have at least one cell"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Indexed cell storage driven by the interpreter
///
/// Implementations must apply [`MemoryConfig::normalize`] on every write and
/// [`MemoryConfig::check_index`] on every access.
pub trait Memory {
    /// The shape this tape was built with
    fn config(&self) -> &MemoryConfig;

    /// Read a cell (never-written cells read as 0)
    fn get(&self, index: usize) -> Result<i64, MemoryError>;

    /// Write a cell, normalizing the value first
    fn set(&mut self, index: usize, value: i64) -> Result<(), MemoryError>;

    /// Return a cell to its default value
    fn reset(&mut self, index: usize) -> Result<(), MemoryError>;

    /// One past the highest index holding a non-zero value
    ///
    /// Saturates at `usize::MAX` when the last index itself is non-zero.
    fn extent(&self) -> usize;

    /// Every non-zero cell as `(index, value)`, in ascending index order
    fn nonzero_cells(&self) -> Vec<(usize, i64)>;

    fn memsize(&self) -> Option<usize> {
        self.config().memsize
    }

    fn cellsize(&self) -> Option<u64> {
        self.config().cellsize
    }

    fn overflow(&self) -> Overflow {
        self.config().overflow
    }
}

impl<M: Memory + ?Sized> Memory for Box<M> {
    fn config(&self) -> &MemoryConfig {
        (**self).config()
    }

    fn get(&self, index: usize) -> Result<i64, MemoryError> {
        (**self).get(index)
    }

    fn set(&mut self, index: usize, value: i64) -> Result<(), MemoryError> {
        (**self).set(index, value)
    }

    fn reset(&mut self, index: usize) -> Result<(), MemoryError> {
        (**self).reset(index)
    }

    fn extent(&self) -> usize {
        (**self).extent()
    }

    fn nonzero_cells(&self) -> Vec<(usize, i64)> {
        (**self).nonzero_cells()
    }
}
