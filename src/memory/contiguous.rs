//! Contiguous tape implementation
//!
//! Cells are single bytes in a `Vec<u8>`, so the tape only supports bounded
//! cell sizes up to 256. A bounded memsize preallocates the whole buffer; an
//! unbounded one grows the buffer on the first non-zero write past its end
//! and reads anything beyond it as 0. Growth stops at
//! [`MAX_CONTIGUOUS_GROWTH`] cells: a non-zero write past that fails with
//! [`MemoryError::OutOfRange`].
//!
//! Besides single-cell access, the tape supports reading and writing runs of
//! adjacent cells ([`ContiguousMemory::read_run`], [`ContiguousMemory::write_run`]).

use super::{dump::Dump, Memory, MemoryConfig, MemoryError};
use crate::interpreter::constants::MAX_CONTIGUOUS_GROWTH;
use std::borrow::Cow;
use std::fmt;

/// Largest cell size a byte slot can hold
const MAX_BYTE_CELLSIZE: u64 = 256;

/// Byte-buffer backed tape
#[derive(Debug, Clone)]
pub struct ContiguousMemory {
    config: MemoryConfig,
    cells: Vec<u8>,
}

impl ContiguousMemory {
    /// Create a zeroed tape with the given shape
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        match config.cellsize {
            Some(size) if size <= MAX_BYTE_CELLSIZE => {}
            cellsize => return Err(MemoryError::UnsupportedCellSize { cellsize }),
        }

        let cells = match config.memsize {
            Some(memsize) => vec![0; memsize],
            None => Vec::new(),
        };

        Ok(ContiguousMemory { config, cells })
    }

    /// Validate that every index of `start..start + len` is addressable
    fn check_run(&self, start: usize, len: usize) -> Result<(), MemoryError> {
        let end = start.checked_add(len).ok_or(MemoryError::OutOfRange {
            index: usize::MAX,
            memsize: self.config.memsize,
        })?;

        match self.config.memsize {
            Some(memsize) if end > memsize => Err(MemoryError::OutOfRange {
                index: memsize.max(start),
                memsize: Some(memsize),
            }),
            None if end > MAX_CONTIGUOUS_GROWTH => Err(MemoryError::OutOfRange {
                index: MAX_CONTIGUOUS_GROWTH.max(start),
                memsize: None,
            }),
            _ => Ok(()),
        }
    }

    /// Read `len` adjacent cells starting at `start`
    ///
    /// Borrows straight from the buffer when the run is fully allocated.
    pub fn read_run(&self, start: usize, len: usize) -> Result<Cow<'_, [u8]>, MemoryError> {
        self.check_run(start, len)?;

        let end = start + len;
        if end <= self.cells.len() {
            return Ok(Cow::Borrowed(&self.cells[start..end]));
        }

        let mut run = vec![0; len];
        if start < self.cells.len() {
            let available = &self.cells[start..];
            run[..available.len()].copy_from_slice(available);
        }
        Ok(Cow::Owned(run))
    }

    /// Write adjacent cells starting at `start`, normalizing each value
    ///
    /// Fails without touching the tape if any index of the run is out of range.
    pub fn write_run(&mut self, start: usize, values: &[i64]) -> Result<(), MemoryError> {
        self.check_run(start, values.len())?;

        for (offset, &value) in values.iter().enumerate() {
            self.store(start + offset, value)?;
        }
        Ok(())
    }

    /// The allocated part of the buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    fn store(&mut self, index: usize, value: i64) -> Result<(), MemoryError> {
        // Normalized values lie in 0..cellsize, and cellsize <= 256
        let byte = self.config.normalize(value) as u8;

        if index >= self.cells.len() {
            if byte == 0 {
                return Ok(());
            }
            if index >= MAX_CONTIGUOUS_GROWTH {
                return Err(MemoryError::OutOfRange {
                    index,
                    memsize: self.config.memsize,
                });
            }
            self.cells.resize(index + 1, 0);
        }
        self.cells[index] = byte;
        Ok(())
    }
}

impl Default for ContiguousMemory {
    fn default() -> Self {
        let config = MemoryConfig::default();
        let memsize = config.memsize.unwrap_or_default();
        ContiguousMemory {
            config,
            cells: vec![0; memsize],
        }
    }
}

impl Memory for ContiguousMemory {
    fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn get(&self, index: usize) -> Result<i64, MemoryError> {
        self.config.check_index(index)?;
        Ok(self.cells.get(index).copied().map_or(0, i64::from))
    }

    fn set(&mut self, index: usize, value: i64) -> Result<(), MemoryError> {
        self.config.check_index(index)?;
        self.store(index, value)
    }

    fn reset(&mut self, index: usize) -> Result<(), MemoryError> {
        self.set(index, 0)
    }

    fn extent(&self) -> usize {
        self.cells
            .iter()
            .rposition(|&byte| byte != 0)
            .map_or(0, |index| index + 1)
    }

    fn nonzero_cells(&self) -> Vec<(usize, i64)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &byte)| byte != 0)
            .map(|(index, &byte)| (index, i64::from(byte)))
            .collect()
    }
}

impl fmt::Display for ContiguousMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Dump(self).fmt(f)
    }
}
