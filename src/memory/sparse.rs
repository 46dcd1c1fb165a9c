//! Sparse tape implementation
//!
//! Cells live in an [`FxHashMap`] keyed by index. Only non-zero cells are
//! stored: writing a normalized zero or resetting a cell removes its entry,
//! so a mostly-empty tape of any size costs memory proportional to the cells
//! actually in use. This is the tape to pick for unbounded or very large
//! memsizes.

use super::{dump::Dump, Memory, MemoryConfig, MemoryError};
use rustc_hash::FxHashMap;
use std::fmt;

/// Hash-map backed tape
#[derive(Debug, Clone)]
pub struct SparseMemory {
    config: MemoryConfig,
    cells: FxHashMap<usize, i64>,
}

impl SparseMemory {
    /// Create an empty tape with the given shape
    pub fn new(config: MemoryConfig) -> Result<Self, MemoryError> {
        config.validate()?;
        Ok(SparseMemory {
            config,
            cells: FxHashMap::default(),
        })
    }

    /// Number of cells currently holding a non-zero value
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over the non-zero cells in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.cells.iter().map(|(&index, &value)| (index, value))
    }
}

impl Default for SparseMemory {
    fn default() -> Self {
        SparseMemory {
            config: MemoryConfig::default(),
            cells: FxHashMap::default(),
        }
    }
}

impl Memory for SparseMemory {
    fn config(&self) -> &MemoryConfig {
        &self.config
    }

    fn get(&self, index: usize) -> Result<i64, MemoryError> {
        self.config.check_index(index)?;
        Ok(self.cells.get(&index).copied().unwrap_or(0))
    }

    fn set(&mut self, index: usize, value: i64) -> Result<(), MemoryError> {
        self.config.check_index(index)?;
        let value = self.config.normalize(value);
        if value == 0 {
            self.cells.remove(&index);
        } else {
            self.cells.insert(index, value);
        }
        Ok(())
    }

    fn reset(&mut self, index: usize) -> Result<(), MemoryError> {
        self.config.check_index(index)?;
        self.cells.remove(&index);
        Ok(())
    }

    fn extent(&self) -> usize {
        self.cells
            .keys()
            .max()
            .map_or(0, |&index| index.saturating_add(1))
    }

    fn nonzero_cells(&self) -> Vec<(usize, i64)> {
        let mut cells: Vec<_> = self.iter().collect();
        cells.sort_unstable_by_key(|&(index, _)| index);
        cells
    }
}

impl fmt::Display for SparseMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Dump(self).fmt(f)
    }
}
