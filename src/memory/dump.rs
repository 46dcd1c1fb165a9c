//! Hex dump of a tape
//!
//! Renders any [`Memory`] as rows of 16 zero-padded hex cells:
//!
//! ```text
//! Memory[30000]{
//!   48 65 6c 6c 6f 00 00 00 00 00 00 00 00 00 00 00
//!               ... 12 null rows ...
//!   01 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
//! }
//! ```
//!
//! Only the cells up to the last non-zero one are shown. Runs of more than
//! [`NULL_ROW_COLLAPSE_THRESHOLD`] all-zero rows collapse into a single line.
//! Rendering walks the non-zero cells only, so its cost does not depend on
//! how far out the highest one sits.
//! The output is meant for humans; nothing parses it back.

use super::Memory;
use crate::interpreter::constants::{NULL_ROW_COLLAPSE_THRESHOLD, ROW_WIDTH};
use std::fmt;

/// Narrowest and widest hex cell for tapes with unbounded cells
const UNBOUNDED_WIDTH: (usize, usize) = (2, 8);

/// Display adapter rendering a tape dump
pub struct Dump<'a>(pub &'a dyn Memory);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let memory = self.0;

        match memory.memsize() {
            Some(memsize) => write!(f, "Memory[{}]", memsize)?,
            None => write!(f, "Memory[unbounded]")?,
        }

        let cells = memory.nonzero_cells();
        if cells.is_empty() {
            return Ok(());
        }
        let values: Vec<i64> = cells.iter().map(|&(_, value)| value).collect();
        let width = cell_width(memory.cellsize(), &values);

        writeln!(f, "{{")?;
        let mut next_row = 0;
        for group in cells.chunk_by(|a, b| a.0 / ROW_WIDTH == b.0 / ROW_WIDTH) {
            let row = group[0].0 / ROW_WIDTH;
            let null_rows = row - next_row;
            if null_rows > NULL_ROW_COLLAPSE_THRESHOLD {
                writeln!(f, "  {:13}... {} null rows ...", "", null_rows)?;
            } else {
                for _ in 0..null_rows {
                    write_row(f, &[0; ROW_WIDTH], width)?;
                }
            }
            next_row = row + 1;

            // The last row stops at the end of a bounded tape
            let start = row * ROW_WIDTH;
            let len = memory
                .memsize()
                .map_or(ROW_WIDTH, |memsize| (memsize - start).min(ROW_WIDTH));
            let mut values = [0; ROW_WIDTH];
            for &(index, value) in group {
                values[index - start] = value;
            }
            write_row(f, &values[..len], width)?;
        }
        write!(f, "}}")
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[i64], width: usize) -> fmt::Result {
    write!(f, " ")?;
    for &value in row {
        write!(f, " {}", format_cell(value, width))?;
    }
    writeln!(f)
}

/// Number of hex digits needed to show every cell of a tape
///
/// Bounded cells use the width of `cellsize - 1`; unbounded cells use the
/// widest value present, kept between 2 and 8 digits.
pub fn cell_width(cellsize: Option<u64>, values: &[i64]) -> usize {
    match cellsize {
        Some(size) => hex_digits(size.saturating_sub(1)),
        None => {
            let widest = values
                .iter()
                .map(|value| value.unsigned_abs())
                .max()
                .unwrap_or(0);
            hex_digits(widest).clamp(UNBOUNDED_WIDTH.0, UNBOUNDED_WIDTH.1)
        }
    }
}

/// Zero-padded lowercase hex, with a leading `-` for negative values
pub fn format_cell(value: i64, width: usize) -> String {
    if value < 0 {
        format!("-{:0width$x}", value.unsigned_abs(), width = width)
    } else {
        format!("{:0width$x}", value, width = width)
    }
}

fn hex_digits(value: u64) -> usize {
    format!("{:x}", value).len()
}
