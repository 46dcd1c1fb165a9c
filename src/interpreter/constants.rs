// Constants for the interpreter

/// Default number of tape cells
pub const DEFAULT_MEMSIZE: usize = 30_000;

/// Default number of values a cell can hold (one byte)
pub const DEFAULT_CELLSIZE: u64 = 256;

/// Cells per row in tape dumps and the tape pane
pub const ROW_WIDTH: usize = 16;

/// All-zero row runs longer than this are collapsed in tape dumps
pub const NULL_ROW_COLLAPSE_THRESHOLD: usize = 3;

/// Default memory budget for a recorded history (256 MB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;

/// Largest buffer an unbounded contiguous tape may grow to (1 GiB of cells)
pub const MAX_CONTIGUOUS_GROWTH: usize = 1 << 30;
