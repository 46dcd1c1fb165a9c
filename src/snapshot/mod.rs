//! Engine state views and execution history
//!
//! - [`Snapshot`]: borrowed, read-only view of a live interpreter, handed to
//!   the `#` debug hook
//! - [`history`]: step-by-step recording of a run with a memory budget
//! - [`replay`]: forward/backward navigation over a recorded history

pub mod history;
pub mod replay;

pub use history::{record, CellWrite, Frame, History, OutputEncoding, Termination};
pub use replay::Replay;

use crate::memory::{Dump, Memory};
use std::fmt;

/// Read-only view of an interpreter
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    pub script: &'a [char],
    pub instruction_pointer: usize,
    pub data_pointer: usize,
    pub loop_stack: &'a [usize],
    pub memory: &'a dyn Memory,
}

impl Snapshot<'_> {
    /// Character at the instruction pointer, if the script has not ended
    pub fn current_instruction(&self) -> Option<char> {
        self.script.get(self.instruction_pointer).copied()
    }

    /// Value of the cell under the data pointer
    pub fn current_cell(&self) -> i64 {
        self.memory.get(self.data_pointer).unwrap_or_default()
    }
}

impl fmt::Display for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "s*: {}; d*: {}; mem: {}; sloops: {:?}",
            self.instruction_pointer,
            self.data_pointer,
            Dump(self.memory),
            self.loop_stack
        )
    }
}

impl fmt::Debug for Snapshot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("instruction_pointer", &self.instruction_pointer)
            .field("data_pointer", &self.data_pointer)
            .field("loop_stack", &self.loop_stack)
            .field("extent", &self.memory.extent())
            .finish()
    }
}
