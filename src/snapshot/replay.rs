// Forward/backward navigation over a recorded history

use crate::snapshot::history::{Frame, History};
use rustc_hash::FxHashMap;

/// Cursor over a [`History`] that rebuilds the tape at any step
///
/// Position `0` is the state before the first recorded step and
/// `history.len()` the state after the last one. Moving applies or reverts
/// one frame's cell write, so every move is O(1) apart from the loop stack.
#[derive(Debug)]
pub struct Replay<'a> {
    history: &'a History,
    position: usize,
    cells: FxHashMap<usize, i64>,
}

impl<'a> Replay<'a> {
    pub fn new(history: &'a History) -> Self {
        Replay {
            history,
            position: 0,
            cells: history.initial_cells().clone(),
        }
    }

    pub fn history(&self) -> &'a History {
        self.history
    }

    /// Current step, in `0..=total()`
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.history.len()
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.total()
    }

    /// Apply the next frame; returns `false` at the end
    pub fn step_forward(&mut self) -> bool {
        let Some(frame) = self.history.get(self.position) else {
            return false;
        };
        if let Some(write) = frame.write {
            self.store(write.index, write.after);
        }
        self.position += 1;
        true
    }

    /// Revert the previous frame; returns `false` at the start
    pub fn step_backward(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        if let Some(write) = self.history.get(self.position).and_then(|f| f.write) {
            self.store(write.index, write.before);
        }
        true
    }

    pub fn rewind_to_start(&mut self) {
        while self.step_backward() {}
    }

    pub fn jump_to_end(&mut self) {
        while self.step_forward() {}
    }

    /// Move to `position`, clamped to the recorded range
    pub fn seek(&mut self, position: usize) {
        let target = position.min(self.total());
        while self.position < target {
            self.step_forward();
        }
        while self.position > target {
            self.step_backward();
        }
    }

    /// Frame that produced the current state, if any
    pub fn last_frame(&self) -> Option<&'a Frame> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.history.get(index))
    }

    pub fn instruction_pointer(&self) -> usize {
        self.last_frame()
            .map_or(self.history.initial_position(), |f| f.next_position)
    }

    pub fn data_pointer(&self) -> usize {
        self.last_frame()
            .map_or(self.history.initial_data_pointer(), |f| f.next_data_pointer)
    }

    pub fn loop_stack(&self) -> &'a [usize] {
        match self.last_frame() {
            Some(frame) => &frame.loop_stack,
            None => self.history.initial_loop_stack(),
        }
    }

    /// Value of a cell at the current step
    pub fn cell(&self, index: usize) -> i64 {
        self.cells.get(&index).copied().unwrap_or(0)
    }

    /// One past the highest non-zero cell at the current step
    pub fn extent(&self) -> usize {
        self.cells
            .keys()
            .max()
            .map_or(0, |&index| index.saturating_add(1))
    }

    /// Number of output symbols written so far
    pub fn output_len(&self) -> usize {
        self.last_frame().map_or(0, |f| f.output_len)
    }

    /// Output written so far, as text
    pub fn output_text(&self) -> String {
        self.history.output_text(self.output_len())
    }

    fn store(&mut self, index: usize, value: i64) {
        if value == 0 {
            self.cells.remove(&index);
        } else {
            self.cells.insert(index, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ByteChannel;
    use crate::interpreter::constants::DEFAULT_HISTORY_LIMIT;
    use crate::memory::{Memory, MemoryConfig, SparseMemory};
    use crate::interpreter::engine::Interpreter;
    use crate::snapshot::history::{record, OutputEncoding};

    fn history_of(script: &str) -> History {
        let mut interpreter = Interpreter::new(script);
        record(&mut interpreter, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes)
    }

    #[test]
    fn test_forward_and_back_restore_tape() {
        let history = history_of("+++>++<-");
        let mut replay = Replay::new(&history);

        replay.jump_to_end();
        assert!(replay.is_at_end());
        assert_eq!(replay.cell(0), 2);
        assert_eq!(replay.cell(1), 2);
        assert_eq!(replay.data_pointer(), 0);

        replay.seek(4);
        assert_eq!(replay.cell(0), 3);
        assert_eq!(replay.cell(1), 0);
        assert_eq!(replay.data_pointer(), 1);
        assert_eq!(replay.instruction_pointer(), 4);

        replay.rewind_to_start();
        assert!(replay.is_at_start());
        assert_eq!(replay.extent(), 0);
        assert!(!replay.step_backward());
    }

    #[test]
    fn test_extent_with_last_index_set() {
        let config = MemoryConfig::default().with_memsize(None);
        let mut memory = SparseMemory::new(config).unwrap();
        memory.set(usize::MAX, 1).unwrap();
        let mut interpreter =
            Interpreter::with_parts("+", memory, ByteChannel::new(), ByteChannel::new());
        let history = record(&mut interpreter, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes);

        let replay = Replay::new(&history);
        assert_eq!(replay.extent(), usize::MAX);
        assert_eq!(replay.cell(usize::MAX), 1);
    }

    #[test]
    fn test_loop_stack_follows_position() {
        let history = history_of("+[-]");
        let mut replay = Replay::new(&history);

        replay.seek(2);
        assert_eq!(replay.loop_stack(), &[1]);
        replay.step_forward();
        replay.step_forward();
        assert!(replay.loop_stack().is_empty());
        assert!(!replay.step_forward());
    }

    #[test]
    fn test_output_grows_with_position() {
        let history = history_of("++++++++[>++++++++<-]>+.+.");
        let mut replay = Replay::new(&history);

        assert_eq!(replay.output_text(), "");
        replay.jump_to_end();
        assert_eq!(replay.output_text(), "AB");
        replay.step_backward();
        assert_eq!(replay.output_text(), "A");
    }
}
