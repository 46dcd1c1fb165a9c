//! Loop control (`[` and `]`).
//!
//! Adds `impl Interpreter` methods for entering and leaving loops. There is
//! no precomputed jump table: backward jumps use the loop stack, and skipping
//! a loop whose condition is false scans forward for the matching `]` every
//! time it happens.
//!
//! `[` and `]` both re-evaluate the current cell. A true `]` jumps back onto
//! its `[` with the stack entry already popped, and that `[` pushes it again.

use crate::channel::Channel;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::Memory;

impl<M, I, O> Interpreter<M, I, O>
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    /// Executes a `[` at the current instruction pointer.
    ///
    /// A non-zero cell pushes the position and enters the body; a zero cell
    /// jumps past the matching `]` without touching the stack.
    pub(crate) fn loop_enter(&mut self) -> Result<(), RuntimeError> {
        let position = self.instruction_pointer;

        if self.cell()? != 0 {
            self.loop_stack.push(position);
            self.instruction_pointer = position + 1;
            return Ok(());
        }

        let end = self.find_loop_end(position)?;
        self.instruction_pointer = end + 1;
        Ok(())
    }

    /// Executes a `]` at the current instruction pointer.
    ///
    /// Pops the innermost loop; a zero cell falls through, a non-zero cell
    /// jumps back to the popped `[`.
    pub(crate) fn loop_exit(&mut self) -> Result<(), RuntimeError> {
        let position = self.instruction_pointer;

        let Some(&start) = self.loop_stack.last() else {
            return Err(RuntimeError::UnmatchedCloseBracket { position });
        };
        let value = self.cell()?;
        self.loop_stack.pop();

        if value == 0 {
            self.instruction_pointer = position + 1;
        } else {
            self.instruction_pointer = start;
        }
        Ok(())
    }

    /// Finds the `]` matching the `[` at `start`.
    ///
    /// The scan never reads past the end of the script; running out of
    /// script reports the open loops, this one last.
    pub(crate) fn find_loop_end(&self, start: usize) -> Result<usize, RuntimeError> {
        let mut depth = 1usize;

        for (offset, &c) in self.script[start + 1..].iter().enumerate() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(start + 1 + offset);
                    }
                }
                _ => {}
            }
        }

        let mut positions = self.loop_stack.clone();
        positions.push(start);
        Err(RuntimeError::UnmatchedOpenBracket { positions })
    }
}
