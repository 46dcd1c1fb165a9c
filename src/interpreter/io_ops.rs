//! Channel instructions (`,` and `.`).

use crate::channel::Channel;
use crate::interpreter::engine::{EofPolicy, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::Memory;

impl<M, I, O> Interpreter<M, I, O>
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    /// Executes a `,`: reads one symbol into the current cell.
    ///
    /// An exhausted channel is handled by the configured [`EofPolicy`].
    pub(crate) fn read_input(&mut self) -> Result<(), RuntimeError> {
        let position = self.instruction_pointer;
        let symbol = self
            .input
            .read_one()
            .map_err(|source| RuntimeError::Io { source, position })?;

        match (symbol, self.eof_policy) {
            (Some(symbol), _) => self.store(i64::from(symbol)),
            (None, EofPolicy::Substitute(value)) => self.store(value),
            (None, EofPolicy::Unchanged) => Ok(()),
            (None, EofPolicy::Fail) => Err(RuntimeError::EndOfInput { position }),
        }
    }

    /// Executes a `.`: encodes the current cell and writes it.
    ///
    /// Returns the symbol that was written.
    pub(crate) fn write_output(&mut self) -> Result<u32, RuntimeError> {
        let position = self.instruction_pointer;
        let value = self.cell()?;
        let symbol = self
            .output
            .encode(value)
            .ok_or(RuntimeError::InvalidSymbol { value, position })?;

        self.output
            .write_one(symbol)
            .map_err(|source| RuntimeError::Io { source, position })?;
        Ok(symbol)
    }
}
