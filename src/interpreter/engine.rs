// Execution engine for the interpreter

use crate::channel::{ByteChannel, Channel};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::opcode::Opcode;
use crate::memory::{ContiguousMemory, Memory};
use crate::snapshot::Snapshot;
use std::iter::FusedIterator;

/// What `,` does when the input channel is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Store this value in the current cell
    Substitute(i64),
    /// Leave the current cell as it is
    Unchanged,
    /// Fail with [`RuntimeError::EndOfInput`]
    #[default]
    Fail,
}

/// Result of a single [`Interpreter::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction (or comment character) was executed
    Executed,
    /// A `.` was executed and wrote this symbol to the output channel
    Output(u32),
    /// The instruction pointer was already past the end of the script
    Halted,
}

/// Callback invoked by `#` with a read-only view of the engine
pub type DebugHook = Box<dyn FnMut(&Snapshot<'_>)>;

/// The interpreter that executes a script one instruction at a time
pub struct Interpreter<M = ContiguousMemory, I = ByteChannel, O = ByteChannel> {
    /// Script characters, comments included
    pub(crate) script: Vec<char>,

    /// Tape
    pub(crate) memory: M,

    /// Channel read by `,`
    pub(crate) input: I,

    /// Channel written by `.`
    pub(crate) output: O,

    /// Index of the next character to execute
    pub(crate) instruction_pointer: usize,

    /// Index of the current cell
    pub(crate) data_pointer: usize,

    /// Positions of the `[` of every loop currently being executed
    pub(crate) loop_stack: Vec<usize>,

    pub(crate) eof_policy: EofPolicy,

    pub(crate) debug_hook: Option<DebugHook>,
}

impl Interpreter {
    /// Create an interpreter over a default byte tape with in-memory channels
    pub fn new(script: &str) -> Self {
        Interpreter::with_parts(
            script,
            ContiguousMemory::default(),
            ByteChannel::default(),
            ByteChannel::default(),
        )
    }
}

impl<M, I, O> Interpreter<M, I, O>
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    /// Create an interpreter from its collaborators
    pub fn with_parts(script: &str, memory: M, input: I, output: O) -> Self {
        Interpreter {
            script: script.chars().collect(),
            memory,
            input,
            output,
            instruction_pointer: 0,
            data_pointer: 0,
            loop_stack: Vec::new(),
            eof_policy: EofPolicy::default(),
            debug_hook: None,
        }
    }

    pub fn with_eof_policy(mut self, eof_policy: EofPolicy) -> Self {
        self.eof_policy = eof_policy;
        self
    }

    /// Install the callback run by `#`
    pub fn with_debug_hook(mut self, hook: impl FnMut(&Snapshot<'_>) + 'static) -> Self {
        self.debug_hook = Some(Box::new(hook));
        self
    }

    /// Execute exactly one instruction
    ///
    /// On error the instruction pointer stays on the failing instruction.
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        let Some(&c) = self.script.get(self.instruction_pointer) else {
            return Ok(StepOutcome::Halted);
        };

        let Some(opcode) = Opcode::from_char(c) else {
            self.instruction_pointer += 1;
            return Ok(StepOutcome::Executed);
        };

        match opcode {
            Opcode::Right => {
                self.data_pointer = self
                    .data_pointer
                    .saturating_add(1)
                    .min(self.memory.config().last_index());
            }
            Opcode::Left => {
                self.data_pointer = self.data_pointer.saturating_sub(1);
            }
            Opcode::Increment => self.add_to_cell(1)?,
            Opcode::Decrement => self.add_to_cell(-1)?,
            Opcode::Output => {
                let symbol = self.write_output()?;
                self.instruction_pointer += 1;
                return Ok(StepOutcome::Output(symbol));
            }
            Opcode::Input => self.read_input()?,
            Opcode::LoopStart => {
                self.loop_enter()?;
                return Ok(StepOutcome::Executed);
            }
            Opcode::LoopEnd => {
                self.loop_exit()?;
                return Ok(StepOutcome::Executed);
            }
            Opcode::Debug => self.invoke_debug_hook(),
        }

        self.instruction_pointer += 1;
        Ok(StepOutcome::Executed)
    }

    /// Run the script from the current position to completion
    ///
    /// The output channel is flushed whether or not execution succeeds.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let result = self.run_to_end();
        let flushed = self.flush_output();
        result.and(flushed)
    }

    fn run_to_end(&mut self) -> Result<(), RuntimeError> {
        while !self.is_finished() {
            self.step()?;
        }
        self.check_loops_closed()
    }

    /// Pull-based view of the output: each item runs the script until it emits a symbol
    pub fn outputs(&mut self) -> Outputs<'_, M, I, O> {
        Outputs {
            interpreter: self,
            done: false,
        }
    }

    /// Fail if any loop is still open (only meaningful once the script has ended)
    pub(crate) fn check_loops_closed(&self) -> Result<(), RuntimeError> {
        if self.loop_stack.is_empty() {
            Ok(())
        } else {
            Err(RuntimeError::UnmatchedOpenBracket {
                positions: self.loop_stack.clone(),
            })
        }
    }

    pub(crate) fn flush_output(&mut self) -> Result<(), RuntimeError> {
        let position = self.instruction_pointer;
        self.output
            .flush()
            .map_err(|source| RuntimeError::Io { source, position })
    }

    /// Value of the current cell
    pub(crate) fn cell(&self) -> Result<i64, RuntimeError> {
        self.memory
            .get(self.data_pointer)
            .map_err(|e| RuntimeError::from_memory(e, self.instruction_pointer))
    }

    /// Write the current cell (normalized by the tape)
    pub(crate) fn store(&mut self, value: i64) -> Result<(), RuntimeError> {
        self.memory
            .set(self.data_pointer, value)
            .map_err(|e| RuntimeError::from_memory(e, self.instruction_pointer))
    }

    fn add_to_cell(&mut self, delta: i64) -> Result<(), RuntimeError> {
        let value = self.cell()?;
        self.store(value.saturating_add(delta))
    }

    fn invoke_debug_hook(&mut self) {
        let mut hook = self.debug_hook.take();
        if let Some(hook) = hook.as_mut() {
            hook(&self.snapshot());
        }
        self.debug_hook = hook;
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            script: &self.script,
            instruction_pointer: self.instruction_pointer,
            data_pointer: self.data_pointer,
            loop_stack: &self.loop_stack,
            memory: &self.memory,
        }
    }

    // ========== Getter methods ==========

    pub fn script(&self) -> &[char] {
        &self.script
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    pub fn loop_stack(&self) -> &[usize] {
        &self.loop_stack
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof_policy
    }

    /// Whether the instruction pointer has reached the end of the script
    pub fn is_finished(&self) -> bool {
        self.instruction_pointer >= self.script.len()
    }

    /// Take the collaborators back
    pub fn into_parts(self) -> (M, I, O) {
        (self.memory, self.input, self.output)
    }
}

/// Iterator returned by [`Interpreter::outputs`]
///
/// Each `next()` steps the interpreter until a symbol is written (the symbol
/// also lands in the output channel) or the script ends. At the end of the
/// script the unclosed-loop check runs and its error, if any, is yielded
/// once. After the first error or the end of the script the iterator only
/// yields `None`.
pub struct Outputs<'a, M, I, O> {
    interpreter: &'a mut Interpreter<M, I, O>,
    done: bool,
}

impl<M, I, O> Iterator for Outputs<'_, M, I, O>
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    type Item = Result<u32, RuntimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.interpreter.step() {
                Ok(StepOutcome::Output(symbol)) => return Some(Ok(symbol)),
                Ok(StepOutcome::Executed) => continue,
                Ok(StepOutcome::Halted) => {
                    self.done = true;
                    let result = self
                        .interpreter
                        .check_loops_closed()
                        .and_then(|()| self.interpreter.flush_output());
                    return result.err().map(Err);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<M, I, O> FusedIterator for Outputs<'_, M, I, O>
where
    M: Memory,
    I: Channel,
    O: Channel,
{
}
