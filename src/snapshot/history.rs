// Execution history for reverse execution

use crate::channel::Channel;
use crate::interpreter::engine::{Interpreter, StepOutcome};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::opcode::Opcode;
use crate::memory::{Memory, MemoryConfig};
use rustc_hash::FxHashMap;
use std::fmt;
use std::mem;

/// A cell write performed by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWrite {
    pub index: usize,
    pub before: i64,
    pub after: i64,
}

/// One executed step: where it ran and what it changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Instruction pointer before the step
    pub position: usize,
    /// Data pointer before the step
    pub data_pointer: usize,
    /// `None` for comment characters
    pub opcode: Option<Opcode>,
    pub write: Option<CellWrite>,
    /// Instruction pointer after the step
    pub next_position: usize,
    /// Data pointer after the step
    pub next_data_pointer: usize,
    /// Loop stack after the step
    pub loop_stack: Vec<usize>,
    /// Number of symbols written once this step is done
    pub output_len: usize,
}

impl Frame {
    /// Estimate the memory usage of this frame in bytes
    pub fn estimated_size(&self) -> usize {
        mem::size_of::<Frame>() + self.loop_stack.len() * mem::size_of::<usize>()
    }
}

/// How the output symbols of a history should be turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    /// Symbols are bytes of a UTF-8 stream
    #[default]
    Bytes,
    /// Symbols are Unicode scalar values
    Codepoints,
}

/// Why recording stopped
#[derive(Debug)]
pub enum Termination {
    /// The script ran to its end with every loop closed
    Completed,
    /// The script failed; the interpreter is left at the failing instruction
    Failed(RuntimeError),
    /// Recording one more step would exceed the memory budget
    LimitExceeded { used: usize, limit: usize },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Completed => write!(f, "Completed"),
            Termination::Failed(e) => write!(f, "Runtime error: {}", e),
            Termination::LimitExceeded { used, limit } => write!(
                f,
                "History memory limit exceeded: {} of {} bytes used",
                used, limit
            ),
        }
    }
}

/// Recorded run of a script
#[derive(Debug)]
pub struct History {
    script: Vec<char>,
    config: MemoryConfig,
    encoding: OutputEncoding,
    initial_position: usize,
    initial_data_pointer: usize,
    initial_loop_stack: Vec<usize>,
    initial_cells: FxHashMap<usize, i64>,
    frames: Vec<Frame>,
    output: Vec<u32>,
    termination: Termination,
    max_memory: usize,
    current_memory: usize,
}

impl History {
    /// Add a frame to history
    fn push(&mut self, frame: Frame) -> Result<(), Termination> {
        let frame_size = frame.estimated_size();

        if self.current_memory + frame_size > self.max_memory {
            return Err(Termination::LimitExceeded {
                used: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += frame_size;
        self.frames.push(frame);
        Ok(())
    }

    pub fn script(&self) -> &[char] {
        &self.script
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn encoding(&self) -> OutputEncoding {
        self.encoding
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get a frame by index
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Get the number of recorded steps
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Every symbol written during the recorded steps
    pub fn output(&self) -> &[u32] {
        &self.output
    }

    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }

    pub(crate) fn initial_position(&self) -> usize {
        self.initial_position
    }

    pub(crate) fn initial_data_pointer(&self) -> usize {
        self.initial_data_pointer
    }

    pub(crate) fn initial_loop_stack(&self) -> &[usize] {
        &self.initial_loop_stack
    }

    pub(crate) fn initial_cells(&self) -> &FxHashMap<usize, i64> {
        &self.initial_cells
    }

    /// Render the first `len` output symbols as text
    pub fn output_text(&self, len: usize) -> String {
        let symbols = &self.output[..len.min(self.output.len())];
        match self.encoding {
            OutputEncoding::Bytes => {
                let bytes: Vec<u8> = symbols
                    .iter()
                    .map(|&s| u8::try_from(s).unwrap_or(b'?'))
                    .collect();
                String::from_utf8_lossy(&bytes).into_owned()
            }
            OutputEncoding::Codepoints => symbols
                .iter()
                .map(|&s| char::from_u32(s).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
        }
    }
}

/// Run `interpreter` to completion, recording every step
///
/// Recording starts from the interpreter's current state and stops at the end
/// of the script, at the first runtime error, or when the next frame would
/// push memory usage past `max_memory`. The output channel is flushed in all
/// three cases.
pub fn record<M, I, O>(
    interpreter: &mut Interpreter<M, I, O>,
    max_memory: usize,
    encoding: OutputEncoding,
) -> History
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    let memory = interpreter.memory();
    let initial_cells = memory.nonzero_cells().into_iter().collect();

    let mut history = History {
        script: interpreter.script().to_vec(),
        config: *memory.config(),
        encoding,
        initial_position: interpreter.instruction_pointer(),
        initial_data_pointer: interpreter.data_pointer(),
        initial_loop_stack: interpreter.loop_stack().to_vec(),
        initial_cells,
        frames: Vec::new(),
        output: Vec::new(),
        termination: Termination::Completed,
        max_memory,
        current_memory: 0,
    };

    history.termination = record_steps(interpreter, &mut history);
    if let Err(e) = interpreter.flush_output() {
        if matches!(history.termination, Termination::Completed) {
            history.termination = Termination::Failed(e);
        }
    }
    history
}

fn record_steps<M, I, O>(
    interpreter: &mut Interpreter<M, I, O>,
    history: &mut History,
) -> Termination
where
    M: Memory,
    I: Channel,
    O: Channel,
{
    loop {
        if interpreter.is_finished() {
            return match interpreter.check_loops_closed() {
                Ok(()) => Termination::Completed,
                Err(e) => Termination::Failed(e),
            };
        }

        let position = interpreter.instruction_pointer();
        let data_pointer = interpreter.data_pointer();
        let opcode = interpreter
            .script()
            .get(position)
            .copied()
            .and_then(Opcode::from_char);

        // Budget check happens before executing so history and interpreter agree
        let worst_case = mem::size_of::<Frame>()
            + (interpreter.loop_stack().len() + 1) * mem::size_of::<usize>();
        if history.current_memory + worst_case > history.max_memory {
            return Termination::LimitExceeded {
                used: history.current_memory,
                limit: history.max_memory,
            };
        }

        let before = opcode
            .filter(|op| op.writes_cell())
            .and_then(|_| interpreter.memory().get(data_pointer).ok());

        let outcome = match interpreter.step() {
            Ok(outcome) => outcome,
            Err(e) => return Termination::Failed(e),
        };
        if let StepOutcome::Output(symbol) = outcome {
            history.output.push(symbol);
        }

        let write = before.and_then(|before| {
            let after = interpreter.memory().get(data_pointer).ok()?;
            (after != before).then_some(CellWrite {
                index: data_pointer,
                before,
                after,
            })
        });

        let frame = Frame {
            position,
            data_pointer,
            opcode,
            write,
            next_position: interpreter.instruction_pointer(),
            next_data_pointer: interpreter.data_pointer(),
            loop_stack: interpreter.loop_stack().to_vec(),
            output_len: history.output.len(),
        };
        if let Err(termination) = history.push(frame) {
            return termination;
        }
    }
}
