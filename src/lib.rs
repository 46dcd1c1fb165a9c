//! # Introduction
//!
//! bftty interprets the eight-instruction tape language (`> < + - . , [ ]`)
//! one character at a time, over a pluggable tape and pluggable I/O
//! channels. Runs can be recorded step by step and navigated forward and
//! backward in a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Script → Interpreter ⇄ Memory
//!              ⇅
//!           Channels        Interpreter → History → Replay → TUI
//! ```
//!
//! 1. [`interpreter`]: the engine. `step()`, `run()`, a pull-based output
//!    iterator and the `#` debug hook.
//! 2. [`memory`]: the [`memory::Memory`] trait with a sparse and a
//!    contiguous tape, cell normalization (wrap or clamp) and hex dumps.
//! 3. [`channel`]: the [`channel::Channel`] trait with byte and Unicode
//!    codepoint flavors over any reader/writer.
//! 4. [`snapshot`]: read-only engine views, execution history recorded under
//!    a memory budget, and replay over that history.
//! 5. [`ui`]: ratatui-based history viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use bftty::interpreter::engine::Interpreter;
//!
//! let mut interpreter = Interpreter::new("++++++++[>++++++++<-]>+.");
//! interpreter.run().unwrap();
//! assert_eq!(interpreter.output().contents(), b"A");
//! ```

pub mod channel;
pub mod interpreter;
pub mod memory;
pub mod snapshot;
pub mod ui;
