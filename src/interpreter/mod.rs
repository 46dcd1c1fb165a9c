//! Interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), single-step dispatch,
//!   `run()` and the pull-based output iterator
//! - [`errors`]: runtime error types
//! - [`opcode`]: the instruction set
//! - [`constants`]: default tape shape and diagnostic layout
//!
//! Loop control and channel instructions live in private modules that add
//! methods to the engine.
//!
//! # Execution Model
//!
//! The interpreter walks the script one character at a time. There is no
//! compilation step and no bracket table: `]` jumps back using a stack of
//! `[` positions, and a `[` over a zero cell scans forward for its match.

pub mod constants;
pub mod engine;
pub mod errors;
mod io_ops;
mod loops;
pub mod opcode;
