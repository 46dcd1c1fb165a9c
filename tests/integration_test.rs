// Integration tests for the interpreter

use bftty::channel::{ByteChannel, CodepointChannel};
use bftty::interpreter::engine::{EofPolicy, Interpreter, StepOutcome};
use bftty::interpreter::errors::RuntimeError;
use bftty::memory::{ContiguousMemory, Memory, MemoryConfig, Overflow, SparseMemory};
use std::cell::RefCell;
use std::rc::Rc;

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn byte_interpreter(script: &str, config: MemoryConfig, input: &[u8]) -> Interpreter {
    Interpreter::with_parts(
        script,
        ContiguousMemory::new(config).expect("valid tape"),
        ByteChannel::from_bytes(input),
        ByteChannel::new(),
    )
}

#[test]
fn test_hello_world() {
    let mut interpreter = Interpreter::new(HELLO_WORLD);
    let result = interpreter.run();

    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(interpreter.output().contents(), b"Hello World!\n");
}

#[test]
fn test_hello_world_on_every_tape() {
    let sparse = SparseMemory::new(MemoryConfig::default()).unwrap();
    let mut interpreter =
        Interpreter::with_parts(HELLO_WORLD, sparse, ByteChannel::new(), ByteChannel::new());
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), b"Hello World!\n");

    let unbounded = MemoryConfig::default().with_memsize(None);
    let mut interpreter = byte_interpreter(HELLO_WORLD, unbounded, b"");
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), b"Hello World!\n");
}

#[test]
fn test_wraparound_to_zero() {
    let script = format!("{}.", "+".repeat(256));
    let mut interpreter = Interpreter::new(&script);
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), &[0x00]);
}

#[test]
fn test_clear_loop_ends_at_zero() {
    for v in [1usize, 2, 17, 128, 255] {
        let script = format!("{}[-]", "+".repeat(v));
        let mut interpreter = Interpreter::new(&script);
        interpreter.run().unwrap();
        assert_eq!(interpreter.memory().get(0), Ok(0), "starting from {}", v);
        assert!(interpreter.loop_stack().is_empty());
    }
}

#[test]
fn test_clear_loop_with_clamp() {
    let config = MemoryConfig::default().with_overflow(Overflow::Clamp);
    let script = format!("{}[-]-", "+".repeat(300));
    let mut interpreter = byte_interpreter(&script, config, b"");
    interpreter.run().unwrap();
    assert_eq!(interpreter.memory().get(0), Ok(0));
}

#[test]
fn test_echo() {
    let mut interpreter = byte_interpreter(",.", MemoryConfig::default(), &[65]);
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), &[65]);
}

#[test]
fn test_cat_until_eof() {
    let mut interpreter = byte_interpreter("+[,.]", MemoryConfig::default(), b"hi")
        .with_eof_policy(EofPolicy::Substitute(0));
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), b"hi\0");
}

#[test]
fn test_unmatched_open_bracket() {
    let mut interpreter = Interpreter::new("++[>+");
    let err = interpreter.run().unwrap_err();

    match err {
        RuntimeError::UnmatchedOpenBracket { ref positions } => assert_eq!(positions, &[2]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.position(), Some(2));
    assert_eq!(err.to_string(), "Unmatched '[' at position 2");
}

#[test]
fn test_unmatched_open_bracket_on_zero_cell() {
    // The skip scan runs off the end of the script
    let mut interpreter = Interpreter::new("[[]");
    let err = interpreter.run().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::UnmatchedOpenBracket { ref positions } if positions == &[0]
    ));
    assert_eq!(interpreter.instruction_pointer(), 0);
}

#[test]
fn test_bare_close_bracket() {
    let mut interpreter = Interpreter::new("+.]+.");
    let err = interpreter.run().unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::UnmatchedCloseBracket { position: 2 }
    ));
    assert_eq!(err.to_string(), "Unmatched ']' at position 2");
    // Output before the failure is kept and flushed
    assert_eq!(interpreter.output().contents(), &[1]);
}

#[test]
fn test_pointer_clamping() {
    let config = MemoryConfig::default().with_memsize(Some(4));
    let mut interpreter = byte_interpreter("<<<+>>>>>>>+", config, b"");
    interpreter.run().unwrap();

    assert_eq!(interpreter.data_pointer(), 3);
    assert_eq!(interpreter.memory().get(0), Ok(1));
    assert_eq!(interpreter.memory().get(3), Ok(1));
}

#[test]
fn test_comments_only() {
    let script = "This script has no instructions at all\n";
    let mut interpreter = Interpreter::new(script);
    interpreter.run().unwrap();

    assert_eq!(interpreter.instruction_pointer(), script.chars().count());
    assert_eq!(interpreter.memory().extent(), 0);
    assert!(interpreter.output().contents().is_empty());
}

#[test]
fn test_codepoint_channels() {
    // Read two codepoints, bump each by one, write them back
    let mut interpreter = Interpreter::with_parts(
        ",+.,+.",
        SparseMemory::new(MemoryConfig::default().with_cellsize(None)).unwrap(),
        CodepointChannel::from_text("λé"),
        CodepointChannel::new(),
    );
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().text(), "μê");
}

#[test]
fn test_codepoint_output_rejects_surrogates() {
    let script = format!(">{}[<{}>-]<.", "+".repeat(0xd8), "+".repeat(0x100));
    let mut interpreter = Interpreter::with_parts(
        &script,
        SparseMemory::new(MemoryConfig::default().with_cellsize(None)).unwrap(),
        CodepointChannel::new(),
        CodepointChannel::new(),
    );
    let err = interpreter.run().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InvalidSymbol { value: 0xd800, .. }
    ));
}

#[test]
fn test_unbounded_cells_go_negative() {
    let config = MemoryConfig::default().with_cellsize(None);
    let mut interpreter = Interpreter::with_parts(
        "---",
        SparseMemory::new(config).unwrap(),
        ByteChannel::new(),
        ByteChannel::new(),
    );
    interpreter.run().unwrap();
    assert_eq!(interpreter.memory().get(0), Ok(-3));
}

#[test]
fn test_outputs_iterator() {
    let mut interpreter = Interpreter::new("++++++++[>++++++++<-]>+.+.+.");
    let symbols: Result<Vec<u32>, _> = interpreter.outputs().collect();

    assert_eq!(symbols.unwrap(), vec![65, 66, 67]);
    assert_eq!(interpreter.output().contents(), b"ABC");
    assert!(interpreter.is_finished());
}

#[test]
fn test_outputs_iterator_yields_error_last() {
    let mut interpreter = Interpreter::new("+.+.[");
    let mut outputs = interpreter.outputs();

    assert_eq!(outputs.next().map(|r| r.ok()), Some(Some(1)));
    assert_eq!(outputs.next().map(|r| r.ok()), Some(Some(2)));
    assert!(matches!(
        outputs.next(),
        Some(Err(RuntimeError::UnmatchedOpenBracket { .. }))
    ));
    assert!(outputs.next().is_none());
    assert!(outputs.next().is_none());
}

#[test]
fn test_outputs_iterator_is_lazy() {
    // An infinite loop that prints: only what is pulled gets executed
    let mut interpreter = Interpreter::new("+[.]");
    let first: Vec<u32> = interpreter
        .outputs()
        .take(3)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(first, vec![1, 1, 1]);
    assert_eq!(interpreter.output().contents(), &[1, 1, 1]);
}

#[test]
fn test_step_by_step() {
    let mut interpreter = Interpreter::new("+.");
    assert_eq!(interpreter.step().unwrap(), StepOutcome::Executed);
    assert_eq!(interpreter.step().unwrap(), StepOutcome::Output(1));
    assert_eq!(interpreter.step().unwrap(), StepOutcome::Halted);
    assert_eq!(interpreter.step().unwrap(), StepOutcome::Halted);
}

#[test]
fn test_debug_hook() {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);

    let mut interpreter =
        Interpreter::new("+>++#<#").with_debug_hook(move |snapshot| {
            sink.borrow_mut().push(snapshot.to_string());
        });
    interpreter.run().unwrap();

    let lines = lines.borrow();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("s*: 4; d*: 1; mem: Memory[30000]{"));
    assert!(lines[0].contains("01 02 00"));
    assert!(lines[1].starts_with("s*: 6; d*: 0;"));
    assert!(lines[1].ends_with("sloops: []"));
}

#[test]
fn test_hash_without_hook_is_a_comment() {
    let mut interpreter = Interpreter::new("#+#.");
    interpreter.run().unwrap();
    assert_eq!(interpreter.output().contents(), &[1]);
}

#[test]
fn test_eof_policies() {
    let mut failing = byte_interpreter(",", MemoryConfig::default(), b"");
    assert!(matches!(
        failing.run(),
        Err(RuntimeError::EndOfInput { position: 0 })
    ));

    let mut unchanged = byte_interpreter("+++,", MemoryConfig::default(), b"")
        .with_eof_policy(EofPolicy::Unchanged);
    unchanged.run().unwrap();
    assert_eq!(unchanged.memory().get(0), Ok(3));
}

#[test]
fn test_into_parts_returns_collaborators() {
    let mut interpreter = byte_interpreter(",+.", MemoryConfig::default(), b"a");
    interpreter.run().unwrap();
    let (memory, _input, output) = interpreter.into_parts();
    assert_eq!(memory.get(0), Ok(98));
    assert_eq!(output.contents(), b"b");
}
