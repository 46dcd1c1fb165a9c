// Recording and replaying execution history

use bftty::channel::ByteChannel;
use bftty::interpreter::constants::DEFAULT_HISTORY_LIMIT;
use bftty::interpreter::engine::Interpreter;
use bftty::interpreter::errors::RuntimeError;
use bftty::interpreter::opcode::Opcode;
use bftty::memory::{ContiguousMemory, Memory};
use bftty::snapshot::{record, OutputEncoding, Replay, Termination};

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

#[test]
fn test_replay_matches_live_run() {
    let mut recorded = Interpreter::new(HELLO_WORLD);
    let history = record(&mut recorded, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes);
    assert!(matches!(history.termination(), Termination::Completed));

    // Step a second interpreter alongside the replay and compare state
    let mut live = Interpreter::new(HELLO_WORLD);
    let mut replay = Replay::new(&history);
    while replay.step_forward() {
        live.step().unwrap();
        assert_eq!(replay.instruction_pointer(), live.instruction_pointer());
        assert_eq!(replay.data_pointer(), live.data_pointer());
        assert_eq!(replay.loop_stack(), live.loop_stack());
        let dp = live.data_pointer();
        assert_eq!(Ok(replay.cell(dp)), live.memory().get(dp));
    }

    assert!(live.is_finished());
    assert_eq!(replay.output_text(), "Hello World!\n");
    assert_eq!(recorded.output().contents(), b"Hello World!\n");
}

#[test]
fn test_backward_restores_the_initial_tape() {
    let mut interpreter = Interpreter::new(HELLO_WORLD);
    let history = record(&mut interpreter, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes);
    let mut replay = Replay::new(&history);

    replay.jump_to_end();
    assert_eq!(replay.extent(), interpreter.memory().extent());
    for index in 0..replay.extent() {
        assert_eq!(Ok(replay.cell(index)), interpreter.memory().get(index));
    }

    let mut steps_back = 0;
    while replay.step_backward() {
        steps_back += 1;
    }
    assert_eq!(steps_back, history.len());
    assert_eq!(replay.extent(), 0);
    assert_eq!(replay.output_text(), "");
}

#[test]
fn test_recording_keeps_partial_history_on_error() {
    let mut interpreter = Interpreter::with_parts(
        "+.,",
        ContiguousMemory::default(),
        ByteChannel::new(),
        ByteChannel::new(),
    );
    let history = record(&mut interpreter, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes);

    assert_eq!(history.len(), 2);
    assert!(matches!(
        history.termination(),
        Termination::Failed(RuntimeError::EndOfInput { position: 2 })
    ));
    assert_eq!(history.output(), &[1]);
    assert_eq!(interpreter.instruction_pointer(), 2);
}

#[test]
fn test_frames_describe_each_step() {
    let mut interpreter = Interpreter::new("+>c-");
    let history = record(&mut interpreter, DEFAULT_HISTORY_LIMIT, OutputEncoding::Bytes);
    let opcodes: Vec<Option<Opcode>> = history.frames().iter().map(|f| f.opcode).collect();

    assert_eq!(
        opcodes,
        vec![
            Some(Opcode::Increment),
            Some(Opcode::Right),
            None,
            Some(Opcode::Decrement)
        ]
    );
    let last = history.get(3).unwrap();
    assert_eq!(last.data_pointer, 1);
    assert_eq!(last.write.map(|w| (w.before, w.after)), Some((0, 255)));
    assert!(history.get(1).unwrap().write.is_none());
}

#[test]
fn test_tiny_budget_stops_early() {
    let mut interpreter = Interpreter::new(HELLO_WORLD);
    let history = record(&mut interpreter, 1, OutputEncoding::Bytes);

    assert!(history.is_empty());
    assert!(matches!(
        history.termination(),
        Termination::LimitExceeded { used: 0, limit: 1 }
    ));
    assert_eq!(interpreter.instruction_pointer(), 0);
}
