//! Main TUI application state and logic

use crate::snapshot::{History, Replay, Termination};
use crate::ui::panes::{
    self, SourceScrollState, StatusRenderData, TapeRenderData, TapeScrollState,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Script,
    Tape,
    Loops,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: script -> output -> tape -> loops)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Script => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Loops,
            FocusedPane::Loops => FocusedPane::Script,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Script => FocusedPane::Loops,
            FocusedPane::Output => FocusedPane::Script,
            FocusedPane::Tape => FocusedPane::Output,
            FocusedPane::Loops => FocusedPane::Tape,
        }
    }
}

/// The main application state
pub struct App<'a> {
    /// Cursor over the recorded run
    pub replay: Replay<'a>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub tape_scroll: TapeScrollState,
    pub loops_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Delay between steps in play mode
    pub play_interval: Duration,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl<'a> App<'a> {
    /// Create a new app positioned at the start of `history`
    pub fn new(history: &'a History) -> Self {
        let status_message = match history.termination() {
            Termination::Completed => String::from("Ready!"),
            other => format!("Ready! (run ended: {})", other),
        };

        App {
            replay: Replay::new(history),
            focused_pane: FocusedPane::Script,
            source_scroll: SourceScrollState::new(),
            tape_scroll: TapeScrollState::new(),
            loops_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            play_interval: Duration::from_millis(200),
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                if self.replay.step_forward() {
                    self.status_message = "Playing...".to_string();
                    self.after_move();
                } else {
                    self.is_playing = false;
                    self.status_message = self.end_message();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Script (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tape (top) | Loops (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[1]);

        let history = self.replay.history();
        let at_failure = self.replay.is_at_end() && self.is_error();

        panes::render_source_pane(
            frame,
            left_rows[0],
            history.script(),
            self.replay.instruction_pointer(),
            at_failure,
            self.focused_pane == FocusedPane::Script,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            &self.replay.output_text(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let config = history.config();
        let shown = panes::tape::shown_cells(
            self.replay.extent(),
            self.replay.data_pointer(),
            config.memsize,
        );
        let replay = &self.replay;
        let cell = |index: usize| replay.cell(index);
        let tape = TapeRenderData {
            cell_count: shown,
            cell: &cell,
            memsize: config.memsize,
            cellsize: config.cellsize,
            data_pointer: self.replay.data_pointer(),
            last_write: self
                .replay
                .last_frame()
                .and_then(|last| last.write)
                .map(|write| write.index),
        };
        panes::render_tape_pane(
            frame,
            right_rows[0],
            &tape,
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
        );

        panes::render_loops_pane(
            frame,
            right_rows[1],
            self.replay.loop_stack(),
            self.focused_pane == FocusedPane::Loops,
            &mut self.loops_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                current_step: self.replay.position(),
                total_steps: self.replay.total(),
                is_playing: self.is_playing,
                is_error: self.is_error(),
            },
        );
    }

    fn is_error(&self) -> bool {
        !matches!(self.replay.history().termination(), Termination::Completed)
    }

    fn end_message(&self) -> String {
        match self.replay.history().termination() {
            Termination::Completed => "Playback complete".to_string(),
            other => other.to_string(),
        }
    }

    /// Reset auto-scrolling after the position changed
    fn after_move(&mut self) {
        self.output_scroll = usize::MAX;
        self.tape_scroll.follow = true;
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.replay.step_forward() {
                        stepped += 1;
                    } else {
                        break;
                    }
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.after_move();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Script => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll.follow = false;
                    self.tape_scroll.offset = self.tape_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Loops => {
                    self.loops_scroll = self.loops_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Script => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tape => {
                    self.tape_scroll.follow = false;
                    self.tape_scroll.offset = self.tape_scroll.offset.saturating_add(1);
                }
                FocusedPane::Loops => {
                    self.loops_scroll = self.loops_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(self.play_interval)
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.replay.jump_to_end();
                self.status_message = self.end_message();
                self.after_move();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.replay.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.after_move();
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        if self.replay.step_forward() {
            self.status_message = "Stepped forward".to_string();
            self.after_move();
        } else {
            self.status_message = format!("Cannot step forward: {}", self.end_message());
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        if self.replay.step_backward() {
            self.status_message = "Stepped backward".to_string();
            self.after_move();
        } else {
            self.status_message = "Cannot step backward: at start".to_string();
        }
    }
}
