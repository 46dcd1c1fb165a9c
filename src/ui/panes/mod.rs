//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Script display with the instruction pointer highlighted
//! - [`tape`]: Tape cells in rows of sixteen with the data pointer highlighted
//! - [`loops`]: Open loops, innermost first
//! - [`terminal`]: Output written by `.` so far
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*_pane()` function. Borders and
//! focus styling are shared through `focus_block`.

pub mod loops;
pub mod source;
pub mod status;
pub mod tape;
pub mod terminal;

pub use loops::render_loops_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tape::{render_tape_pane, TapeRenderData, TapeScrollState};
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus color applied
fn focus_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(offset: &mut usize, total_items: usize, visible_height: usize) {
    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }
}
