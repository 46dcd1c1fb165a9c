//! Script pane rendering
//!
//! Displays the script line by line with each instruction colored by kind.
//! Comment characters are dimmed, the line holding the instruction pointer
//! gets the current-line background, and the instruction itself is inverted.
//! On a failed run the failing instruction is shown in the error color.

use super::focus_block;
use crate::interpreter::opcode::Opcode;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn instruction_style(c: char) -> Style {
    match Opcode::from_char(c) {
        Some(Opcode::LoopStart | Opcode::LoopEnd) => Style::default()
            .fg(DEFAULT_THEME.primary)
            .add_modifier(Modifier::BOLD),
        Some(Opcode::Increment | Opcode::Decrement) => Style::default().fg(DEFAULT_THEME.number),
        Some(Opcode::Left | Opcode::Right) => Style::default().fg(DEFAULT_THEME.pointer),
        Some(Opcode::Output | Opcode::Input) => Style::default().fg(DEFAULT_THEME.io),
        Some(Opcode::Debug) => Style::default().fg(DEFAULT_THEME.success),
        None => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// Split the script into lines of `(position, char)`, dropping the newlines
fn script_lines(script: &[char]) -> Vec<Vec<(usize, char)>> {
    let mut lines = vec![Vec::new()];
    for (position, &c) in script.iter().enumerate() {
        if c == '\n' {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.push((position, c));
        }
    }
    lines
}

/// 0-based line holding `position`
fn line_of(script: &[char], position: usize) -> usize {
    script
        .iter()
        .take(position.min(script.len()))
        .filter(|&&c| c == '\n')
        .count()
}

/// Scroll state for the script pane
pub struct SourceScrollState {
    pub offset: usize,
    /// Target visual row for the current line (None = not initialized yet)
    pub target_line_row: Option<usize>,
}

impl SourceScrollState {
    pub fn new() -> Self {
        SourceScrollState {
            offset: 0,
            target_line_row: None,
        }
    }
}

impl Default for SourceScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the script pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    script: &[char],
    instruction_pointer: usize,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = focus_block(" Script ", is_focused);

    let lines = script_lines(script);
    let total_lines = lines.len();
    let current_line = line_of(script, instruction_pointer);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Keep the current line at a fixed visual row while stepping
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    scroll_state.offset = current_line.saturating_sub(target_row);
    super::clamp_scroll(&mut scroll_state.offset, total_lines, visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = idx == current_line;
            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut spans = vec![Span::styled(format!("{:4} ", idx + 1), num_style)];
            spans.extend(line.iter().map(|&(position, c)| {
                let style = if position == instruction_pointer {
                    Style::default()
                        .bg(if is_error {
                            DEFAULT_THEME.error
                        } else {
                            DEFAULT_THEME.secondary
                        })
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if is_current {
                    instruction_style(c).bg(DEFAULT_THEME.current_line_bg)
                } else {
                    instruction_style(c)
                };
                Span::styled(c.to_string(), style)
            }));

            // Past the last instruction: show the pointer as a cursor at the end
            if is_current && instruction_pointer >= script.len() {
                spans.push(Span::styled(
                    " ",
                    Style::default().bg(DEFAULT_THEME.secondary),
                ));
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_lines_keep_positions() {
        let script: Vec<char> = "+\n>.".chars().collect();
        let lines = script_lines(&script);
        assert_eq!(lines, vec![vec![(0, '+')], vec![(2, '>'), (3, '.')]]);
        assert_eq!(line_of(&script, 3), 1);
        assert_eq!(line_of(&script, 0), 0);
        assert_eq!(line_of(&script, 99), 1);
    }
}
