//! Tape pane rendering
//!
//! Cells are laid out in rows of sixteen, addressed by the index of the first
//! cell in the row. The cell under the data pointer is inverted and the cell
//! written by the last step is shown in the accent color.

use super::focus_block;
use crate::interpreter::constants::ROW_WIDTH;
use crate::memory::dump::{cell_width, format_cell};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the tape pane needs from the current replay position
pub struct TapeRenderData<'a> {
    /// Number of cells from index 0 the pane can scroll through
    pub cell_count: usize,
    /// Value of the cell at an index below `cell_count`
    pub cell: &'a dyn Fn(usize) -> i64,
    pub memsize: Option<usize>,
    pub cellsize: Option<u64>,
    pub data_pointer: usize,
    /// Cell changed by the step that led here
    pub last_write: Option<usize>,
}

/// Scroll state for the tape pane
pub struct TapeScrollState {
    pub offset: usize,
    /// Keep the data pointer row on screen; cleared when the user scrolls
    pub follow: bool,
}

impl TapeScrollState {
    pub fn new() -> Self {
        TapeScrollState {
            offset: 0,
            follow: true,
        }
    }
}

impl Default for TapeScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of cells the pane shows: whole rows covering both the used part of
/// the tape and the data pointer
pub fn shown_cells(extent: usize, data_pointer: usize, memsize: Option<usize>) -> usize {
    extent
        .max(data_pointer.saturating_add(1))
        .div_ceil(ROW_WIDTH)
        .saturating_mul(ROW_WIDTH)
        .min(memsize.unwrap_or(usize::MAX))
}

/// Render the tape pane
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    data: &TapeRenderData<'_>,
    is_focused: bool,
    scroll_state: &mut TapeScrollState,
) {
    let title = match data.memsize {
        Some(memsize) => format!(" Tape [{}] ", memsize),
        None => " Tape [unbounded] ".to_string(),
    };
    let block = focus_block(&title, is_focused);

    let total_rows = data.cell_count.div_ceil(ROW_WIDTH);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if scroll_state.follow {
        let pointer_row = data.data_pointer / ROW_WIDTH;
        if pointer_row < scroll_state.offset {
            scroll_state.offset = pointer_row;
        } else if pointer_row >= scroll_state.offset.saturating_add(visible_height) {
            scroll_state.offset = pointer_row + 1 - visible_height;
        }
    }
    super::clamp_scroll(&mut scroll_state.offset, total_rows, visible_height);

    // Only the rows on screen are fetched
    let rows: Vec<(usize, Vec<i64>)> = (scroll_state.offset..total_rows)
        .take(visible_height)
        .map(|row| {
            let start = row * ROW_WIDTH;
            let end = start.saturating_add(ROW_WIDTH).min(data.cell_count);
            (start, (start..end).map(data.cell).collect())
        })
        .collect();
    let shown: Vec<i64> = rows.iter().flat_map(|(_, values)| values.iter().copied()).collect();
    let width = cell_width(data.cellsize, &shown);

    let address_width = format!("{:x}", data.cell_count.saturating_sub(1)).len().max(4);

    let lines: Vec<Line> = rows
        .iter()
        .map(|(start, values)| {
            let mut spans = vec![Span::styled(
                format!("{:0w$x} ", start, w = address_width),
                Style::default().fg(DEFAULT_THEME.comment),
            )];

            for (offset, &value) in values.iter().enumerate() {
                let index = start + offset;
                let style = if index == data.data_pointer {
                    Style::default()
                        .bg(DEFAULT_THEME.secondary)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if data.last_write == Some(index) {
                    Style::default()
                        .fg(DEFAULT_THEME.success)
                        .add_modifier(Modifier::BOLD)
                } else if value == 0 {
                    Style::default().fg(DEFAULT_THEME.comment)
                } else {
                    Style::default().fg(DEFAULT_THEME.fg)
                };
                spans.push(Span::raw(" "));
                spans.push(Span::styled(format_cell(value, width), style));
            }

            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shown_cells_covers_pointer() {
        assert_eq!(shown_cells(0, 0, Some(30_000)), 16);
        assert_eq!(shown_cells(3, 20, Some(30_000)), 32);
        assert_eq!(shown_cells(40, 0, Some(30_000)), 48);
        assert_eq!(shown_cells(0, 2, Some(3)), 3);
        assert_eq!(shown_cells(0, 100, None), 112);
        assert_eq!(shown_cells(usize::MAX, 0, None), usize::MAX);
    }

    #[test]
    fn test_far_pointer_renders_only_its_rows() {
        use ratatui::{backend::TestBackend, Terminal};

        let fetched = std::cell::Cell::new(0);
        let cell = |index: usize| {
            fetched.set(fetched.get() + 1);
            if index == usize::MAX - 1 {
                0xab
            } else {
                0
            }
        };
        let data = TapeRenderData {
            cell_count: shown_cells(usize::MAX, usize::MAX - 1, None),
            cell: &cell,
            memsize: None,
            cellsize: Some(256),
            data_pointer: usize::MAX - 1,
            last_write: None,
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 6)).unwrap();
        let mut scroll = TapeScrollState::new();
        terminal
            .draw(|f| render_tape_pane(f, f.area(), &data, false, &mut scroll))
            .unwrap();

        assert!(fetched.get() <= 4 * ROW_WIDTH);
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Tape [unbounded]"));
        assert!(text.contains("ab"));
    }
}
