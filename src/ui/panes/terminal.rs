//! Output pane rendering

use super::focus_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output written so far
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = focus_block(" Output ", is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let lines: Vec<&str> = output.lines().collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1
    super::clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
