//! Loop stack pane rendering

use super::focus_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render the open loops, innermost first
pub fn render_loops_pane(
    frame: &mut Frame,
    area: Rect,
    loop_stack: &[usize],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Loops ({}) ", loop_stack.len());
    let block = focus_block(&title, is_focused);

    if loop_stack.is_empty() {
        let paragraph = Paragraph::new("(no open loops)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    super::clamp_scroll(scroll_offset, loop_stack.len(), visible_height);

    let items: Vec<ListItem> = loop_stack
        .iter()
        .rev()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(depth, position)| {
            let marker_style = if depth == 0 {
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>3} ", loop_stack.len() - depth), marker_style),
                Span::styled("[ at ", Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(
                    position.to_string(),
                    Style::default().fg(DEFAULT_THEME.number),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
