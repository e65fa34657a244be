//! Program output pane rendering

use super::{clamp_scroll, pane_block, visible_height};
use crate::capture::output_lines;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render what the last run printed
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    let lines = output.map(output_lines).unwrap_or_default();

    if lines.is_empty() {
        let placeholder = if output.is_some() {
            "(no output)"
        } else {
            "(not run yet)"
        };
        let paragraph = Paragraph::new(placeholder)
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible = visible_height(area);
    clamp_scroll(scroll_offset, lines.len(), visible);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible)
        .map(|line| ListItem::new(line).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
