//! Status bar rendering with points and keybindings

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEYBINDINGS: [(&str, &str); 5] = [
    (" r ", " run "),
    (" ←/→ ", " item "),
    (" s ", " solution "),
    (" ⇥ ", " focus "),
    (" q ", " quit "),
];

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    points: u32,
    achievements: usize,
    is_error: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let bar = Style::default().bg(DEFAULT_THEME.bar_bg);

    // Left side: score, achievements and the last message
    let score_bg = if is_error {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.primary
    };
    let mut left_spans = vec![Span::styled(
        format!(" ⭐ {} ", points),
        DEFAULT_THEME.badge(score_bg),
    )];
    if achievements > 0 {
        left_spans.push(Span::styled(
            format!(" 🏆 {} ", achievements),
            DEFAULT_THEME.badge(DEFAULT_THEME.success),
        ));
    }
    let message_fg = if is_error {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.fg
    };
    left_spans.push(Span::styled(" | ", DEFAULT_THEME.on_bar(DEFAULT_THEME.comment)));
    left_spans.push(Span::styled(format!(" {} ", message), DEFAULT_THEME.on_bar(message_fg)));

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(bar)
            .alignment(Alignment::Left),
        layout[0],
    );

    // Right side: keybinds separated by bars
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = DEFAULT_THEME.on_bar(DEFAULT_THEME.fg);
    let sep_style = DEFAULT_THEME.on_bar(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in KEYBINDINGS.into_iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(bar)
            .alignment(Alignment::Right),
        layout[1],
    );
}
