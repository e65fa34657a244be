//! Current tutorial or challenge

use super::{clamp_scroll, pane_block, visible_height};
use crate::challenges::{Challenge, ChallengeKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Render the item being worked on; `position` is 1-based
#[allow(clippy::too_many_arguments)]
pub fn render_challenge_pane(
    frame: &mut Frame,
    area: Rect,
    challenge: &Challenge,
    position: usize,
    total: usize,
    completed: bool,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" {} {}/{} ", challenge.kind, position, total);
    let block = pane_block(&title, is_focused);

    let kind_color = match challenge.kind {
        ChallengeKind::Tutorial => DEFAULT_THEME.primary,
        ChallengeKind::Challenge => DEFAULT_THEME.secondary,
    };

    let mut heading = vec![Span::styled(
        format!("{} {}", challenge.emoji, challenge.title),
        Style::default().fg(kind_color).add_modifier(Modifier::BOLD),
    )];
    if completed {
        heading.push(Span::styled(
            "  ✔ done",
            Style::default().fg(DEFAULT_THEME.success),
        ));
    }

    let mut lines = vec![
        Line::from(heading),
        Line::from(Span::styled(
            format!("{} points", challenge.points()),
            Style::default().fg(DEFAULT_THEME.comment),
        )),
        Line::default(),
    ];
    lines.extend(
        challenge
            .description
            .lines()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(DEFAULT_THEME.fg)))),
    );
    if !challenge.hint.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("💡 Hint: ", Style::default().fg(DEFAULT_THEME.function)),
            Span::styled(
                challenge.hint.as_str(),
                Style::default()
                    .fg(DEFAULT_THEME.comment)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    // Wrapped lines can outnumber logical ones, so this only bounds the offset loosely
    clamp_scroll(scroll_offset, lines.len(), visible_height(area));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(*scroll_offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}
