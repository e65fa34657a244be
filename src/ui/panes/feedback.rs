//! Friendly diagnostic or validation verdict for the last run

use super::{clamp_scroll, pane_block, visible_height};
use crate::challenges::Attempt;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Lines describing `attempt`; `hint` is offered when the program ran but missed the goal
pub fn feedback_lines<'a>(attempt: Option<&'a Attempt>, hint: &'a str) -> Vec<Line<'a>> {
    let Some(attempt) = attempt else {
        return vec![Line::from(Span::styled(
            "Press r to run your code!",
            Style::default().fg(DEFAULT_THEME.comment),
        ))];
    };

    let mut lines = Vec::new();
    match (&attempt.result.failure, attempt.outcome) {
        (Some(failure), _) => {
            lines.push(Line::from(Span::styled(
                failure.translated_message.as_str(),
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
            if let Some(line) = failure.line {
                lines.push(Line::from(Span::styled(
                    format!("Look at line {}.", line),
                    Style::default().fg(DEFAULT_THEME.secondary),
                )));
            }
            lines.push(Line::from(Span::styled(
                failure.raw_message.as_str(),
                Style::default().fg(DEFAULT_THEME.comment),
            )));
        }
        (None, Some(true)) => {
            lines.push(Line::from(Span::styled(
                "🎉 You did it! Great job!",
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        (None, _) => {
            lines.push(Line::from(Span::styled(
                "Your code ran, but it doesn't solve the puzzle yet. Keep trying!",
                Style::default().fg(DEFAULT_THEME.secondary),
            )));
            if !hint.is_empty() {
                lines.push(Line::default());
                lines.push(Line::from(vec![
                    Span::styled("💡 ", Style::default().fg(DEFAULT_THEME.function)),
                    Span::styled(hint, Style::default().fg(DEFAULT_THEME.comment)),
                ]));
            }
        }
    }

    let stats = attempt.result.stats;
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{} steps in {} ms", stats.steps, stats.elapsed.as_millis()),
        Style::default().fg(DEFAULT_THEME.comment),
    )));
    lines
}

pub fn render_feedback_pane(
    frame: &mut Frame,
    area: Rect,
    attempt: Option<&Attempt>,
    hint: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Feedback ", is_focused);
    let lines = feedback_lines(attempt, hint);
    clamp_scroll(scroll_offset, lines.len(), visible_height(area));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(*scroll_offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutionResult, FailureInfo};
    use crate::diagnostics::FaultCategory;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_not_run_yet() {
        assert_eq!(text(&feedback_lines(None, "hint")), "Press r to run your code!");
    }

    #[test]
    fn test_failure_shows_friendly_message_and_line() {
        let attempt = Attempt {
            result: ExecutionResult {
                captured_output: String::new(),
                failure: Some(FailureInfo {
                    category: FaultCategory::DivisionByZero,
                    exception: "ZeroDivisionError".to_string(),
                    raw_message: "ZeroDivisionError: division by zero".to_string(),
                    translated_message: "You can't divide by zero!".to_string(),
                    line: Some(2),
                }),
                stats: Default::default(),
            },
            outcome: None,
        };
        let text = text(&feedback_lines(Some(&attempt), "hint"));
        assert!(text.starts_with("You can't divide by zero!"));
        assert!(text.contains("Look at line 2."));
        assert!(!text.contains("hint"));
    }

    #[test]
    fn test_missed_goal_offers_hint() {
        let attempt = Attempt {
            result: ExecutionResult::default(),
            outcome: Some(false),
        };
        let text = text(&feedback_lines(Some(&attempt), "Use a loop"));
        assert!(text.contains("Keep trying!"));
        assert!(text.contains("Use a loop"));
    }
}
