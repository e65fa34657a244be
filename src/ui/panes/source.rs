//! Source code pane rendering with syntax highlighting
//!
//! Shows the learner's program with line numbers and basic Python
//! highlighting. When the last run failed on a known line, that line is drawn
//! on the error colour so the child can find it.
//!
//! Highlighting uses a small character tokenizer rather than the real lexer:
//! it must cope with half-typed programs that do not lex.

use super::{clamp_scroll, pane_block, visible_height};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

const BUILTINS: &[&str] = &[
    "abs", "bool", "dict", "enumerate", "float", "input", "int", "isinstance", "len", "list",
    "max", "min", "print", "range", "reversed", "round", "sorted", "str", "sum", "tuple", "type",
    "zip",
];

/// Simple syntax highlighting for one line of Python
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut word_start: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c.is_alphanumeric() || c == '_' {
            word_start.get_or_insert(pos);
            i += 1;
            continue;
        }

        if let Some(start) = word_start.take() {
            let style = word_style(&line[start..pos], c == '(');
            spans.push(Span::styled(&line[start..pos], style));
        }

        // Comments run to the end of the line
        if c == '#' {
            spans.push(Span::styled(
                &line[pos..],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        if c == '"' || c == '\'' {
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            let end_byte = chars.get(end + 1).map_or(line.len(), |&(p, _)| p);
            spans.push(Span::styled(
                &line[pos..end_byte],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end + 1;
            continue;
        }

        let style = match c {
            '(' | ')' | '[' | ']' | '{' | '}' => Style::default().fg(DEFAULT_THEME.primary),
            ':' => Style::default().fg(DEFAULT_THEME.keyword),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(&line[pos..pos + c.len_utf8()], style));
        i += 1;
    }

    if let Some(start) = word_start {
        spans.push(Span::styled(&line[start..], word_style(&line[start..], false)));
    }

    Line::from(spans)
}

fn word_style(word: &str, is_call: bool) -> Style {
    if KEYWORDS.contains(&word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if matches!(word, "True" | "False" | "None")
        || word.starts_with(|c: char| c.is_ascii_digit())
    {
        Style::default().fg(DEFAULT_THEME.number)
    } else if BUILTINS.contains(&word) {
        Style::default().fg(DEFAULT_THEME.builtin)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    title: &str,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(title, is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let visible = visible_height(area);
    clamp_scroll(scroll_offset, lines.len(), visible);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);

            let mut content = highlight_source_code(line);
            let num_style = if is_error {
                // White on red so the failing line stands out
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content.spans {
                    span.style = error_style;
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_strings_and_comments() {
        let line = highlight_source_code("for i in range(3):  # count");
        assert_eq!(
            texts(&line),
            vec!["for", " ", "i", " ", "in", " ", "range", "(", "3", ")", ":", " ", " ", "# count"]
        );
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.builtin));
        assert_eq!(line.spans[8].style.fg, Some(DEFAULT_THEME.number));
    }

    #[test]
    fn test_highlight_strings_and_unicode() {
        let line = highlight_source_code("print('🐯 it\\'s', name)");
        assert_eq!(texts(&line), vec!["print", "(", "'🐯 it\\'s'", ",", " ", "name", ")"]);
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.string));
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let line = highlight_source_code("x = \"oops");
        assert_eq!(texts(&line), vec!["x", " ", "=", " ", "\"oops"]);
    }

    #[test]
    fn test_user_function_call() {
        let line = highlight_source_code("greet(name)");
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.function));
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.fg));
    }
}
