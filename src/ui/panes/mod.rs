//! TUI pane rendering modules
//!
//! Each visual pane of the playground lives in its own module:
//!
//! - [`challenge`]: title, description and hint of the current item
//! - [`source`]: the learner's program with Python highlighting and the failing line marked
//! - [`output`]: everything the last run printed
//! - [`feedback`]: the friendly diagnostic or the validation verdict
//! - [`status`]: status bar with points, achievements and keybindings
//!
//! Every module exports a `render_*` function taking the frame, its area,
//! borrowed state and a scroll offset that the function clamps in place.

pub mod challenge;
pub mod feedback;
pub mod output;
pub mod source;
pub mod status;

pub use challenge::render_challenge_pane;
pub use feedback::render_feedback_pane;
pub use output::render_output_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

/// Bordered block whose border is highlighted when the pane has focus
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(DEFAULT_THEME.border(is_focused))
}

/// Rows available inside a bordered pane, at least one
pub(crate) fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp `offset` so the last page stays full; zero when everything fits
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = usize::MAX;
        clamp_scroll(&mut offset, 30, 10);
        assert_eq!(offset, 20);

        let mut offset = 5;
        clamp_scroll(&mut offset, 3, 10);
        assert_eq!(offset, 0);

        let mut offset = 4;
        clamp_scroll(&mut offset, 30, 10);
        assert_eq!(offset, 4);
    }
}
