//! Terminal playground built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, running and recording attempts
//! - **[`panes`]**: render functions for each visible pane (challenge, source,
//!   output, feedback, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`ChallengeRunner`] and call [`App::run`] to start the event loop.
//!
//! [`ChallengeRunner`]: crate::challenges::ChallengeRunner
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
