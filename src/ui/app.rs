//! Main TUI application state and logic

use crate::challenges::{
    achievements, Attempt, Challenge, ChallengeRunner, InMemoryProgress, ProgressStore,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Progress in the playground belongs to a single local learner
const LEARNER: &str = "player";

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Challenge,
    Source,
    Output,
    Feedback,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: challenge -> source -> output -> feedback)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Challenge => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Feedback,
            FocusedPane::Feedback => FocusedPane::Challenge,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Challenge => FocusedPane::Feedback,
            FocusedPane::Source => FocusedPane::Challenge,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Feedback => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    runner: ChallengeRunner,
    progress: InMemoryProgress,

    /// Index of the current item in the registry
    pub current: usize,

    /// The program shown in the source pane and run on `r`
    pub source_code: String,

    /// File the source is reloaded from before every run
    pub source_path: Option<PathBuf>,

    /// Result of the last run of `source_code`
    pub last_attempt: Option<Attempt>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub challenge_scroll: usize,
    pub source_scroll: usize,
    pub output_scroll: usize,
    pub feedback_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether the status message reports a problem
    pub status_is_error: bool,
}

impl App {
    /// Start at item `current`. Without a `source_path` the item's starter code is loaded.
    pub fn new(runner: ChallengeRunner, current: usize, source_path: Option<PathBuf>) -> Self {
        let mut app = App {
            runner,
            progress: InMemoryProgress::new(),
            current,
            source_code: String::new(),
            source_path,
            last_attempt: None,
            focused_pane: FocusedPane::Source,
            challenge_scroll: 0,
            source_scroll: 0,
            output_scroll: 0,
            feedback_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready! Press r to run."),
            status_is_error: false,
        };
        if app.source_path.is_some() {
            app.reload_source();
        } else {
            app.load_starter();
        }
        app
    }

    pub fn current_challenge(&self) -> Option<&Challenge> {
        self.runner.registry().get_index(self.current)
    }

    pub fn progress(&self) -> &InMemoryProgress {
        &self.progress
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(main_chunks[0]);

        // Left column: Challenge (top) | Feedback (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0]);

        // Right column: Source (top) | Output (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let registry = self.runner.registry();
        let challenge = registry.get_index(self.current);

        if let Some(challenge) = challenge {
            let completed = self
                .progress
                .is_completed(LEARNER, &challenge.id)
                .unwrap_or(false);
            super::panes::render_challenge_pane(
                frame,
                left_rows[0],
                challenge,
                self.current + 1,
                registry.len(),
                completed,
                self.focused_pane == FocusedPane::Challenge,
                &mut self.challenge_scroll,
            );
        }

        super::panes::render_feedback_pane(
            frame,
            left_rows[1],
            self.last_attempt.as_ref(),
            challenge.map_or("", |c| c.hint.as_str()),
            self.focused_pane == FocusedPane::Feedback,
            &mut self.feedback_scroll,
        );

        let source_title = match &self.source_path {
            Some(path) => format!(" {} ", path.display()),
            None => String::from(" Your Code "),
        };
        let error_line = self
            .last_attempt
            .as_ref()
            .and_then(|attempt| attempt.result.failure.as_ref())
            .and_then(|failure| failure.line);
        super::panes::render_source_pane(
            frame,
            right_rows[0],
            &self.source_code,
            &source_title,
            error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_output_pane(
            frame,
            right_rows[1],
            self.last_attempt
                .as_ref()
                .map(|attempt| attempt.result.captured_output.as_str()),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        let points = self.progress.points(LEARNER).unwrap_or(0);
        let earned = achievements(&self.progress, registry, LEARNER).map_or(0, |a| a.len());
        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            points,
            earned,
            self.status_is_error,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.source_path.is_some() && !self.reload_source() {
                    return;
                }
                self.run_source();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.show_solution();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                if self.current > 0 {
                    self.select(self.current - 1);
                }
            }
            KeyCode::Right => {
                if self.current + 1 < self.runner.registry().len() {
                    self.select(self.current + 1);
                }
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Challenge => &mut self.challenge_scroll,
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Output => &mut self.output_scroll,
            FocusedPane::Feedback => &mut self.feedback_scroll,
        }
    }

    /// Move to another item. A loaded file stays in the source pane.
    fn select(&mut self, index: usize) {
        self.current = index;
        self.last_attempt = None;
        self.challenge_scroll = 0;
        self.output_scroll = 0;
        self.feedback_scroll = 0;
        if self.source_path.is_none() {
            self.load_starter();
        }
        if let Some(challenge) = self.current_challenge() {
            self.status_message = format!("{}: {}", challenge.kind, challenge.title);
            self.status_is_error = false;
        }
    }

    fn load_starter(&mut self) {
        self.source_code = self
            .current_challenge()
            .map(|challenge| challenge.starter_source.clone())
            .unwrap_or_default();
        self.source_scroll = 0;
    }

    fn show_solution(&mut self) {
        let Some(solution) = self.current_challenge().map(|c| c.solution.clone()) else {
            return;
        };
        self.source_code = solution;
        self.source_scroll = 0;
        self.last_attempt = None;
        self.status_message = String::from("Here is one way to solve it. Press r to run it!");
        self.status_is_error = false;
    }

    /// Re-read `source_path`; false (with a status message) when it cannot be read
    fn reload_source(&mut self) -> bool {
        let Some(path) = &self.source_path else {
            return false;
        };
        match fs::read_to_string(path) {
            Ok(source) => {
                self.source_code = source;
                true
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                self.status_message = format!("Cannot read {}: {}", path.display(), e);
                self.status_is_error = true;
                false
            }
        }
    }

    /// Execute the source against the current item and record the outcome
    fn run_source(&mut self) {
        let Some(id) = self.current_challenge().map(|c| c.id.clone()) else {
            return;
        };

        match self
            .runner
            .attempt_and_record(&mut self.progress, LEARNER, &id, &self.source_code)
        {
            Ok(recorded) => {
                let attempt = recorded.attempt;
                let (message, is_error) = match &attempt.result.failure {
                    Some(failure) => {
                        if let Some(line) = failure.line {
                            self.source_scroll = line.saturating_sub(3);
                        }
                        (format!("Oops! {}", failure.exception), true)
                    }
                    None if recorded.newly_completed => {
                        (format!("Solved! +{} points", recorded.points_awarded), false)
                    }
                    None if attempt.solved() => (String::from("Solved again!"), false),
                    None => (String::from("Not quite yet"), false),
                };
                self.status_message = message;
                self.status_is_error = is_error;
                self.output_scroll = usize::MAX;
                self.feedback_scroll = 0;
                self.last_attempt = Some(attempt);
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                self.status_is_error = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenges::catalog;
    use crate::executor::Executor;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(ChallengeRunner::new(Executor::default(), catalog()), 0, None)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_focus_cycles() {
        let mut pane = FocusedPane::Challenge;
        for _ in 0..4 {
            assert_eq!(pane.next().prev(), pane);
            pane = pane.next();
        }
        assert_eq!(pane, FocusedPane::Challenge);
    }

    #[test]
    fn test_navigation_loads_starter_code() {
        let mut app = app();
        assert_eq!(app.current_challenge().unwrap().id, "meet-python");

        press(&mut app, KeyCode::Left);
        assert_eq!(app.current, 0);

        press(&mut app, KeyCode::Right);
        let challenge = app.current_challenge().unwrap();
        assert_eq!(challenge.id, "numbers-and-math");
        assert_eq!(app.source_code, challenge.starter_source);
    }

    #[test]
    fn test_run_and_award_points() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        let attempt = app.last_attempt.as_ref().unwrap();
        assert!(attempt.solved());
        assert_eq!(app.progress().points(LEARNER), Ok(5));
        assert_eq!(app.status_message, "Solved! +5 points");

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.progress().points(LEARNER), Ok(5));
    }

    #[test]
    fn test_solution_replaces_source() {
        let mut app = app();
        let last = app.runner.registry().len() - 1;
        for _ in 0..last {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.last_attempt.as_ref().unwrap().solved());

        press(&mut app, KeyCode::Char('s'));
        assert!(app.last_attempt.is_none());
        press(&mut app, KeyCode::Char('r'));
        assert!(app.last_attempt.as_ref().unwrap().solved());
    }

    #[test]
    fn test_failure_is_reported() {
        let mut app = app();
        app.source_code = String::from("print('hi')\nprint(5 / 0)\n");
        press(&mut app, KeyCode::Char('r'));
        assert!(app.status_is_error);
        assert_eq!(app.status_message, "Oops! ZeroDivisionError");
        let attempt = app.last_attempt.as_ref().unwrap();
        assert_eq!(attempt.result.captured_output, "hi\n");
        assert_eq!(attempt.outcome, None);
    }

    #[test]
    fn test_missing_file_is_not_run() {
        let mut app = App::new(
            ChallengeRunner::new(Executor::default(), catalog()),
            0,
            Some(PathBuf::from("/definitely/not/here.py")),
        );
        assert!(app.status_is_error);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.last_attempt.is_none());
    }

    #[test]
    fn test_renders_every_pane() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'));
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        for title in ["Tutorial 1/", "Your Code", "Output", "Feedback", "quit"] {
            assert!(text.contains(title), "missing {title}");
        }

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
