//! Tutorials, challenges and their validation
//!
//! - [`validator`]: the [`Validator`] capability trait and reusable predicates
//! - [`registry`]: id → [`Challenge`] lookup, in catalog order
//! - [`catalog`]: the built-in tutorials and challenges
//! - [`runner`]: execute a submission and validate it only when it ran cleanly
//! - [`progress`]: the narrow persistence interface for completions and points

pub mod catalog;
pub mod progress;
pub mod registry;
pub mod runner;
pub mod validator;

pub use catalog::catalog;
pub use progress::{achievements, Achievement, InMemoryProgress, ProgressError, ProgressStore};
pub use registry::{Registry, RegistryError};
pub use runner::{Attempt, ChallengeRunner, RecordedAttempt, RunnerError};
pub use validator::Validator;

use std::fmt;

/// Whether an item is a tutorial or a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChallengeKind {
    Tutorial,
    Challenge,
}

impl ChallengeKind {
    /// Points awarded the first time an item of this kind is completed
    pub fn points(self) -> u32 {
        match self {
            ChallengeKind::Tutorial => 5,
            ChallengeKind::Challenge => 10,
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeKind::Tutorial => f.write_str("Tutorial"),
            ChallengeKind::Challenge => f.write_str("Challenge"),
        }
    }
}

/// One exercise: what to show the learner and how to judge their answer
pub struct Challenge {
    pub id: String,
    pub kind: ChallengeKind,
    pub title: String,
    pub emoji: String,
    pub description: String,
    pub hint: String,
    pub starter_source: String,
    pub solution: String,
    pub validator: Box<dyn Validator>,
}

impl Challenge {
    pub fn points(&self) -> u32 {
        self.kind.points()
    }

    /// Judge a failure-free run
    pub fn validate(&self, source: &str, output: &str) -> bool {
        self.validator.evaluate(source, output)
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Challenge")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
