//! Learner progress
//!
//! [`ProgressStore`] is the narrow interface the runner records completions
//! through; a relational backend would implement it outside this crate.
//! [`InMemoryProgress`] backs the playground and the tests.
//!
//! Points are awarded once per item: completing something twice is a no-op.

use super::registry::Registry;
use super::ChallengeKind;
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("progress storage is unavailable: {0}")]
    Unavailable(String),
}

pub trait ProgressStore {
    fn is_completed(&self, learner: &str, item: &str) -> Result<bool, ProgressError>;

    /// Record a completion and award `points`; false when it was already completed
    fn mark_completed(&mut self, learner: &str, item: &str, points: u32) -> Result<bool, ProgressError>;

    fn points(&self, learner: &str) -> Result<u32, ProgressError>;

    /// Completed item ids, in completion order
    fn completed(&self, learner: &str) -> Result<Vec<String>, ProgressError>;
}

#[derive(Debug, Default, Clone)]
struct LearnerProgress {
    points: u32,
    completed: IndexSet<String>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProgress {
    learners: FxHashMap<String, LearnerProgress>,
}

impl InMemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for InMemoryProgress {
    fn is_completed(&self, learner: &str, item: &str) -> Result<bool, ProgressError> {
        Ok(self
            .learners
            .get(learner)
            .is_some_and(|progress| progress.completed.contains(item)))
    }

    fn mark_completed(&mut self, learner: &str, item: &str, points: u32) -> Result<bool, ProgressError> {
        let progress = self.learners.entry(learner.to_string()).or_default();
        if !progress.completed.insert(item.to_string()) {
            return Ok(false);
        }
        progress.points = progress.points.saturating_add(points);
        Ok(true)
    }

    fn points(&self, learner: &str) -> Result<u32, ProgressError> {
        Ok(self.learners.get(learner).map_or(0, |progress| progress.points))
    }

    fn completed(&self, learner: &str) -> Result<Vec<String>, ProgressError> {
        Ok(self
            .learners
            .get(learner)
            .map(|progress| progress.completed.iter().cloned().collect())
            .unwrap_or_default())
    }
}

/// Milestones shown next to a learner's points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    FirstTutorial,
    FirstChallenge,
    FiftyPoints,
    TutorialMaster,
    ChallengeChampion,
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Achievement::FirstTutorial => "🎓 First Tutorial Completed!",
            Achievement::FirstChallenge => "🏅 First Challenge Solved!",
            Achievement::FiftyPoints => "⭐ Earned 50+ Points!",
            Achievement::TutorialMaster => "📚 Tutorial Master: Completed all tutorials!",
            Achievement::ChallengeChampion => "🏆 Challenge Champion: Solved all challenges!",
        };
        f.write_str(text)
    }
}

/// Achievements earned by `learner` against the items in `registry`
pub fn achievements(
    store: &dyn ProgressStore,
    registry: &Registry,
    learner: &str,
) -> Result<Vec<Achievement>, ProgressError> {
    let completed = store.completed(learner)?;
    let count = |kind: ChallengeKind| {
        completed
            .iter()
            .filter(|id| registry.get(id).is_some_and(|item| item.kind == kind))
            .count()
    };
    let tutorials = count(ChallengeKind::Tutorial);
    let challenges = count(ChallengeKind::Challenge);
    let total_tutorials = registry.count_of_kind(ChallengeKind::Tutorial);
    let total_challenges = registry.count_of_kind(ChallengeKind::Challenge);

    let mut earned = Vec::new();
    if tutorials >= 1 {
        earned.push(Achievement::FirstTutorial);
    }
    if challenges >= 1 {
        earned.push(Achievement::FirstChallenge);
    }
    if store.points(learner)? >= 50 {
        earned.push(Achievement::FiftyPoints);
    }
    if total_tutorials > 0 && tutorials >= total_tutorials {
        earned.push(Achievement::TutorialMaster);
    }
    if total_challenges > 0 && challenges >= total_challenges {
        earned.push(Achievement::ChallengeChampion);
    }
    Ok(earned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenges::catalog;

    #[test]
    fn test_points_are_awarded_once() {
        let mut store = InMemoryProgress::new();
        assert_eq!(store.mark_completed("ada", "loops", 5), Ok(true));
        assert_eq!(store.mark_completed("ada", "loops", 5), Ok(false));
        assert_eq!(store.mark_completed("ada", "math-magic", 10), Ok(true));

        assert_eq!(store.points("ada"), Ok(15));
        assert_eq!(store.is_completed("ada", "loops"), Ok(true));
        assert_eq!(store.completed("ada"), Ok(vec!["loops".to_string(), "math-magic".to_string()]));
    }

    #[test]
    fn test_learners_are_independent() {
        let mut store = InMemoryProgress::new();
        store.mark_completed("ada", "loops", 5).unwrap();
        assert_eq!(store.points("grace"), Ok(0));
        assert_eq!(store.is_completed("grace", "loops"), Ok(false));
        assert!(store.completed("grace").unwrap().is_empty());
    }

    #[test]
    fn test_achievements() {
        let registry = catalog();
        let mut store = InMemoryProgress::new();
        assert!(achievements(&store, &registry, "ada").unwrap().is_empty());

        store.mark_completed("ada", "meet-python", 5).unwrap();
        assert_eq!(
            achievements(&store, &registry, "ada").unwrap(),
            vec![Achievement::FirstTutorial]
        );

        for item in registry.of_kind(ChallengeKind::Challenge) {
            store.mark_completed("ada", &item.id, item.points()).unwrap();
        }
        assert_eq!(
            achievements(&store, &registry, "ada").unwrap(),
            vec![
                Achievement::FirstTutorial,
                Achievement::FirstChallenge,
                Achievement::FiftyPoints,
                Achievement::ChallengeChampion,
            ]
        );
        assert_eq!(Achievement::FiftyPoints.to_string(), "⭐ Earned 50+ Points!");
    }
}
