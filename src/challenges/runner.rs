// Run a learner's submission against one exercise

use super::progress::{ProgressError, ProgressStore};
use super::registry::Registry;
use crate::executor::{ExecutionResult, Executor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    #[error("no tutorial or challenge with id '{0}'")]
    UnknownChallenge(String),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// One run of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub result: ExecutionResult,
    /// The validator's verdict; `None` when the run failed and it was never asked
    pub outcome: Option<bool>,
}

impl Attempt {
    pub fn solved(&self) -> bool {
        self.outcome == Some(true)
    }
}

/// An attempt whose success was recorded in a [`ProgressStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAttempt {
    pub attempt: Attempt,
    /// True only the first time this learner solves the item
    pub newly_completed: bool,
    pub points_awarded: u32,
}

/// Executes submissions and judges them with the registry's validators
#[derive(Debug)]
pub struct ChallengeRunner {
    executor: Executor,
    registry: Registry,
}

impl ChallengeRunner {
    pub fn new(executor: Executor, registry: Registry) -> Self {
        ChallengeRunner { executor, registry }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Execute `source` and, only if it ran without a failure, validate it
    #[tracing::instrument(skip(self, source))]
    pub fn attempt(&self, id: &str, source: &str) -> Result<Attempt, RunnerError> {
        let challenge = self
            .registry
            .get(id)
            .ok_or_else(|| RunnerError::UnknownChallenge(id.to_string()))?;

        let result = self.executor.execute(source);
        let outcome = match &result.failure {
            Some(_) => None,
            None => Some(challenge.validate(source, &result.captured_output)),
        };
        tracing::debug!("Validation outcome: {:?}", outcome);

        Ok(Attempt { result, outcome })
    }

    /// [`attempt`](Self::attempt), then record a completion when solved
    pub fn attempt_and_record(
        &self,
        store: &mut dyn ProgressStore,
        learner: &str,
        id: &str,
        source: &str,
    ) -> Result<RecordedAttempt, RunnerError> {
        let attempt = self.attempt(id, source)?;
        if !attempt.solved() {
            return Ok(RecordedAttempt {
                attempt,
                newly_completed: false,
                points_awarded: 0,
            });
        }

        let points = self.registry.get(id).map_or(0, |challenge| challenge.points());
        let newly_completed = store.mark_completed(learner, id, points)?;
        if newly_completed {
            tracing::info!("{} completed {} (+{} points)", learner, id, points);
        }

        Ok(RecordedAttempt {
            attempt,
            newly_completed,
            points_awarded: if newly_completed { points } else { 0 },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenges::catalog;
    use crate::challenges::progress::InMemoryProgress;

    fn runner() -> ChallengeRunner {
        ChallengeRunner::new(Executor::default(), catalog())
    }

    #[test]
    fn test_solution_solves_and_starter_does_not() {
        let runner = runner();
        let challenge = runner.registry().get("secret-code").unwrap();

        let solved = runner.attempt("secret-code", &challenge.solution).unwrap();
        assert_eq!(solved.result.captured_output, "The secret code is: nohtyp00\n");
        assert!(solved.solved());

        let starter = runner.attempt("secret-code", &challenge.starter_source).unwrap();
        assert_eq!(starter.outcome, Some(false));
    }

    #[test]
    fn test_failed_run_is_never_validated() {
        let attempt = runner().attempt("math-magic", "print(30)\nprint(1 / 0)\n").unwrap();
        assert_eq!(attempt.result.captured_output, "30\n");
        assert!(attempt.result.failure.is_some());
        assert_eq!(attempt.outcome, None);
    }

    #[test]
    fn test_unknown_challenge() {
        assert_eq!(
            runner().attempt("nope", "print(1)\n"),
            Err(RunnerError::UnknownChallenge("nope".to_string()))
        );
    }

    #[test]
    fn test_points_are_recorded_once() {
        let runner = runner();
        let mut store = InMemoryProgress::new();
        let source = "print('Hello, tiger!')\n";

        let first = runner
            .attempt_and_record(&mut store, "ada", "hello-python", source)
            .unwrap();
        assert!(first.newly_completed);
        assert_eq!(first.points_awarded, 10);

        let again = runner
            .attempt_and_record(&mut store, "ada", "hello-python", source)
            .unwrap();
        assert!(again.attempt.solved());
        assert!(!again.newly_completed);
        assert_eq!(store.points("ada"), Ok(10));

        let wrong = runner
            .attempt_and_record(&mut store, "ada", "meet-python", "print('Hi')\n")
            .unwrap();
        assert!(!wrong.newly_completed);
        assert_eq!(store.points("ada"), Ok(10));
    }
}
