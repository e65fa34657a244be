// Integration tests for the tutorial/challenge catalog and the runner

use kidcode::challenges::validator::OutputContains;
use kidcode::challenges::{
    achievements, catalog, Achievement, ChallengeKind, ChallengeRunner, InMemoryProgress,
    ProgressStore, Validator,
};
use kidcode::{ExecutionLimits, Executor};
use pretty_assertions::assert_eq;

fn runner() -> ChallengeRunner {
    ChallengeRunner::new(
        Executor::new(ExecutionLimits::default().with_random_seed(1)),
        catalog(),
    )
}

#[test]
fn test_every_solution_solves_its_item() {
    let runner = runner();
    for item in runner.registry().iter() {
        let attempt = runner.attempt(&item.id, &item.solution).unwrap();
        assert_eq!(attempt.result.failure, None, "solution for {} failed", item.id);
        assert!(attempt.solved(), "solution for {} was rejected", item.id);
    }
}

#[test]
fn test_challenge_starters_run_but_do_not_solve() {
    let runner = runner();
    for item in runner.registry().of_kind(ChallengeKind::Challenge) {
        let attempt = runner.attempt(&item.id, &item.starter_source).unwrap();
        assert!(attempt.result.is_success(), "starter for {} crashed", item.id);
        assert_eq!(attempt.outcome, Some(false), "starter for {} solved it", item.id);
    }
}

#[test]
fn test_tutorial_examples_run_as_shown() {
    let runner = runner();
    for item in runner.registry().of_kind(ChallengeKind::Tutorial) {
        let attempt = runner.attempt(&item.id, &item.starter_source).unwrap();
        assert!(attempt.solved(), "tutorial {} example is wrong", item.id);
    }
}

#[test]
fn test_validator_is_gated_on_success() {
    let runner = runner();

    // Would satisfy the predicate, but the run fails afterwards
    let attempt = runner
        .attempt("math-magic", "print(30)\nprint(undefined_var)\n")
        .unwrap();
    assert_eq!(attempt.result.captured_output, "30\n");
    assert_eq!(attempt.outcome, None);
    assert!(!attempt.solved());

    let attempt = runner.attempt("math-magic", "print(3 * 4 + 2 * 4 + 5 * 2)\n").unwrap();
    assert_eq!(attempt.outcome, Some(true));
}

#[test]
fn test_validators_are_pure() {
    let registry = catalog();
    let output = "Hooray! You found the treasure! 💰\n";
    let item = registry.get("treasure-hunt").unwrap();

    let first = item.validate("x = 5", output);
    for _ in 0..5 {
        assert_eq!(item.validate("x = 5", output), first);
    }
    assert!(first);
}

#[test]
fn test_closures_are_validators() {
    let says_hi = |_: &str, output: &str| output.starts_with("hi");
    assert!(says_hi.evaluate("", "hi there"));
    assert!(OutputContains::new("there").evaluate("", "hi there"));
}

#[test]
fn test_progress_and_achievements() {
    let runner = runner();
    let mut store = InMemoryProgress::new();

    for item in runner.registry().of_kind(ChallengeKind::Tutorial) {
        let recorded = runner
            .attempt_and_record(&mut store, "sam", &item.id, &item.solution)
            .unwrap();
        assert!(recorded.newly_completed);
        assert_eq!(recorded.points_awarded, 5);
    }
    assert_eq!(store.points("sam"), Ok(35));

    let earned = achievements(&store, runner.registry(), "sam").unwrap();
    assert_eq!(earned, vec![Achievement::FirstTutorial, Achievement::TutorialMaster]);

    let hello = runner.registry().get("hello-python").unwrap();
    runner
        .attempt_and_record(&mut store, "sam", "hello-python", &hello.solution)
        .unwrap();
    assert_eq!(store.points("sam"), Ok(45));

    let math = runner.registry().get("math-magic").unwrap();
    runner
        .attempt_and_record(&mut store, "sam", "math-magic", &math.solution)
        .unwrap();
    let earned = achievements(&store, runner.registry(), "sam").unwrap();
    assert!(earned.contains(&Achievement::FiftyPoints));
    assert!(!earned.contains(&Achievement::ChallengeChampion));
}
