//! Sandboxed execution of learner programs
//!
//! [`Executor::execute`] parses and runs a program on a dedicated worker
//! thread with a large stack and joins it before returning. Output goes to a
//! sink owned by that run's interpreter, so concurrent runs never share a
//! capture target and the host's stdout is never touched.
//!
//! Every fault (syntax, runtime, exhausted budget, or a panic inside the
//! engine) comes back as a [`FailureInfo`]; `execute` itself never fails.
//! Output printed before an engine panic is kept, and the panic is logged
//! through `tracing` instead of the default hook writing to stderr.

pub mod limits;
pub mod result;

pub use limits::ExecutionLimits;
pub use result::{ExecutionResult, ExecutionStats, FailureInfo};

use crate::interpreter::{Interpreter, RuntimeError};
use crate::parser::parse_program;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::thread;
use std::time::Instant;

/// Name of the worker thread every program runs on
const WORKER_NAME: &str = "kidcode-run";

/// What the worker thread hands back
struct RunOutcome {
    output: String,
    failure: Option<FailureInfo>,
    steps: u64,
}

/// Runs programs under a fixed set of [`ExecutionLimits`]
#[derive(Debug, Clone, Default)]
pub struct Executor {
    limits: ExecutionLimits,
}

impl Executor {
    pub fn new(limits: ExecutionLimits) -> Self {
        Executor { limits }
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Run `source` in a fresh environment and report what happened
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn execute(&self, source: &str) -> ExecutionResult {
        let started = Instant::now();
        let limits = &self.limits;
        install_panic_hook();

        let outcome = thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name(WORKER_NAME.to_string())
                .stack_size(limits.stack_size)
                .spawn_scoped(scope, || run_program(source, limits));

            match worker {
                Ok(handle) => handle.join().unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    tracing::error!("Interpreter panicked: {}", message);
                    RunOutcome {
                        output: String::new(),
                        failure: Some(FailureInfo::internal(&message)),
                        steps: 0,
                    }
                }),
                Err(err) => {
                    tracing::error!("Failed to start worker thread: {}", err);
                    RunOutcome {
                        output: String::new(),
                        failure: Some(FailureInfo::internal(&format!(
                            "could not start the program: {}",
                            err
                        ))),
                        steps: 0,
                    }
                }
            }
        });

        let stats = ExecutionStats {
            steps: outcome.steps,
            elapsed: started.elapsed(),
        };

        match &outcome.failure {
            Some(failure) => tracing::debug!(
                steps = stats.steps,
                line = failure.line,
                "Run failed: {}",
                failure.raw_message
            ),
            None => tracing::debug!(
                steps = stats.steps,
                output_bytes = outcome.output.len(),
                "Run finished in {:?}",
                stats.elapsed
            ),
        }

        ExecutionResult {
            captured_output: outcome.output,
            failure: outcome.failure,
            stats,
        }
    }
}

fn run_program(source: &str, limits: &ExecutionLimits) -> RunOutcome {
    let program = match parse_program(source, limits.max_nesting) {
        Ok(program) => program,
        Err(err) => {
            return RunOutcome {
                output: String::new(),
                failure: Some(FailureInfo::from_parse_error(&err)),
                steps: 0,
            }
        }
    };

    let mut interpreter = Interpreter::new(limits.clone());
    let failure = run_guarded(&mut interpreter, |interpreter| interpreter.run(&program));
    let steps = interpreter.steps();

    RunOutcome {
        output: interpreter.into_output(),
        failure,
        steps,
    }
}

/// Drive the interpreter, turning a panic inside the engine into an internal
/// failure while leaving the output captured so far in place
fn run_guarded<F>(interpreter: &mut Interpreter, run: F) -> Option<FailureInfo>
where
    F: FnOnce(&mut Interpreter) -> Result<(), RuntimeError>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| run(interpreter))) {
        Ok(result) => result.err().map(|err| FailureInfo::from_runtime_error(&err)),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("Interpreter panicked: {}", message);
            Some(FailureInfo::internal(&message))
        }
    }
}

/// Keep panics on worker threads off stderr; other threads keep the previous hook
fn install_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if thread::current().name() == Some(WORKER_NAME) {
                tracing::debug!("Worker panic: {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "the interpreter stopped unexpectedly".to_string()
    }
}

/// Run `source` with the default limits
pub fn execute(source: &str) -> ExecutionResult {
    Executor::default().execute(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FaultCategory;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_captures_output() {
        let result = execute("print('Hello, tiger!')\n");
        assert_eq!(result.captured_output, "Hello, tiger!\n");
        assert!(result.is_success());
        assert!(result.stats.steps > 0);
    }

    #[test]
    fn test_syntax_error_has_line() {
        let result = execute("x = 1\nprint(x\n");
        let failure = result.failure.unwrap();
        assert_eq!(failure.category, FaultCategory::SyntaxMalformed);
        assert_eq!(failure.exception, "SyntaxError");
        assert!(failure.line.is_some());
        assert!(failure.translated_message.ends_with("(SyntaxError)"));
    }

    #[test]
    fn test_partial_output_before_fault() {
        let result = execute("print('before')\nprint(1 / 0)\nprint('after')\n");
        assert_eq!(result.captured_output, "before\n");
        let failure = result.failure.unwrap();
        assert_eq!(failure.raw_message, "ZeroDivisionError: division by zero");
        assert_eq!(failure.line, Some(2));
    }

    #[test]
    fn test_engine_panic_keeps_partial_output() {
        use crate::parser::ast::SourceLocation;

        let mut interpreter = Interpreter::new(ExecutionLimits::default());
        let failure = run_guarded(&mut interpreter, |interp| {
            interp.write_output("before\n", SourceLocation::default())?;
            panic!("engine bug");
        })
        .unwrap();

        assert_eq!(failure.exception, "InternalError");
        assert_eq!(failure.raw_message, "InternalError: engine bug");
        assert_eq!(interpreter.into_output(), "before\n");
    }

    #[test]
    fn test_infinite_loop_times_out() {
        let executor = Executor::new(ExecutionLimits::default().with_max_steps(10_000));
        let result = executor.execute("while True:\n    pass\n");
        let failure = result.failure.unwrap();
        assert_eq!(failure.category, FaultCategory::Timeout);
        assert_eq!(failure.exception, "TimeoutError");
    }

    #[test]
    fn test_wall_clock_budget() {
        let executor = Executor::new(
            ExecutionLimits::default()
                .with_max_steps(u64::MAX)
                .with_time_limit(Duration::from_millis(50)),
        );
        let result = executor.execute("n = 0\nwhile True:\n    n += 1\n");
        assert_eq!(result.failure.unwrap().exception, "TimeoutError");
    }

    #[test]
    fn test_deep_recursion_is_a_recursion_error() {
        let result = execute("def f(n):\n    return f(n + 1)\nf(0)\n");
        let failure = result.failure.unwrap();
        assert_eq!(failure.exception, "RecursionError");
        assert!(failure.translated_message.starts_with("Oops! Something went wrong:"));
    }

    #[test]
    fn test_executor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Executor>();

        let executor = Executor::default();
        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let executor = &executor;
                    scope.spawn(move || executor.execute(&format!("print({})\n", i)))
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap().captured_output, format!("{}\n", i));
            }
        });
    }
}
