// Execution engine for the teaching-Python interpreter

use crate::capture::OutputCapture;
use crate::executor::ExecutionLimits;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{Stack, Value};
use crate::parser::ast::{Program, SourceLocation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// The wall clock is only consulted every this many steps
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// How a statement finished
#[derive(Debug)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// The interpreter state for one program run
pub struct Interpreter {
    /// Globals and call frames
    pub(crate) stack: Stack,

    /// Everything `print` wrote during this run
    pub(crate) output: OutputCapture,

    /// Source of randomness for the `random` module
    pub(crate) rng: StdRng,

    pub(crate) limits: ExecutionLimits,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    steps: Cell<u64>,
    started: Instant,
}

impl Interpreter {
    pub fn new(limits: ExecutionLimits) -> Self {
        let seed = limits.random_seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        Interpreter {
            stack: Stack::new(),
            output: OutputCapture::new(limits.max_output_bytes),
            rng: StdRng::seed_from_u64(seed),
            limits,
            current_location: SourceLocation::new(1, 1),
            steps: Cell::new(0),
            started: Instant::now(),
        }
    }

    /// Run the program from start to finish
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.started = Instant::now();
        let result = self.execute_block(&program.body).map(|_| ());
        self.stack.clear();
        result
    }

    /// Output captured so far
    pub fn output(&self) -> &str {
        self.output.as_str()
    }

    /// Consume the interpreter, keeping only the captured output
    pub fn into_output(self) -> String {
        self.output.into_string()
    }

    /// Steps executed so far
    pub fn steps(&self) -> u64 {
        self.steps.get()
    }

    /// Count one unit of work and enforce the step and time budgets
    pub(crate) fn tick(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.current_location = location;
        self.charge(1, location)
    }

    /// Count `units` of work done inside a single operation, such as a
    /// built-in walking every item of a sequence
    pub(crate) fn charge(&self, units: usize, location: SourceLocation) -> Result<(), RuntimeError> {
        let before = self.steps.get();
        let steps = before.saturating_add(units as u64);
        self.steps.set(steps);

        if steps > self.limits.max_steps {
            return Err(RuntimeError::Timeout {
                message: format!(
                    "program ran for too long (more than {} steps)",
                    self.limits.max_steps
                ),
                location,
            });
        }

        // Consult the clock whenever this charge crosses an interval boundary
        if steps / CLOCK_CHECK_INTERVAL != before / CLOCK_CHECK_INTERVAL
            && self.started.elapsed() > self.limits.time_limit
        {
            return Err(RuntimeError::Timeout {
                message: format!(
                    "program ran for too long (more than {:.1} seconds)",
                    self.limits.time_limit.as_secs_f64()
                ),
                location,
            });
        }

        Ok(())
    }

    /// Append text to the captured output
    pub(crate) fn write_output(&mut self, text: &str, location: SourceLocation) -> Result<(), RuntimeError> {
        self.output
            .write(text)
            .map_err(|err| RuntimeError::out_of_memory(err.to_string(), location))
    }

    /// Refuse to build sequences longer than the configured budget
    pub(crate) fn check_sequence_len(&self, len: usize, location: SourceLocation) -> Result<(), RuntimeError> {
        if len > self.limits.max_sequence_len {
            return Err(RuntimeError::out_of_memory(
                format!(
                    "that would make something with {} items, the limit is {}",
                    len, self.limits.max_sequence_len
                ),
                location,
            ));
        }
        Ok(())
    }

    /// Turn a repr/equality depth overflow into Python's RecursionError
    pub(crate) fn too_deep(&self, location: SourceLocation) -> RuntimeError {
        RuntimeError::recursion(
            "maximum recursion depth exceeded while getting the repr of an object",
            location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    fn run(source: &str) -> (String, Result<(), RuntimeError>) {
        let program = parse_program(source, 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default().with_random_seed(7));
        let result = interp.run(&program);
        (interp.into_output(), result)
    }

    #[test]
    fn test_print_and_arithmetic() {
        let (out, result) = run("x = 6\ny = 7\nprint(x * y)\n");
        assert!(result.is_ok());
        assert_eq!(out, "42\n");
    }

    #[test]
    fn test_step_budget() {
        let program = parse_program("while True:\n    pass\n", 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default().with_max_steps(500));
        let err = interp.run(&program).unwrap_err();

        assert_eq!(err.exception_name(), "TimeoutError");
        assert!(interp.steps() > 500);
    }

    #[test]
    fn test_output_budget() {
        let program = parse_program("while True:\n    print('spam')\n", 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default().with_max_output_bytes(50));
        let err = interp.run(&program).unwrap_err();

        assert_eq!(err.exception_name(), "MemoryError");
        assert_eq!(interp.output(), "spam\n".repeat(10));
    }

    #[test]
    fn test_builtin_work_counts_against_step_budget() {
        let program = parse_program("total = sum(range(5000))\n", 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default().with_max_steps(1000));
        let err = interp.run(&program).unwrap_err();

        assert_eq!(err.exception_name(), "TimeoutError");
    }

    #[test]
    fn test_large_charge_checks_the_clock() {
        let interp = Interpreter::new(
            ExecutionLimits::default().with_time_limit(std::time::Duration::ZERO),
        );
        std::thread::sleep(std::time::Duration::from_millis(2));
        let err = interp.charge(5000, SourceLocation::new(3, 1)).unwrap_err();

        assert_eq!(err.exception_name(), "TimeoutError");
        assert!(err.raw_message().contains("seconds"));
    }
}
