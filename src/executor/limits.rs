//! Resource budgets for a single run
//!
//! Exhausting any budget ends the run with a failure instead of hanging or
//! crashing the host.

use std::time::Duration;

pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 10_000_000;
pub const DEFAULT_MAX_NESTING: usize = crate::parser::parse::DEFAULT_MAX_NESTING;
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Budgets applied to each call of [`crate::Executor::execute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionLimits {
    /// Statements, loop iterations and calls counted together (`TimeoutError`)
    pub max_steps: u64,
    /// Wall-clock budget, checked periodically (`TimeoutError`)
    pub time_limit: Duration,
    /// Nested function calls (`RecursionError`)
    pub max_call_depth: usize,
    /// Bytes of captured output (`MemoryError`)
    pub max_output_bytes: usize,
    /// Items in one list/tuple/string (`MemoryError`)
    pub max_sequence_len: usize,
    /// Bracket/block nesting accepted by the parser (`SyntaxError`)
    pub max_nesting: usize,
    /// Stack size of the worker thread that runs the interpreter
    pub stack_size: usize,
    /// Seed for the `random` module; `None` seeds from the clock
    pub random_seed: Option<u64>,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        ExecutionLimits {
            max_steps: DEFAULT_MAX_STEPS,
            time_limit: DEFAULT_TIME_LIMIT,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
            max_nesting: DEFAULT_MAX_NESTING,
            stack_size: DEFAULT_STACK_SIZE,
            random_seed: None,
        }
    }
}

impl ExecutionLimits {
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn with_max_output_bytes(mut self, max_output_bytes: usize) -> Self {
        self.max_output_bytes = max_output_bytes;
        self
    }

    pub fn with_max_sequence_len(mut self, max_sequence_len: usize) -> Self {
        self.max_sequence_len = max_sequence_len;
        self
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}
