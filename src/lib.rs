//! # Introduction
//!
//! KidCode runs small teaching-Python programs written by children, captures
//! everything they print, turns any fault into a sentence a child can act on,
//! and judges submissions against tutorials and challenges. A terminal
//! playground built with [ratatui](https://docs.rs/ratatui) sits on top.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → ExecutionResult → Validator
//! ```
//!
//! 1. [`parser`]: tokenises the source (with INDENT/DEDENT) and builds an AST.
//! 2. [`interpreter`]: walks the AST under step, time, depth and size budgets.
//! 3. [`memory`]: runtime [`memory::Value`]s and the name [`memory::Stack`].
//! 4. [`capture`]: the per-run output sink that stands in for stdout.
//! 5. [`executor`]: [`execute`] and [`Executor`], which never fail and return
//!    an [`ExecutionResult`].
//! 6. [`diagnostics`]: [`translate`] / [`translate_fault`], the kid-friendly
//!    messages.
//! 7. [`challenges`]: validators, the built-in catalog, the runner and progress.
//! 8. [`ui`]: the playground; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let result = kidcode::execute("print('Hello, tiger!')");
//! assert_eq!(result.captured_output, "Hello, tiger!\n");
//! assert!(result.failure.is_none());
//!
//! let result = kidcode::execute("print(5/0)");
//! assert_eq!(result.captured_output, "");
//! assert!(result
//!     .friendly_message()
//!     .is_some_and(|message| message.contains("can't divide by zero")));
//! ```

pub mod capture;
pub mod challenges;
pub mod config;
pub mod diagnostics;
pub mod executor;
pub mod interpreter;
pub mod logging;
pub mod memory;
pub mod parser;
pub mod ui;

pub use diagnostics::{translate, translate_fault, FaultCategory};
pub use executor::{execute, ExecutionLimits, ExecutionResult, Executor, FailureInfo};
