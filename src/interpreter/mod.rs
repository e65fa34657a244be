//! Teaching-Python execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter state, step and time budgets
//! - [`errors`]: Runtime error types, one per Python exception class
//! - `statements` / `loops` / `expressions` / `calls`: the tree walker
//! - `ops`: operator semantics (arithmetic, comparison, subscripts, assignment)
//! - `builtins` / `methods` / `modules`: the standard library kids can reach
//! - `format`: format specs, `str.format` and `%` formatting
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Every statement, loop iteration
//! and call counts as one step against the run's budget, and the wall clock
//! is sampled every so often so a runaway program ends as a timeout instead
//! of hanging the host.
//!
//! # Integers
//!
//! Integers are `i64`. Results that don't fit raise `OverflowError` rather
//! than silently wrapping.

mod builtins;
mod calls;
pub mod engine;
pub mod errors;
mod expressions;
mod format;
mod loops;
mod methods;
mod modules;
mod ops;
mod statements;

pub use engine::Interpreter;
pub use errors::RuntimeError;
