//! Runtime memory for the interpreter
//!
//! This module provides the core runtime abstractions:
//! - [`value`]: Runtime value representation (numbers, strings, containers, callables)
//! - [`stack`]: Globals, call frames and Python's local/global name resolution

pub mod stack;
pub mod value;

pub use stack::{Lookup, Stack, StackFrame};
pub use value::{DictRef, Key, ListRef, RangeValue, TupleRef, Value};
