//! Operators and name/target handling, each adding `impl Interpreter` methods
//!
//! - [`access`]: subscripts and slices
//! - [`assign`]: name lookup, assignment targets, `del`
//! - [`binary`]: arithmetic and sequence operators
//! - [`compare`]: comparisons and membership
//! - [`unary`]: `-x`, `+x`, `not x`

pub mod access;
pub mod assign;
pub mod binary;
pub mod compare;
pub mod unary;
