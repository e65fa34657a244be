//! Teaching-Python source code parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens, including INDENT/DEDENT)
//! - [`parse`]: Parser struct, error type and helpers
//! - `statements` / `expressions`: the recursive descent grammar
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! - Statements: assignment (chained, tuple, subscript targets), augmented
//!   assignment, `if`/`elif`/`else`, `while`, `for`, `def`, `return`, `break`,
//!   `continue`, `pass`, `global`, `import`, `from ... import`, `assert`, `del`
//! - Expressions: arithmetic, comparisons (chained), boolean logic,
//!   conditional expressions, list comprehensions, calls with keyword
//!   arguments, subscripts and slices, attributes, f-strings
//! - `class`, `try`, `lambda`, `with`, `yield` and friends are rejected with a
//!   syntax error explaining that the playground doesn't support them
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{ParseError, Parser};

/// Parse a whole program with the given nesting limit
pub fn parse_program(source: &str, max_nesting: usize) -> Result<ast::Program, ParseError> {
    Parser::with_max_nesting(source, max_nesting)?.parse_program()
}
