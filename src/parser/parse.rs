//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, nesting guard and coordination
//! - `statements`: Parsing statements and indented blocks (`if`, `def`, `for`, ...)
//! - `expressions`: Parsing expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::diagnostics::FaultCategory;
use crate::parser::lexer::{LexError, Lexer, SyntaxErrorKind, Token, TokenKind};
use thiserror::Error;

/// Default limit for parenthesis / block nesting
pub const DEFAULT_MAX_NESTING: usize = 100;

/// Deepest expression tree the parser builds, counting operator chains as
/// well as brackets
pub const MAX_EXPRESSION_DEPTH: usize = 1000;

/// Parser error type
#[derive(Debug, Clone, Error)]
#[error("{message} (line {})", location.line)]
pub struct ParseError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: SyntaxErrorKind::Syntax,
            message: message.into(),
            location,
        }
    }

    pub(crate) fn indentation(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: SyntaxErrorKind::Indentation,
            message: message.into(),
            location,
        }
    }

    /// Python's exception name for this error
    pub fn exception_name(&self) -> &'static str {
        match self.kind {
            SyntaxErrorKind::Syntax => "SyntaxError",
            SyntaxErrorKind::Indentation => "IndentationError",
        }
    }

    pub fn category(&self) -> FaultCategory {
        match self.kind {
            SyntaxErrorKind::Syntax => FaultCategory::SyntaxMalformed,
            SyntaxErrorKind::Indentation => FaultCategory::IndentationMalformed,
        }
    }

    /// `"SyntaxError: <message> (line N)"`
    pub fn raw_message(&self) -> String {
        format!("{}: {}", self.exception_name(), self)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            kind: err.kind,
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for the teaching-Python subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) nesting: usize,
    pub(crate) max_nesting: usize,
    pub(crate) depth: usize,
    pub(crate) loop_depth: usize,
    pub(crate) function_depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_max_nesting(source, DEFAULT_MAX_NESTING)
    }

    pub fn with_max_nesting(source: &str, max_nesting: usize) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            nesting: 0,
            max_nesting,
            depth: 0,
            loop_depth: 0,
            function_depth: 0,
        })
    }

    /// Parser for an f-string field, continuing the nesting count of `self`
    pub(crate) fn sub_parser(
        &self,
        source: &str,
        origin: SourceLocation,
    ) -> Result<Self, ParseError> {
        let mut lexer = Lexer::with_origin(source.trim(), origin);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            nesting: self.nesting,
            max_nesting: self.max_nesting,
            depth: self.depth,
            loop_depth: 0,
            function_depth: 0,
        })
    }

    /// Parse the entire program (module body)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            if self.match_token(&TokenKind::Newline) {
                continue;
            }
            self.parse_statement(&mut program.body)?;
        }

        Ok(program)
    }

    // ===== Nesting guard =====

    pub(crate) fn enter_nested(&mut self, message: &str) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > self.max_nesting {
            return Err(ParseError::syntax(message, self.current_location()));
        }
        self.deepen(1)
    }

    pub(crate) fn leave_nested(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Count one more operator in a left-associative chain
    pub(crate) fn extend_chain(&mut self, links: &mut usize) -> Result<(), ParseError> {
        *links += 1;
        self.deepen(1)
    }

    /// Close a chain opened with [`Parser::extend_chain`]
    pub(crate) fn end_chain(&mut self, links: usize) {
        self.depth = self.depth.saturating_sub(links);
    }

    fn deepen(&mut self, levels: usize) -> Result<(), ParseError> {
        self.depth += levels;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(ParseError::syntax(
                "expression too complex",
                self.current_location(),
            ));
        }
        Ok(())
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_ahead(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_ahead(n)
            .is_some_and(|t| std::mem::discriminant(&t.kind) == std::mem::discriminant(kind))
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.position.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// True when the current token ends a simple statement
    pub(crate) fn at_statement_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        )
    }

    pub(crate) fn expect_token(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::syntax(message, self.current_location()))
        }
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Error for the current token; reserved words get a friendlier message
    pub(crate) fn unexpected(&self, fallback: &str) -> ParseError {
        let loc = self.current_location();
        match self.peek_kind() {
            TokenKind::Reserved(word) => Self::unsupported(word, loc),
            TokenKind::Indent => ParseError::indentation("unexpected indent", loc),
            _ => ParseError::syntax(fallback, loc),
        }
    }

    pub(crate) fn unsupported(word: &str, location: SourceLocation) -> ParseError {
        ParseError::syntax(
            format!("'{}' isn't supported in this playground", word),
            location,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_empty_program() {
        let program = parse("").unwrap();
        assert!(program.body.is_empty());

        let program = parse("\n\n# only a comment\n").unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("x = {}1{}", "(".repeat(150), ")".repeat(150));
        let err = parse(&source).unwrap_err();

        assert_eq!(err.kind, SyntaxErrorKind::Syntax);
        assert!(err.message.contains("too many nested parentheses"));
    }

    #[test]
    fn test_long_operator_chain_is_too_complex() {
        let source = format!("x = 1{}\n", " + 1".repeat(5000));
        let err = parse(&source).unwrap_err();
        assert!(err.message.contains("expression too complex"));

        let source = format!("x = a{}\n", ".b".repeat(5000));
        assert!(parse(&source).is_err());

        let source = format!("x = 1{}\n", " + 1".repeat(500));
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_lex_errors_convert() {
        let err = parse("if True:\n        x = 1\n    y = 2\n").unwrap_err();

        assert_eq!(err.exception_name(), "IndentationError");
    }
}
