//! Lexer (tokenizer) for teaching-Python source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Python's significant whitespace is resolved here: the lexer tracks an
//! indentation stack and emits [`TokenKind::Indent`] / [`TokenKind::Dedent`]
//! tokens, and drops newlines that occur inside brackets.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Largest `(` / `[` / `{` nesting the lexer accepts before giving up.
const MAX_BRACKET_DEPTH: usize = 200;

/// A raw piece of an f-string. Field sources are parsed later by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFStringPiece {
    Literal(String),
    Field {
        source: String,
        conversion: Option<char>,
        spec: Option<String>,
        location: SourceLocation,
    },
}

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Float(f64),
    Str(String),
    FString(Vec<RawFStringPiece>),

    // Identifiers
    Ident(String),

    // Keywords
    True,
    False,
    None,
    And,
    Or,
    Not,
    In,
    Is,
    If,
    Elif,
    Else,
    While,
    For,
    Break,
    Continue,
    Pass,
    Def,
    Return,
    Global,
    Import,
    From,
    As,
    Assert,
    Del,
    /// Python keywords the playground does not support (`class`, `try`, ...)
    Reserved(&'static str),

    // Arithmetic
    Plus,        // +
    Minus,       // -
    Star,        // *
    DoubleStar,  // **
    Slash,       // /
    DoubleSlash, // //
    Percent,     // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Assignment
    Eq,            // =
    PlusEq,        // +=
    MinusEq,       // -=
    StarEq,        // *=
    SlashEq,       // /=
    DoubleSlashEq, // //=
    PercentEq,     // %=
    DoubleStarEq,  // **=

    // Punctuation
    Dot,
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Layout
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "number {}", n),
            TokenKind::Float(n) => write!(f, "number {}", n),
            TokenKind::Str(_) | TokenKind::FString(_) => write!(f, "string"),
            TokenKind::Ident(name) => write!(f, "name '{}'", name),
            TokenKind::True => write!(f, "'True'"),
            TokenKind::False => write!(f, "'False'"),
            TokenKind::None => write!(f, "'None'"),
            TokenKind::And => write!(f, "'and'"),
            TokenKind::Or => write!(f, "'or'"),
            TokenKind::Not => write!(f, "'not'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::Is => write!(f, "'is'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Elif => write!(f, "'elif'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::For => write!(f, "'for'"),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Continue => write!(f, "'continue'"),
            TokenKind::Pass => write!(f, "'pass'"),
            TokenKind::Def => write!(f, "'def'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Global => write!(f, "'global'"),
            TokenKind::Import => write!(f, "'import'"),
            TokenKind::From => write!(f, "'from'"),
            TokenKind::As => write!(f, "'as'"),
            TokenKind::Assert => write!(f, "'assert'"),
            TokenKind::Del => write!(f, "'del'"),
            TokenKind::Reserved(word) => write!(f, "'{}'", word),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::DoubleStar => write!(f, "'**'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::DoubleSlash => write!(f, "'//'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::PlusEq => write!(f, "'+='"),
            TokenKind::MinusEq => write!(f, "'-='"),
            TokenKind::StarEq => write!(f, "'*='"),
            TokenKind::SlashEq => write!(f, "'/='"),
            TokenKind::DoubleSlashEq => write!(f, "'//='"),
            TokenKind::PercentEq => write!(f, "'%='"),
            TokenKind::DoubleStarEq => write!(f, "'**='"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Indent => write!(f, "indent"),
            TokenKind::Dedent => write!(f, "dedent"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A token with the location where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// Python distinguishes indentation problems from other syntax problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    Syntax,
    Indentation,
}

/// Lexer error type
#[derive(Debug, Clone, Error)]
#[error("{message} (line {})", location.line)]
pub struct LexError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn syntax(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: SyntaxErrorKind::Syntax,
            message: message.into(),
            location,
        }
    }

    fn indentation(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: SyntaxErrorKind::Indentation,
            message: message.into(),
            location,
        }
    }
}

/// Lexer for teaching-Python source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>,
    brackets: Vec<(char, SourceLocation)>,
    at_line_start: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::with_origin(input, SourceLocation::new(1, 1))
    }

    /// Create a lexer whose locations start at `origin` (used for f-string fields).
    pub fn with_origin(input: &str, origin: SourceLocation) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: origin.line,
            column: origin.column,
            indent_stack: vec![0],
            brackets: Vec::new(),
            at_line_start: true,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            if self.at_line_start && self.brackets.is_empty() {
                self.at_line_start = false;
                if self.handle_indentation(&mut tokens)? {
                    continue;
                }
            }

            self.skip_inline_whitespace()?;

            match self.peek() {
                None => break,
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some('\n') => {
                    let loc = self.current_location();
                    self.advance();
                    if self.brackets.is_empty() {
                        Self::push_newline(&mut tokens, loc);
                        self.at_line_start = true;
                    }
                    continue;
                }
                Some(_) => {}
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        if let Some((open, loc)) = self.brackets.last() {
            return Err(LexError::syntax(format!("'{}' was never closed", open), *loc));
        }

        let end = self.current_location();
        Self::push_newline(&mut tokens, end);
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            tokens.push(Token::new(TokenKind::Dedent, end));
        }
        tokens.push(Token::new(TokenKind::Eof, end));

        Ok(tokens)
    }

    /// Emit a newline unless the logical line is empty
    fn push_newline(tokens: &mut Vec<Token>, location: SourceLocation) {
        let needs_newline = tokens.last().is_some_and(|t| {
            !matches!(
                t.kind,
                TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent
            )
        });
        if needs_newline {
            tokens.push(Token::new(TokenKind::Newline, location));
        }
    }

    /// Measure leading whitespace and emit indent/dedent tokens.
    /// Returns true when the line was blank or comment-only and was consumed.
    fn handle_indentation(&mut self, tokens: &mut Vec<Token>) -> Result<bool, LexError> {
        let mut width = 0;
        while let Some(ch) = self.peek() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            self.advance();
        }

        match self.peek() {
            None => return Ok(false),
            Some('#') => {
                self.skip_comment();
                self.at_line_start = true;
                return Ok(true);
            }
            Some('\n') | Some('\r') => {
                while matches!(self.peek(), Some('\r')) {
                    self.advance();
                }
                self.advance();
                self.at_line_start = true;
                return Ok(true);
            }
            Some('\\') if self.peek_ahead(1) == Some('\n') => return Ok(false),
            _ => {}
        }

        let loc = self.current_location();
        let current = self.indent_stack.last().copied().unwrap_or(0);

        if width > current {
            self.indent_stack.push(width);
            tokens.push(Token::new(TokenKind::Indent, loc));
        } else if width < current {
            while self.indent_stack.last().is_some_and(|&top| top > width) {
                self.indent_stack.pop();
                tokens.push(Token::new(TokenKind::Dedent, loc));
            }
            if self.indent_stack.last() != Some(&width) {
                return Err(LexError::indentation(
                    "unindent does not match any outer indentation level",
                    loc,
                ));
            }
        }

        Ok(false)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self
            .advance()
            .ok_or_else(|| LexError::syntax("unexpected end of file", loc))?;

        let kind = match ch {
            '"' | '\'' => return self.string_literal(ch, StringPrefix::default(), loc),
            '0'..='9' => return self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                return self.number_literal(ch, loc)
            }
            c if c.is_alphabetic() || c == '_' => return self.identifier_or_keyword(c, loc),

            '+' => self.with_eq(TokenKind::Plus, TokenKind::PlusEq),
            '-' => self.with_eq(TokenKind::Minus, TokenKind::MinusEq),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    self.with_eq(TokenKind::DoubleStar, TokenKind::DoubleStarEq)
                } else {
                    self.with_eq(TokenKind::Star, TokenKind::StarEq)
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    self.with_eq(TokenKind::DoubleSlash, TokenKind::DoubleSlashEq)
                } else {
                    self.with_eq(TokenKind::Slash, TokenKind::SlashEq)
                }
            }
            '%' => self.with_eq(TokenKind::Percent, TokenKind::PercentEq),
            '=' => self.with_eq(TokenKind::Eq, TokenKind::EqEq),
            '<' => self.with_eq(TokenKind::Lt, TokenKind::Le),
            '>' => self.with_eq(TokenKind::Gt, TokenKind::Ge),
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::NotEq
                } else {
                    return Err(LexError::syntax("invalid syntax", loc));
                }
            }
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '(' | '[' | '{' => {
                if self.brackets.len() >= MAX_BRACKET_DEPTH {
                    return Err(LexError::syntax("too many nested parentheses", loc));
                }
                self.brackets.push((ch, loc));
                match ch {
                    '(' => TokenKind::LParen,
                    '[' => TokenKind::LBracket,
                    _ => TokenKind::LBrace,
                }
            }
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, _)) => {
                        return Err(LexError::syntax(
                            format!(
                                "closing parenthesis '{}' does not match opening parenthesis '{}'",
                                ch, open
                            ),
                            loc,
                        ))
                    }
                    None => return Err(LexError::syntax(format!("unmatched '{}'", ch), loc)),
                }
                match ch {
                    ')' => TokenKind::RParen,
                    ']' => TokenKind::RBracket,
                    _ => TokenKind::RBrace,
                }
            }

            _ => {
                return Err(LexError::syntax(
                    format!("invalid character '{}' (U+{:04X})", ch, ch as u32),
                    loc,
                ))
            }
        };

        Ok(Token::new(kind, loc))
    }

    /// Pick the `op=` form when the next character is `=`
    fn with_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            with_eq
        } else {
            plain
        }
    }

    /// Parse a quoted string; `quote` has already been consumed
    fn string_literal(
        &mut self,
        quote: char,
        prefix: StringPrefix,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let triple = self.peek() == Some(quote) && self.peek_ahead(1) == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }

        let mut text = String::new();
        loop {
            let Some(ch) = self.peek() else {
                return Err(Self::unterminated(triple, loc, self.line));
            };

            if ch == quote {
                if !triple {
                    self.advance();
                    break;
                }
                if self.peek_ahead(1) == Some(quote) && self.peek_ahead(2) == Some(quote) {
                    self.advance();
                    self.advance();
                    self.advance();
                    break;
                }
            }

            if ch == '\n' && !triple {
                return Err(Self::unterminated(false, loc, self.line));
            }

            if ch == '\\' {
                self.advance();
                let Some(escaped) = self.advance() else {
                    return Err(Self::unterminated(triple, loc, self.line));
                };
                if prefix.raw {
                    text.push('\\');
                    text.push(escaped);
                } else {
                    self.unescape(escaped, &mut text)?;
                }
                continue;
            }

            text.push(ch);
            self.advance();
        }

        if prefix.format {
            let pieces = self.split_fstring(&text, loc)?;
            Ok(Token::new(TokenKind::FString(pieces), loc))
        } else {
            Ok(Token::new(TokenKind::Str(text), loc))
        }
    }

    fn unterminated(triple: bool, loc: SourceLocation, line: usize) -> LexError {
        if triple {
            LexError::syntax(
                format!("unterminated triple-quoted string literal (detected at line {})", line),
                loc,
            )
        } else {
            LexError::syntax(
                format!("unterminated string literal (detected at line {})", line),
                loc,
            )
        }
    }

    fn unescape(&mut self, escaped: char, text: &mut String) -> Result<(), LexError> {
        match escaped {
            '\n' => {}
            'n' => text.push('\n'),
            't' => text.push('\t'),
            'r' => text.push('\r'),
            '0' => text.push('\0'),
            'a' => text.push('\x07'),
            'b' => text.push('\x08'),
            '\\' => text.push('\\'),
            '\'' => text.push('\''),
            '"' => text.push('"'),
            'x' | 'u' => {
                let digits = if escaped == 'x' { 2 } else { 4 };
                let loc = self.current_location();
                let mut hex = String::new();
                for _ in 0..digits {
                    match self.advance() {
                        Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => {
                            return Err(LexError::syntax(
                                format!("truncated \\{} escape", escaped),
                                loc,
                            ))
                        }
                    }
                }
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexError::syntax(format!("invalid escape \\{}{}", escaped, hex), loc))?;
                text.push(decoded);
            }
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    /// Split f-string text into literal runs and `{field}` sources
    fn split_fstring(
        &self,
        text: &str,
        loc: SourceLocation,
    ) -> Result<Vec<RawFStringPiece>, LexError> {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            if ch == '{' && chars.get(i + 1) == Some(&'{') {
                literal.push('{');
                i += 2;
                continue;
            }
            if ch == '}' {
                if chars.get(i + 1) == Some(&'}') {
                    literal.push('}');
                    i += 2;
                    continue;
                }
                return Err(LexError::syntax("f-string: single '}' is not allowed", loc));
            }
            if ch != '{' {
                literal.push(ch);
                i += 1;
                continue;
            }

            if !literal.is_empty() {
                pieces.push(RawFStringPiece::Literal(std::mem::take(&mut literal)));
            }

            let start = i + 1;
            let mut depth = 0usize;
            let mut quote: Option<char> = None;
            let mut end = None;
            let mut conversion_at = None;
            let mut spec_at = None;
            let mut j = start;
            while j < chars.len() {
                let c = chars[j];
                if let Some(q) = quote {
                    if c == q {
                        quote = None;
                    }
                } else {
                    match c {
                        '\'' | '"' => quote = Some(c),
                        '(' | '[' | '{' => depth += 1,
                        ')' | ']' => depth = depth.saturating_sub(1),
                        '}' if depth > 0 => depth -= 1,
                        '}' => {
                            end = Some(j);
                            break;
                        }
                        '!' if depth == 0
                            && spec_at.is_none()
                            && chars.get(j + 1) != Some(&'=') =>
                        {
                            conversion_at = Some(j);
                        }
                        ':' if depth == 0 && spec_at.is_none() => spec_at = Some(j),
                        _ => {}
                    }
                }
                j += 1;
            }

            let Some(end) = end else {
                return Err(LexError::syntax("f-string: expecting '}'", loc));
            };

            let expr_end = conversion_at.or(spec_at).unwrap_or(end);
            let source: String = chars[start..expr_end].iter().collect();
            if source.trim().is_empty() {
                return Err(LexError::syntax("f-string: valid expression required before '}'", loc));
            }

            let conversion = match conversion_at {
                Some(at) => {
                    let conv_end = spec_at.unwrap_or(end);
                    let conv: String = chars[at + 1..conv_end].iter().collect();
                    match conv.as_str() {
                        "r" | "s" | "a" => conv.chars().next(),
                        _ => {
                            return Err(LexError::syntax(
                                "f-string: invalid conversion character: expected 's', 'r', or 'a'",
                                loc,
                            ))
                        }
                    }
                }
                None => None,
            };
            let spec = spec_at.map(|at| chars[at + 1..end].iter().collect::<String>());

            pieces.push(RawFStringPiece::Field {
                source,
                conversion,
                spec,
                location: loc,
            });
            i = end + 1;
        }

        if !literal.is_empty() {
            pieces.push(RawFStringPiece::Literal(literal));
        }
        Ok(pieces)
    }

    /// Parse numeric literal (ints, floats, hex/octal/binary ints)
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        if first == '0' {
            let radix = match self.peek() {
                Some('x') | Some('X') => Some(16),
                Some('o') | Some('O') => Some(8),
                Some('b') | Some('B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                let mut digits = String::new();
                while let Some(ch) = self.peek() {
                    if ch.is_digit(radix) {
                        digits.push(ch);
                    } else if ch != '_' {
                        break;
                    }
                    self.advance();
                }
                let value = i64::from_str_radix(&digits, radix).map_err(|_| {
                    LexError::syntax("invalid number literal", loc)
                })?;
                return Ok(Token::new(TokenKind::Int(value), loc));
            }
        }

        let mut text = String::new();
        text.push(first);
        let mut is_float = first == '.';

        self.take_digits(&mut text);
        if !is_float
            && self.peek() == Some('.')
            && !self.peek_ahead(1).is_some_and(|c| c.is_alphabetic() || c == '_')
        {
            is_float = true;
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = self.peek_ahead(1);
            let has_digits = match sign {
                Some('+') | Some('-') => self.peek_ahead(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                is_float = true;
                text.push('e');
                self.advance();
                if let Some(s @ ('+' | '-')) = self.peek() {
                    text.push(s);
                    self.advance();
                }
                self.take_digits(&mut text);
            }
        }

        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return Err(LexError::syntax("invalid decimal literal", loc));
        }

        if is_float {
            let value = text
                .parse::<f64>()
                .map_err(|_| LexError::syntax(format!("invalid number literal: {}", text), loc))?;
            Ok(Token::new(TokenKind::Float(value), loc))
        } else {
            let value = text.parse::<i64>().map_err(|_| {
                LexError::syntax("integer literal too large for this playground", loc)
            })?;
            Ok(Token::new(TokenKind::Int(value), loc))
        }
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch != '_' || !self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
                break;
            }
            self.advance();
        }
    }

    /// Parse identifier, keyword or prefixed string (`f"..."`, `r'...'`)
    fn identifier_or_keyword(
        &mut self,
        first_char: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if let Some(quote @ ('"' | '\'')) = self.peek() {
            if let Some(prefix) = StringPrefix::parse(&ident) {
                self.advance();
                return self.string_literal(quote, prefix, loc);
            }
        }

        let kind = match ident.as_str() {
            "True" => TokenKind::True,
            "False" => TokenKind::False,
            "None" => TokenKind::None,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "in" => TokenKind::In,
            "is" => TokenKind::Is,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "pass" => TokenKind::Pass,
            "def" => TokenKind::Def,
            "return" => TokenKind::Return,
            "global" => TokenKind::Global,
            "import" => TokenKind::Import,
            "from" => TokenKind::From,
            "as" => TokenKind::As,
            "assert" => TokenKind::Assert,
            "del" => TokenKind::Del,
            "class" => TokenKind::Reserved("class"),
            "try" => TokenKind::Reserved("try"),
            "except" => TokenKind::Reserved("except"),
            "finally" => TokenKind::Reserved("finally"),
            "raise" => TokenKind::Reserved("raise"),
            "lambda" => TokenKind::Reserved("lambda"),
            "with" => TokenKind::Reserved("with"),
            "yield" => TokenKind::Reserved("yield"),
            "nonlocal" => TokenKind::Reserved("nonlocal"),
            "async" => TokenKind::Reserved("async"),
            "await" => TokenKind::Reserved("await"),
            _ => TokenKind::Ident(ident),
        };

        Ok(Token::new(kind, loc))
    }

    /// Skip spaces, tabs and backslash line continuations
    fn skip_inline_whitespace(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\x0c') => {
                    self.advance();
                }
                Some('\\') => {
                    let loc = self.current_location();
                    let mut offset = 1;
                    while self.peek_ahead(offset) == Some('\r') {
                        offset += 1;
                    }
                    if self.peek_ahead(offset) != Some('\n') {
                        return Err(LexError::syntax(
                            "unexpected character after line continuation character",
                            loc,
                        ));
                    }
                    for _ in 0..=offset {
                        self.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip a `#` comment up to (not including) the newline
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// String prefix flags (`f`, `r`, `rf`, ...)
#[derive(Debug, Clone, Copy, Default)]
struct StringPrefix {
    raw: bool,
    format: bool,
}

impl StringPrefix {
    fn parse(ident: &str) -> Option<Self> {
        match ident.to_ascii_lowercase().as_str() {
            "f" => Some(Self {
                raw: false,
                format: true,
            }),
            "r" => Some(Self {
                raw: true,
                format: false,
            }),
            "u" => Some(Self::default()),
            "rf" | "fr" => Some(Self {
                raw: true,
                format: true,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("print(\"hi\")");

        assert_eq!(tokens[0], TokenKind::Ident("print".to_string()));
        assert_eq!(tokens[1], TokenKind::LParen);
        assert_eq!(tokens[2], TokenKind::Str("hi".to_string()));
        assert_eq!(tokens[3], TokenKind::RParen);
        assert_eq!(tokens[4], TokenKind::Newline);
        assert_eq!(tokens[5], TokenKind::Eof);
    }

    #[test]
    fn test_operators() {
        let tokens = kinds("a ** b // c += d != e");

        assert!(tokens.contains(&TokenKind::DoubleStar));
        assert!(tokens.contains(&TokenKind::DoubleSlash));
        assert!(tokens.contains(&TokenKind::PlusEq));
        assert!(tokens.contains(&TokenKind::NotEq));
    }

    #[test]
    fn test_indent_and_dedent() {
        let tokens = kinds("if x:\n    y = 1\nz = 2\n");

        let indent = tokens.iter().position(|t| *t == TokenKind::Indent).unwrap();
        let dedent = tokens.iter().position(|t| *t == TokenKind::Dedent).unwrap();
        assert!(indent < dedent);
        assert_eq!(tokens[dedent + 1], TokenKind::Ident("z".to_string()));
    }

    #[test]
    fn test_blank_and_comment_lines_keep_indentation() {
        let tokens = kinds("if x:\n    a = 1\n\n    # note\n    b = 2\n");

        let dedents = tokens.iter().filter(|t| **t == TokenKind::Dedent).count();
        let indents = tokens.iter().filter(|t| **t == TokenKind::Indent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
    }

    #[test]
    fn test_newlines_inside_brackets_are_ignored() {
        let tokens = kinds("animals = {\n    'a': 1,\n    'b': 2\n}\n");

        let newlines = tokens.iter().filter(|t| **t == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
        assert!(!tokens.contains(&TokenKind::Indent));
    }

    #[test]
    fn test_bad_dedent_is_indentation_error() {
        let err = Lexer::new("if x:\n    a = 1\n  b = 2\n").tokenize().unwrap_err();

        assert_eq!(err.kind, SyntaxErrorKind::Indentation);
        assert_eq!(err.location.line, 3);
    }

    #[test]
    fn test_string_escapes_and_quotes() {
        let tokens = kinds(r#"'You\'re' "tab\there" r"raw\n""#);

        assert_eq!(tokens[0], TokenKind::Str("You're".to_string()));
        assert_eq!(tokens[1], TokenKind::Str("tab\there".to_string()));
        assert_eq!(tokens[2], TokenKind::Str("raw\\n".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("print(\"oops)\n").tokenize().unwrap_err();

        assert_eq!(err.kind, SyntaxErrorKind::Syntax);
        assert!(err.message.contains("unterminated string literal"));
    }

    #[test]
    fn test_fstring_fields() {
        let tokens = kinds("f'{name} has {n:.2f} {{ok}} {x!r}'");

        let TokenKind::FString(pieces) = &tokens[0] else {
            panic!("expected f-string");
        };
        assert_eq!(pieces.len(), 5);
        assert!(matches!(&pieces[0], RawFStringPiece::Field { source, .. } if source == "name"));
        assert_eq!(pieces[1], RawFStringPiece::Literal(" has ".to_string()));
        assert!(matches!(&pieces[2], RawFStringPiece::Field { spec: Some(s), .. } if s == ".2f"));
        assert_eq!(pieces[3], RawFStringPiece::Literal(" {ok} ".to_string()));
        assert!(matches!(&pieces[4], RawFStringPiece::Field { conversion: Some('r'), .. }));
    }

    #[test]
    fn test_numbers() {
        let tokens = kinds("1_000 3.14 .5 2e3 0xff");

        assert_eq!(tokens[0], TokenKind::Int(1000));
        assert_eq!(tokens[1], TokenKind::Float(3.14));
        assert_eq!(tokens[2], TokenKind::Float(0.5));
        assert_eq!(tokens[3], TokenKind::Float(2000.0));
        assert_eq!(tokens[4], TokenKind::Int(255));
    }

    #[test]
    fn test_unclosed_bracket() {
        let err = Lexer::new("print((1 + 2)\n").tokenize().unwrap_err();

        assert!(err.message.contains("was never closed"));
    }

    #[test]
    fn test_invalid_character() {
        let err = Lexer::new("x = 5 $ 3").tokenize().unwrap_err();

        assert!(err.message.starts_with("invalid character '$'"));
    }
}
