//! Expression parsing implementation
//!
//! This module handles parsing of all expression types using precedence climbing.
//! Operator precedence (lowest to highest):
//!
//! 1. Conditional expression (`a if cond else b`)
//! 2. `or`
//! 3. `and`
//! 4. `not`
//! 5. Comparisons (`< <= > >= == != in not in is is not`), chained
//! 6. Additive (`+ -`)
//! 7. Multiplicative (`* / // %`)
//! 8. Unary (`- +`)
//! 9. Power (`**`, right-associative, binds tighter than a unary on its left)
//! 10. Postfix (call, subscript, attribute)
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{RawFStringPiece, TokenKind};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse `expr (',' expr)* [',']`, producing a tuple when a comma is present
    pub(crate) fn parse_expression_list(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let first = self.parse_expression()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_token(&TokenKind::Comma) {
            if !self.starts_expression() {
                break;
            }
            items.push(self.parse_expression()?);
        }
        Ok(Expr::Tuple(items, location))
    }

    /// Parse a single expression (conditional expression level)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter_nested("too many nested parentheses")?;
        let expr = self.parse_conditional();
        self.leave_nested();
        expr
    }

    fn starts_expression(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::FString(_)
                | TokenKind::Ident(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
                | TokenKind::Not
                | TokenKind::Minus
                | TokenKind::Plus
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Reserved(_)
        )
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let body = self.parse_or()?;

        if self.check(&TokenKind::If) {
            let location = self.current_location();
            self.advance();
            let condition = self.parse_or()?;
            self.expect_token(&TokenKind::Else, "expected 'else' after 'if' expression")?;
            let orelse = self.parse_expression()?;
            return Ok(Expr::IfExp {
                condition: Box::new(condition),
                body: Box::new(body),
                orelse: Box::new(orelse),
                location,
            });
        }

        Ok(body)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;

        let mut links = 0;
        while self.check(&TokenKind::Or) {
            let location = self.current_location();
            self.extend_chain(&mut links)?;
            self.advance();
            let right = self.parse_and()?;
            left = Expr::BoolOp {
                op: BoolOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
        self.end_chain(links);

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;

        let mut links = 0;
        while self.check(&TokenKind::And) {
            let location = self.current_location();
            self.extend_chain(&mut links)?;
            self.advance();
            let right = self.parse_not()?;
            left = Expr::BoolOp {
                op: BoolOp::And,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
        self.end_chain(links);

        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Not) {
            let location = self.current_location();
            self.advance();
            self.enter_nested("too many nested parentheses")?;
            let operand = self.parse_not();
            self.leave_nested();
            return Ok(Expr::UnaryOp {
                op: UnOp::Not,
                operand: Box::new(operand?),
                location,
            });
        }

        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        let left = self.parse_arith()?;
        let mut comparisons = Vec::new();

        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => CmpOp::Eq,
                TokenKind::NotEq => CmpOp::Ne,
                TokenKind::Lt => CmpOp::Lt,
                TokenKind::Le => CmpOp::Le,
                TokenKind::Gt => CmpOp::Gt,
                TokenKind::Ge => CmpOp::Ge,
                TokenKind::In => CmpOp::In,
                TokenKind::Not if self.check_ahead(1, &TokenKind::In) => CmpOp::NotIn,
                TokenKind::Is if self.check_ahead(1, &TokenKind::Not) => CmpOp::IsNot,
                TokenKind::Is => CmpOp::Is,
                _ => break,
            };
            if matches!(op, CmpOp::NotIn | CmpOp::IsNot) {
                self.advance();
            }
            self.advance();
            comparisons.push((op, self.parse_arith()?));
        }

        if comparisons.is_empty() {
            Ok(left)
        } else {
            Ok(Expr::Compare {
                left: Box::new(left),
                comparisons,
                location,
            })
        }
    }

    fn parse_arith(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        let mut links = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let location = self.current_location();
            self.extend_chain(&mut links)?;
            self.advance();
            let right = self.parse_term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
        self.end_chain(links);

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        let mut links = 0;

        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::DoubleSlash => BinOp::FloorDiv,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let location = self.current_location();
            self.extend_chain(&mut links)?;
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }
        self.end_chain(links);

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Plus => Some(UnOp::Plus),
            _ => None,
        };

        if let Some(op) = op {
            let location = self.current_location();
            self.advance();
            self.enter_nested("too many nested parentheses")?;
            let operand = self.parse_factor();
            self.leave_nested();
            return Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand?),
                location,
            });
        }

        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_postfix()?;

        if self.check(&TokenKind::DoubleStar) {
            let location = self.current_location();
            self.advance();
            self.enter_nested("too many nested parentheses")?;
            let exponent = self.parse_factor();
            self.leave_nested();
            return Ok(Expr::BinaryOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent?),
                location,
            });
        }

        Ok(base)
    }

    /// Parse an atom followed by calls, subscripts and attribute accesses
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        let mut links = 0;

        loop {
            let location = self.current_location();
            if matches!(
                self.peek_kind(),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot
            ) {
                self.extend_chain(&mut links)?;
            }
            if self.match_token(&TokenKind::LParen) {
                expr = self.parse_call(expr, location)?;
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_subscript_index()?;
                self.expect_token(&TokenKind::RBracket, "'[' was never closed")?;
                expr = Expr::Subscript {
                    object: Box::new(expr),
                    index: Box::new(index),
                    location,
                };
            } else if self.match_token(&TokenKind::Dot) {
                let name = self.expect_identifier("invalid syntax")?;
                expr = Expr::Attribute {
                    object: Box::new(expr),
                    name,
                    location,
                };
            } else {
                break;
            }
        }
        self.end_chain(links);

        Ok(expr)
    }

    /// Parse call arguments after `(`
    fn parse_call(&mut self, func: Expr, location: SourceLocation) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expr)> = Vec::new();

        while !self.check(&TokenKind::RParen) {
            let arg_loc = self.current_location();
            if matches!(self.peek_kind(), TokenKind::Star | TokenKind::DoubleStar) {
                return Err(ParseError::syntax(
                    "argument unpacking isn't supported in this playground",
                    arg_loc,
                ));
            }

            if let TokenKind::Ident(name) = self.peek_kind() {
                if self.check_ahead(1, &TokenKind::Eq) {
                    let name = name.clone();
                    self.advance();
                    self.advance();
                    if kwargs.iter().any(|(k, _)| *k == name) {
                        return Err(ParseError::syntax(
                            format!("keyword argument repeated: {}", name),
                            arg_loc,
                        ));
                    }
                    let value = self.parse_expression()?;
                    kwargs.push((name, value));
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                    continue;
                }
            }

            if !kwargs.is_empty() {
                return Err(ParseError::syntax(
                    "positional argument follows keyword argument",
                    arg_loc,
                ));
            }

            let arg = self.parse_expression()?;
            if self.check(&TokenKind::For) {
                // Generator argument: `sum(x * x for x in nums)`
                let comp = self.parse_comprehension(arg, arg_loc)?;
                args.push(comp);
                break;
            }
            args.push(arg);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(&TokenKind::RParen, "'(' was never closed")?;

        Ok(Expr::Call {
            func: Box::new(func),
            args,
            kwargs,
            location,
        })
    }

    /// Parse the inside of `[...]`: an index or a `lower:upper:step` slice
    fn parse_subscript_index(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        let lower = if self.check(&TokenKind::Colon) {
            None
        } else {
            let index = self.parse_expression()?;
            if !self.check(&TokenKind::Colon) {
                return Ok(index);
            }
            Some(Box::new(index))
        };

        self.expect_token(&TokenKind::Colon, "invalid syntax")?;
        let upper = if matches!(self.peek_kind(), TokenKind::Colon | TokenKind::RBracket) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let step = if self.match_token(&TokenKind::Colon) && !self.check(&TokenKind::RBracket) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(Expr::Slice {
            lower,
            upper,
            step,
            location,
        })
    }

    /// Parse `for target in iter [if cond]*` after the element expression
    fn parse_comprehension(
        &mut self,
        element: Expr,
        location: SourceLocation,
    ) -> Result<Expr, ParseError> {
        self.expect_token(&TokenKind::For, "invalid syntax")?;
        let target = self.parse_for_target()?;
        self.expect_token(&TokenKind::In, "invalid syntax")?;
        let iter = self.parse_or()?;

        let mut conditions = Vec::new();
        while self.match_token(&TokenKind::If) {
            conditions.push(self.parse_or()?);
        }

        if self.check(&TokenKind::For) {
            return Err(ParseError::syntax(
                "nested comprehensions aren't supported in this playground",
                self.current_location(),
            ));
        }

        Ok(Expr::ListComp {
            element: Box::new(element),
            target,
            iter: Box::new(iter),
            conditions,
            location,
        })
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        match self.peek_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Int(n, location))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Float(f, location))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Bool(true, location))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Bool(false, location))
            }
            TokenKind::None => {
                self.advance();
                Ok(Expr::NoneLit(location))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Name(name, location))
            }
            TokenKind::Str(_) | TokenKind::FString(_) => self.parse_string_literals(location),
            TokenKind::LParen => {
                self.advance();
                self.parse_parenthesized(location)
            }
            TokenKind::LBracket => {
                self.advance();
                self.parse_list_display(location)
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_dict_display(location)
            }
            TokenKind::Reserved(word) => Err(Self::unsupported(word, location)),
            _ => Err(self.unexpected("invalid syntax")),
        }
    }

    /// Adjacent string literals concatenate: `"a" "b"`, `"x" f"{y}"`
    fn parse_string_literals(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        let mut pieces: Vec<FStringPiece> = Vec::new();
        let mut is_format = false;

        loop {
            match self.peek_kind().clone() {
                TokenKind::Str(text) => {
                    self.advance();
                    pieces.push(FStringPiece::Literal(text));
                }
                TokenKind::FString(raw) => {
                    self.advance();
                    is_format = true;
                    for piece in raw {
                        pieces.push(self.parse_fstring_piece(piece)?);
                    }
                }
                _ => break,
            }
        }

        if !is_format {
            let text = pieces
                .into_iter()
                .map(|piece| match piece {
                    FStringPiece::Literal(text) => text,
                    FStringPiece::Field { .. } => String::new(),
                })
                .collect();
            return Ok(Expr::Str(text, location));
        }

        Ok(Expr::FString(pieces, location))
    }

    fn parse_fstring_piece(&mut self, piece: RawFStringPiece) -> Result<FStringPiece, ParseError> {
        match piece {
            RawFStringPiece::Literal(text) => Ok(FStringPiece::Literal(text)),
            RawFStringPiece::Field {
                source,
                conversion,
                spec,
                location,
            } => {
                let mut sub = self.sub_parser(&source, location)?;
                let expr = sub.parse_expression_list()?;
                sub.match_token(&TokenKind::Newline);
                if !sub.is_at_end() {
                    return Err(ParseError::syntax("f-string: invalid syntax", location));
                }
                Ok(FStringPiece::Field {
                    expr: Box::new(expr),
                    conversion,
                    spec,
                })
            }
        }
    }

    /// After `(`: empty tuple, parenthesized expression, tuple or generator
    fn parse_parenthesized(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        if self.match_token(&TokenKind::RParen) {
            return Ok(Expr::Tuple(Vec::new(), location));
        }

        let first = self.parse_expression()?;

        if self.check(&TokenKind::For) {
            let comp = self.parse_comprehension(first, location)?;
            self.expect_token(&TokenKind::RParen, "'(' was never closed")?;
            return Ok(comp);
        }

        if !self.check(&TokenKind::Comma) {
            self.expect_token(&TokenKind::RParen, "'(' was never closed")?;
            return Ok(first);
        }

        let mut items = vec![first];
        while self.match_token(&TokenKind::Comma) {
            if self.check(&TokenKind::RParen) {
                break;
            }
            items.push(self.parse_expression()?);
        }
        self.expect_token(&TokenKind::RParen, "'(' was never closed")?;

        Ok(Expr::Tuple(items, location))
    }

    /// After `[`: list display or list comprehension
    fn parse_list_display(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        if self.match_token(&TokenKind::RBracket) {
            return Ok(Expr::List(Vec::new(), location));
        }

        let first = self.parse_expression()?;
        if self.check(&TokenKind::For) {
            let comp = self.parse_comprehension(first, location)?;
            self.expect_token(&TokenKind::RBracket, "'[' was never closed")?;
            return Ok(comp);
        }

        let mut items = vec![first];
        while self.match_token(&TokenKind::Comma) {
            if self.check(&TokenKind::RBracket) {
                break;
            }
            items.push(self.parse_expression()?);
        }
        self.expect_token(&TokenKind::RBracket, "'[' was never closed")?;

        Ok(Expr::List(items, location))
    }

    /// After `{`: dict display
    fn parse_dict_display(&mut self, location: SourceLocation) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            let key = self.parse_expression()?;
            if !self.check(&TokenKind::Colon) {
                return Err(ParseError::syntax(
                    "sets aren't supported in this playground, use a list or a dict",
                    key.location(),
                ));
            }
            self.advance();
            let value = self.parse_expression()?;
            if self.check(&TokenKind::For) {
                return Err(ParseError::syntax(
                    "dict comprehensions aren't supported in this playground",
                    self.current_location(),
                ));
            }
            entries.push((key, value));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(&TokenKind::RBrace, "'{' was never closed")?;

        Ok(Expr::Dict(entries, location))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse_expr(source: &str) -> Expr {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_expression_list().unwrap()
    }

    #[test]
    fn test_precedence() {
        let expr = parse_expr("1 + 2 * 3");

        match expr {
            Expr::BinaryOp {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::BinaryOp { op: BinOp::Mul, .. })),
            other => panic!("expected addition, got {:?}", other),
        }
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        let expr = parse_expr("-2 ** 2");

        match expr {
            Expr::UnaryOp {
                op: UnOp::Neg,
                operand,
                ..
            } => assert!(matches!(*operand, Expr::BinaryOp { op: BinOp::Pow, .. })),
            other => panic!("expected negation, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_comparison() {
        let expr = parse_expr("0 <= x < 10");

        assert!(matches!(expr, Expr::Compare { ref comparisons, .. } if comparisons.len() == 2));
    }

    #[test]
    fn test_not_in_and_is_not() {
        let expr = parse_expr("a not in b");
        assert!(matches!(expr, Expr::Compare { ref comparisons, .. } if comparisons[0].0 == CmpOp::NotIn));

        let expr = parse_expr("a is not None");
        assert!(matches!(expr, Expr::Compare { ref comparisons, .. } if comparisons[0].0 == CmpOp::IsNot));
    }

    #[test]
    fn test_call_with_keyword_arguments() {
        let expr = parse_expr("print('a', 'b', sep='-', end='')");

        match expr {
            Expr::Call { args, kwargs, .. } => {
                assert_eq!(args.len(), 2);
                assert_eq!(kwargs.len(), 2);
                assert_eq!(kwargs[0].0, "sep");
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_slices() {
        let expr = parse_expr("word[::-1]");

        match expr {
            Expr::Subscript { index, .. } => assert!(matches!(
                *index,
                Expr::Slice {
                    lower: None,
                    upper: None,
                    step: Some(_),
                    ..
                }
            )),
            other => panic!("expected subscript, got {:?}", other),
        }
    }

    #[test]
    fn test_list_comprehension_and_generator_argument() {
        let expr = parse_expr("[n * 2 for n in nums if n > 1]");
        assert!(matches!(expr, Expr::ListComp { ref conditions, .. } if conditions.len() == 1));

        let expr = parse_expr("sum(n for n in nums)");
        assert!(matches!(expr, Expr::Call { ref args, .. } if matches!(args[0], Expr::ListComp { .. })));
    }

    #[test]
    fn test_fstring_fields_are_parsed() {
        let expr = parse_expr("f'{name.upper()} scored {points + 1:>4}'");

        match expr {
            Expr::FString(pieces, _) => {
                assert!(matches!(&pieces[0], FStringPiece::Field { expr, .. } if matches!(**expr, Expr::Call { .. })));
                assert!(matches!(&pieces[2], FStringPiece::Field { spec: Some(s), .. } if s == ">4"));
            }
            other => panic!("expected f-string, got {:?}", other),
        }
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        let expr = parse_expr("'Hello, ' \"world\"");

        assert!(matches!(expr, Expr::Str(ref s, _) if s == "Hello, world"));
    }

    #[test]
    fn test_conditional_expression_and_tuples() {
        let expr = parse_expr("'big' if n > 10 else 'small'");
        assert!(matches!(expr, Expr::IfExp { .. }));

        let expr = parse_expr("1, 2, 3");
        assert!(matches!(expr, Expr::Tuple(ref items, _) if items.len() == 3));

        let expr = parse_expr("(1,)");
        assert!(matches!(expr, Expr::Tuple(ref items, _) if items.len() == 1));
    }
}
