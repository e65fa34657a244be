//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Simple statements: expressions, assignments, `pass`, `return`, `global`, ...
//! - Compound statements: `if`/`elif`/`else`, `while`, `for`, `def`
//! - Indented blocks (suites), including one-line suites like `if x: print(x)`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= compound | simple (';' simple)* NEWLINE
//! compound   ::= if_stmt | while_stmt | for_stmt | funcdef
//! suite      ::= simple_line | NEWLINE INDENT statement+ DEDENT
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use std::rc::Rc;

impl Parser {
    /// Parse one statement line (or compound statement) into `out`
    pub(crate) fn parse_statement(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::If => {
                self.advance();
                out.push(self.parse_if_statement(loc)?);
                return Ok(());
            }
            TokenKind::While => {
                self.advance();
                out.push(self.parse_while_statement(loc)?);
                return Ok(());
            }
            TokenKind::For => {
                self.advance();
                out.push(self.parse_for_statement(loc)?);
                return Ok(());
            }
            TokenKind::Def => {
                self.advance();
                out.push(self.parse_function_def(loc)?);
                return Ok(());
            }
            TokenKind::Indent => {
                return Err(ParseError::indentation("unexpected indent", loc));
            }
            TokenKind::Elif | TokenKind::Else => {
                return Err(ParseError::syntax("invalid syntax", loc));
            }
            _ => {}
        }

        self.parse_simple_line(out)
    }

    /// Parse `simple (';' simple)* NEWLINE`
    fn parse_simple_line(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        loop {
            self.parse_simple_statement(out)?;
            if self.match_token(&TokenKind::Semicolon) {
                if self.at_statement_end() {
                    break;
                }
                continue;
            }
            break;
        }

        if self.is_at_end() || self.match_token(&TokenKind::Newline) {
            Ok(())
        } else {
            Err(self.unexpected("invalid syntax"))
        }
    }

    fn parse_simple_statement(&mut self, out: &mut Vec<Stmt>) -> Result<(), ParseError> {
        let location = self.current_location();

        match self.peek_kind().clone() {
            TokenKind::Pass => {
                self.advance();
                out.push(Stmt::Pass { location });
            }
            TokenKind::Break => {
                self.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::syntax("'break' outside loop", location));
                }
                out.push(Stmt::Break { location });
            }
            TokenKind::Continue => {
                self.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::syntax(
                        "'continue' not properly in loop",
                        location,
                    ));
                }
                out.push(Stmt::Continue { location });
            }
            TokenKind::Return => {
                self.advance();
                if self.function_depth == 0 {
                    return Err(ParseError::syntax("'return' outside function", location));
                }
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression_list()?)
                };
                out.push(Stmt::Return { value, location });
            }
            TokenKind::Global => {
                self.advance();
                let mut names = vec![self.expect_identifier("invalid syntax")?];
                while self.match_token(&TokenKind::Comma) {
                    names.push(self.expect_identifier("invalid syntax")?);
                }
                out.push(Stmt::Global { names, location });
            }
            TokenKind::Import => {
                self.advance();
                loop {
                    let module = self.parse_dotted_name()?;
                    let alias = if self.match_token(&TokenKind::As) {
                        Some(self.expect_identifier("invalid syntax")?)
                    } else {
                        None
                    };
                    out.push(Stmt::Import {
                        module,
                        alias,
                        location,
                    });
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            TokenKind::From => {
                self.advance();
                out.push(self.parse_from_import(location)?);
            }
            TokenKind::Assert => {
                self.advance();
                let test = self.parse_expression()?;
                let message = if self.match_token(&TokenKind::Comma) {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                out.push(Stmt::Assert {
                    test,
                    message,
                    location,
                });
            }
            TokenKind::Del => {
                self.advance();
                let mut targets = Vec::new();
                loop {
                    let expr = self.parse_postfix()?;
                    targets.push(self.expr_to_target(expr, "delete")?);
                    if !self.match_token(&TokenKind::Comma) || self.at_statement_end() {
                        break;
                    }
                }
                out.push(Stmt::Del { targets, location });
            }
            TokenKind::Reserved(word) => {
                return Err(Self::unsupported(word, location));
            }
            _ => out.push(self.parse_expression_statement()?),
        }

        Ok(())
    }

    /// Expression statement, assignment chain or augmented assignment
    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();
        let first = self.parse_expression_list()?;

        if let Some(op) = self.augmented_operator() {
            self.advance();
            let target = match first {
                Expr::Name(..) | Expr::Subscript { .. } => self.expr_to_target(first, "assign")?,
                other => {
                    return Err(ParseError::syntax(
                        format!(
                            "'{}' is an illegal expression for augmented assignment",
                            describe_expr(&other)
                        ),
                        other.location(),
                    ))
                }
            };
            let value = self.parse_expression_list()?;
            return Ok(Stmt::AugAssign {
                target,
                op,
                value,
                location,
            });
        }

        if self.check(&TokenKind::Eq) {
            let mut exprs = vec![first];
            while self.match_token(&TokenKind::Eq) {
                exprs.push(self.parse_expression_list()?);
            }
            let value = exprs.pop().ok_or_else(|| ParseError::syntax("invalid syntax", location))?;
            let targets = exprs
                .into_iter()
                .map(|expr| self.expr_to_target(expr, "assign"))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Stmt::Assign {
                targets,
                value,
                location,
            });
        }

        if matches!(&first, Expr::Name(name, _) if name == "print") && !self.at_statement_end() {
            return Err(ParseError::syntax(
                "Missing parentheses in call to 'print'. Did you mean print(...)?",
                location,
            ));
        }

        Ok(Stmt::Expr {
            expr: first,
            location,
        })
    }

    fn augmented_operator(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            TokenKind::DoubleSlashEq => Some(BinOp::FloorDiv),
            TokenKind::PercentEq => Some(BinOp::Mod),
            TokenKind::DoubleStarEq => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Convert a parsed expression to an assignment target
    pub(crate) fn expr_to_target(&self, expr: Expr, verb: &str) -> Result<Target, ParseError> {
        match expr {
            Expr::Name(name, loc) => Ok(Target::Name(name, loc)),
            Expr::Subscript {
                object,
                index,
                location,
            } => Ok(Target::Subscript {
                object,
                index,
                location,
            }),
            Expr::Tuple(items, loc) | Expr::List(items, loc) => {
                let targets = items
                    .into_iter()
                    .map(|item| self.expr_to_target(item, verb))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Target::Tuple(targets, loc))
            }
            other => {
                let hint = if verb == "assign" {
                    ". Maybe you meant '==' instead of '='?"
                } else {
                    ""
                };
                Err(ParseError::syntax(
                    format!("cannot {} to {} here{}", verb, describe_expr(&other), hint),
                    other.location(),
                ))
            }
        }
    }

    fn parse_dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_identifier("invalid syntax")?;
        while self.match_token(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_identifier("invalid syntax")?);
        }
        Ok(name)
    }

    fn parse_from_import(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let module = self.parse_dotted_name()?;
        self.expect_token(&TokenKind::Import, "invalid syntax")?;

        let mut names = Vec::new();
        if self.match_token(&TokenKind::Star) {
            names.push(("*".to_string(), None));
        } else {
            let parenthesized = self.match_token(&TokenKind::LParen);
            loop {
                let name = self.expect_identifier("invalid syntax")?;
                let alias = if self.match_token(&TokenKind::As) {
                    Some(self.expect_identifier("invalid syntax")?)
                } else {
                    None
                };
                names.push((name, alias));
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                if parenthesized && self.check(&TokenKind::RParen) {
                    break;
                }
            }
            if parenthesized {
                self.expect_token(&TokenKind::RParen, "'(' was never closed")?;
            }
        }

        Ok(Stmt::FromImport {
            module,
            names,
            location,
        })
    }

    /// Parse an indented suite after `:`
    pub(crate) fn parse_block(
        &mut self,
        keyword: &str,
        header: SourceLocation,
    ) -> Result<Vec<Stmt>, ParseError> {
        if self.check(&TokenKind::Eq) {
            return Err(ParseError::syntax(
                "invalid syntax. Maybe you meant '==' or ':=' instead of '='?",
                self.current_location(),
            ));
        }
        self.expect_token(&TokenKind::Colon, "expected ':'")?;

        let mut body = Vec::new();
        if !self.match_token(&TokenKind::Newline) {
            // One-line suite: `if x: print(x)`
            self.parse_simple_line(&mut body)?;
            return Ok(body);
        }

        if !self.match_token(&TokenKind::Indent) {
            return Err(ParseError::indentation(
                format!(
                    "expected an indented block after {} on line {}",
                    keyword, header.line
                ),
                self.current_location(),
            ));
        }

        self.enter_nested("too many statically nested blocks")?;
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            if self.match_token(&TokenKind::Newline) {
                continue;
            }
            self.parse_statement(&mut body)?;
        }
        self.match_token(&TokenKind::Dedent);
        self.leave_nested();

        Ok(body)
    }

    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let mut branches = Vec::new();

        let condition = self.parse_expression()?;
        let body = self.parse_block("'if' statement", location)?;
        branches.push((condition, body));

        let mut orelse = None;
        loop {
            let loc = self.current_location();
            if self.match_token(&TokenKind::Elif) {
                let condition = self.parse_expression()?;
                let body = self.parse_block("'elif' statement", loc)?;
                branches.push((condition, body));
            } else if self.match_token(&TokenKind::Else) {
                orelse = Some(self.parse_block("'else' statement", loc)?);
                break;
            } else {
                break;
            }
        }

        Ok(Stmt::If {
            branches,
            orelse,
            location,
        })
    }

    fn parse_while_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let condition = self.parse_expression()?;

        self.loop_depth += 1;
        let body = self.parse_block("'while' statement", location);
        self.loop_depth -= 1;

        Ok(Stmt::While {
            condition,
            body: body?,
            location,
        })
    }

    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let target = self.parse_for_target()?;
        self.expect_token(&TokenKind::In, "invalid syntax")?;
        let iter = self.parse_expression_list()?;

        self.loop_depth += 1;
        let body = self.parse_block("'for' statement", location);
        self.loop_depth -= 1;

        Ok(Stmt::For {
            target,
            iter,
            body: body?,
            location,
        })
    }

    /// Parse the target of a `for` loop or comprehension (stops before `in`)
    pub(crate) fn parse_for_target(&mut self) -> Result<Target, ParseError> {
        let location = self.current_location();
        let mut items = vec![self.parse_postfix()?];
        let mut is_tuple = false;
        while self.match_token(&TokenKind::Comma) {
            is_tuple = true;
            if self.check(&TokenKind::In) {
                break;
            }
            items.push(self.parse_postfix()?);
        }

        let expr = match (is_tuple, items.pop()) {
            (false, Some(single)) => single,
            (_, last) => {
                items.extend(last);
                Expr::Tuple(items, location)
            }
        };
        self.expr_to_target(expr, "assign")
    }

    fn parse_function_def(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier("invalid syntax")?;
        self.expect_token(&TokenKind::LParen, "expected '('")?;

        let mut params: Vec<Param> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let param_loc = self.current_location();
            if matches!(self.peek_kind(), TokenKind::Star | TokenKind::DoubleStar) {
                return Err(ParseError::syntax(
                    "'*args' and '**kwargs' parameters aren't supported in this playground",
                    param_loc,
                ));
            }
            let param_name = self.expect_identifier("invalid syntax")?;
            if params.iter().any(|p| p.name == param_name) {
                return Err(ParseError::syntax(
                    format!("duplicate argument '{}' in function definition", param_name),
                    param_loc,
                ));
            }
            let default = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_expression()?)
            } else {
                if params.iter().any(|p| p.default.is_some()) {
                    return Err(ParseError::syntax(
                        "non-default argument follows default argument",
                        param_loc,
                    ));
                }
                None
            };
            params.push(Param {
                name: param_name,
                default,
            });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(&TokenKind::RParen, "'(' was never closed")?;

        let saved_loops = std::mem::take(&mut self.loop_depth);
        self.function_depth += 1;
        let body = self.parse_block("function definition", location);
        self.function_depth -= 1;
        self.loop_depth = saved_loops;

        Ok(Stmt::FunctionDef(Rc::new(FunctionDef::new(
            name, params, body?, location,
        ))))
    }
}

/// Short description of an expression for "cannot assign to ..." messages
fn describe_expr(expr: &Expr) -> &'static str {
    match expr {
        Expr::Int(..) | Expr::Float(..) | Expr::Str(..) | Expr::Bool(..) | Expr::NoneLit(_) => {
            "literal"
        }
        Expr::FString(..) => "f-string expression",
        Expr::Call { .. } => "function call",
        Expr::Attribute { .. } => "attribute",
        Expr::BinaryOp { .. } | Expr::UnaryOp { .. } => "expression",
        Expr::BoolOp { .. } => "expression",
        Expr::Compare { .. } => "comparison",
        Expr::IfExp { .. } => "conditional expression",
        Expr::ListComp { .. } => "list comprehension",
        Expr::Dict(..) => "dict literal",
        Expr::Tuple(..) => "tuple",
        Expr::List(..) => "list",
        Expr::Name(..) => "name",
        Expr::Subscript { .. } | Expr::Slice { .. } => "subscript",
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::SyntaxErrorKind;
    use crate::parser::parse::{ParseError, Parser};

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.parse_program()
    }

    #[test]
    fn test_if_elif_else() {
        let program = parse("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n").unwrap();

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::If {
                branches, orelse, ..
            } => {
                assert_eq!(branches.len(), 2);
                assert!(orelse.is_some());
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_and_tuple_assignment() {
        let program = parse("a = b = 1\nx, y = y, x\n").unwrap();

        assert!(matches!(&program.body[0], Stmt::Assign { targets, .. } if targets.len() == 2));
        assert!(matches!(
            &program.body[1],
            Stmt::Assign { targets, .. } if matches!(targets[0], Target::Tuple(ref t, _) if t.len() == 2)
        ));
    }

    #[test]
    fn test_semicolons_and_one_line_suites() {
        let program = parse("a = 1; b = 2\nif a: print(a)\n").unwrap();

        assert_eq!(program.body.len(), 3);
        assert!(matches!(&program.body[2], Stmt::If { .. }));
    }

    #[test]
    fn test_function_def_with_defaults() {
        let program = parse("def greet(name, greeting='Hi'):\n    return greeting + name\n").unwrap();

        let Stmt::FunctionDef(def) = &program.body[0] else {
            panic!("expected def");
        };
        assert_eq!(def.name, "greet");
        assert_eq!(def.params.len(), 2);
        assert!(def.params[1].default.is_some());
    }

    #[test]
    fn test_for_with_tuple_target() {
        let program = parse("for i, animal in enumerate(zoo):\n    print(i, animal)\n").unwrap();

        assert!(matches!(
            &program.body[0],
            Stmt::For { target: Target::Tuple(items, _), .. } if items.len() == 2
        ));
    }

    #[test]
    fn test_missing_indented_block() {
        let err = parse("for i in range(3):\nprint(i)\n").unwrap_err();

        assert_eq!(err.kind, SyntaxErrorKind::Indentation);
        assert!(err.message.contains("expected an indented block after 'for' statement on line 1"));
    }

    #[test]
    fn test_unexpected_indent() {
        let err = parse("x = 1\n    y = 2\n").unwrap_err();

        assert_eq!(err.kind, SyntaxErrorKind::Indentation);
        assert_eq!(err.message, "unexpected indent");
    }

    #[test]
    fn test_break_and_return_placement() {
        assert_eq!(parse("break\n").unwrap_err().message, "'break' outside loop");
        assert_eq!(parse("return 5\n").unwrap_err().message, "'return' outside function");
        assert!(parse("def f():\n    while True:\n        return 1\n").is_ok());
        assert!(parse("while True:\n    def f():\n        break\n").is_err());
    }

    #[test]
    fn test_unsupported_keywords() {
        let err = parse("class Dog:\n    pass\n").unwrap_err();
        assert_eq!(err.message, "'class' isn't supported in this playground");

        let err = parse("f = lambda x: x\n").unwrap_err();
        assert_eq!(err.message, "'lambda' isn't supported in this playground");
    }

    #[test]
    fn test_invalid_assignment_targets() {
        let err = parse("f() = 3\n").unwrap_err();
        assert!(err.message.starts_with("cannot assign to function call"));

        let err = parse("print \"hi\"\n").unwrap_err();
        assert!(err.message.starts_with("Missing parentheses in call to 'print'"));
    }

    #[test]
    fn test_imports() {
        let program = parse("import math, random as r\nfrom math import sqrt, pi as PI\n").unwrap();

        assert_eq!(program.body.len(), 3);
        assert!(matches!(&program.body[1], Stmt::Import { alias: Some(a), .. } if a == "r"));
        assert!(matches!(&program.body[2], Stmt::FromImport { names, .. } if names.len() == 2));
    }
}
