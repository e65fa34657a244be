//! Expression evaluation
//!
//! This module handles evaluation of every expression form:
//!
//! - Literals, f-strings and container displays
//! - Names (locals, globals, built-ins)
//! - Operators (arithmetic, comparison chains, short-circuit `and`/`or`)
//! - Calls, attribute access and subscripts
//! - List comprehensions
//!
//! Comprehension variables do not leak: whatever the target names were bound
//! to before the comprehension is restored afterwards.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::{methods, modules};
use crate::memory::value::{DictMap, DictRef, Key, Value};
use crate::memory::Lookup;
use crate::parser::ast::*;

fn target_names<'a>(target: &'a Target, names: &mut Vec<&'a str>) {
    match target {
        Target::Name(name, _) => names.push(name),
        Target::Tuple(items, _) => {
            for item in items {
                target_names(item, names);
            }
        }
        Target::Subscript { .. } => {}
    }
}

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n, _) => Ok(Value::Int(*n)),
            Expr::Float(f, _) => Ok(Value::Float(*f)),
            Expr::Str(s, _) => Ok(Value::str(s.as_str())),
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::NoneLit(_) => Ok(Value::None),
            Expr::Name(name, loc) => self.load_name(name, *loc),

            Expr::FString(pieces, loc) => {
                let mut out = String::new();
                for piece in pieces {
                    match piece {
                        FStringPiece::Literal(text) => out.push_str(text),
                        FStringPiece::Field {
                            expr,
                            conversion,
                            spec,
                        } => {
                            let value = self.evaluate(expr)?;
                            out.push_str(&self.format_field(value, *conversion, spec.as_deref(), *loc)?);
                        }
                    }
                    self.check_sequence_len(out.len(), *loc)?;
                }
                Ok(Value::str(out))
            }

            Expr::List(items, _) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item)?);
                }
                Ok(Value::list(values))
            }

            Expr::Tuple(items, _) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item)?);
                }
                Ok(Value::tuple(values))
            }

            Expr::Dict(entries, loc) => {
                let dict = DictRef::new(DictMap::default());
                for (key_expr, value_expr) in entries {
                    let key = self.evaluate(key_expr)?;
                    let value = self.evaluate(value_expr)?;
                    let hashed = self.hash_key(&key, *loc)?;
                    dict.insert(hashed, key, value);
                }
                Ok(Value::Dict(dict))
            }

            Expr::ListComp {
                element,
                target,
                iter,
                conditions,
                location,
            } => self.evaluate_list_comp(element, target, iter, conditions, *location),

            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary_op(*op, &left, &right, *location)
            }

            Expr::UnaryOp {
                op,
                operand,
                location,
            } => {
                let operand = self.evaluate(operand)?;
                self.unary_op(*op, &operand, *location)
            }

            Expr::BoolOp {
                op, left, right, ..
            } => {
                let left = self.evaluate(left)?;
                match (op, left.is_truthy()) {
                    (BoolOp::And, false) | (BoolOp::Or, true) => Ok(left),
                    _ => self.evaluate(right),
                }
            }

            Expr::Compare {
                left,
                comparisons,
                location,
            } => {
                let mut current = self.evaluate(left)?;
                for (op, right) in comparisons {
                    let right = self.evaluate(right)?;
                    if !self.compare_op(*op, &current, &right, *location)? {
                        return Ok(Value::Bool(false));
                    }
                    current = right;
                }
                Ok(Value::Bool(true))
            }

            Expr::IfExp {
                condition,
                body,
                orelse,
                ..
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(body)
                } else {
                    self.evaluate(orelse)
                }
            }

            Expr::Call {
                func,
                args,
                kwargs,
                location,
            } => {
                let callee = self.evaluate(func)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg)?);
                }
                let mut kwarg_values = Vec::with_capacity(kwargs.len());
                for (name, arg) in kwargs {
                    kwarg_values.push((name.clone(), self.evaluate(arg)?));
                }
                self.call_value(&callee, arg_values, kwarg_values, *location)
            }

            Expr::Attribute {
                object,
                name,
                location,
            } => {
                let object = self.evaluate(object)?;
                self.get_attribute(object, name, *location)
            }

            Expr::Subscript {
                object,
                index,
                location,
            } => {
                let container = self.evaluate(object)?;
                let key = self.eval_subscript(index)?;
                self.get_subscript(&container, &key, *location)
            }

            Expr::Slice { location, .. } => Err(RuntimeError::type_error(
                "a slice can only be used inside square brackets",
                *location,
            )),
        }
    }

    fn evaluate_list_comp(
        &mut self,
        element: &Expr,
        target: &Target,
        iter: &Expr,
        conditions: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let iterable = self.evaluate(iter)?;

        let mut names = Vec::new();
        target_names(target, &mut names);
        let saved: Vec<(&str, Option<Value>)> = names
            .iter()
            .map(|name| match self.stack.lookup(name) {
                Lookup::Found(value) => (*name, Some(value)),
                Lookup::Unbound | Lookup::Missing => (*name, None),
            })
            .collect();

        let result = self.collect_comprehension(element, target, &iterable, conditions, location);

        for (name, previous) in saved {
            match previous {
                Some(value) => self.stack.store(name, value),
                None => {
                    self.stack.remove(name);
                }
            }
        }

        result.map(Value::list)
    }

    fn collect_comprehension(
        &mut self,
        element: &Expr,
        target: &Target,
        iterable: &Value,
        conditions: &[Expr],
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        let mut items = Vec::new();
        'outer: for item in self.iterate(iterable, location)? {
            self.tick(location)?;
            self.assign_target(target, item)?;
            for condition in conditions {
                if !self.evaluate(condition)?.is_truthy() {
                    continue 'outer;
                }
            }
            items.push(self.evaluate(element)?);
            self.check_sequence_len(items.len(), location)?;
        }
        Ok(items)
    }

    /// `value.name`
    pub(crate) fn get_attribute(
        &self,
        value: Value,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let Value::Module(module) = value {
            return modules::attribute(module, name).ok_or_else(|| {
                RuntimeError::attribute_error(
                    format!("module '{}' has no attribute '{}'", module, name),
                    location,
                )
            });
        }

        if methods::has_method(&value, name) {
            return Ok(Value::BoundMethod {
                receiver: Box::new(value),
                name: name.into(),
            });
        }

        Err(RuntimeError::attribute_error(
            format!("'{}' object has no attribute '{}'", value.type_name(), name),
            location,
        ))
    }

    pub(crate) fn format_field(
        &self,
        value: Value,
        conversion: Option<char>,
        spec: Option<&str>,
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        let value = match conversion {
            Some('r') | Some('a') => Value::str(self.repr(&value, location)?),
            Some('s') => Value::str(self.display(&value, location)?),
            _ => value,
        };
        match spec {
            Some(spec) if !spec.is_empty() => self.format_with_spec(&value, spec, location),
            _ => self.display(&value, location),
        }
    }

    /// `str(value)`, with deep nesting reported as `RecursionError`
    pub(crate) fn display(&self, value: &Value, location: SourceLocation) -> Result<String, RuntimeError> {
        value.to_display().map_err(|_| self.too_deep(location))
    }

    /// `repr(value)`
    pub(crate) fn repr(&self, value: &Value, location: SourceLocation) -> Result<String, RuntimeError> {
        value.to_repr().map_err(|_| self.too_deep(location))
    }

    /// Dict key for `value`, or `TypeError: unhashable type`
    pub(crate) fn hash_key(&self, value: &Value, location: SourceLocation) -> Result<Key, RuntimeError> {
        value.to_key().ok_or_else(|| {
            RuntimeError::type_error(
                format!("unhashable type: '{}'", value.type_name()),
                location,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::parser::parse_program;

    fn output(source: &str) -> String {
        let program = parse_program(source, 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default());
        interp.run(&program).unwrap();
        interp.into_output()
    }

    fn error(source: &str) -> String {
        let program = parse_program(source, 100).unwrap();
        let mut interp = Interpreter::new(ExecutionLimits::default());
        interp.run(&program).unwrap_err().raw_message()
    }

    #[test]
    fn test_fstrings() {
        assert_eq!(output("name = 'Ada'\nprint(f'Hi {name}!')\n"), "Hi Ada!\n");
        assert_eq!(output("x = 3.14159\nprint(f'{x:.2f} {x!r}')\n"), "3.14 3.14159\n");
        assert_eq!(output("print(f'{7:>3}|{\"ab\":<4}|')\n"), "  7|ab  |\n");
    }

    #[test]
    fn test_short_circuit_returns_operand() {
        assert_eq!(output("print(0 or 'default')\nprint(3 and 4)\nprint([] and 1/0)\n"), "default\n4\n[]\n");
    }

    #[test]
    fn test_chained_comparison() {
        assert_eq!(output("x = 5\nprint(1 < x <= 5, 1 < x < 3)\n"), "True False\n");
    }

    #[test]
    fn test_list_comprehension_does_not_leak() {
        let source = "x = 'kept'\nsquares = [x * x for x in range(4) if x != 2]\nprint(squares, x)\n";
        assert_eq!(output(source), "[0, 1, 9] kept\n");
        assert_eq!(error("[y for y in range(3)]\nprint(y)\n"), "NameError: name 'y' is not defined");
    }

    #[test]
    fn test_attributes() {
        assert_eq!(output("s = 'hello'\nup = s.upper\nprint(up())\n"), "HELLO\n");
        assert_eq!(
            error("n = 5\nn.append(1)\n"),
            "AttributeError: 'int' object has no attribute 'append'"
        );
        assert_eq!(
            error("import math\nmath.tau2\n"),
            "AttributeError: module 'math' has no attribute 'tau2'"
        );
    }

    #[test]
    fn test_subscripts_and_slices() {
        let source = "a = [10, 20, 30, 40]\nprint(a[-1], a[1:3], a[::-1], 'hello'[1:4])\n";
        assert_eq!(output(source), "40 [20, 30] [40, 30, 20, 10] ell\n");
        assert_eq!(error("a = [1]\nprint(a[5])\n"), "IndexError: list index out of range");
        assert_eq!(error("d = {'a': 1}\nprint(d['b'])\n"), "KeyError: 'b'");
        assert_eq!(error("d = {[1]: 2}\n"), "TypeError: unhashable type: 'list'");
    }

    #[test]
    fn test_slice_assignment() {
        assert_eq!(output("a = [1, 2, 3, 4]\na[1:3] = ['x']\nprint(a)\n"), "[1, 'x', 4]\n");
        assert_eq!(output("a = [1, 2, 3, 4]\ndel a[::2]\nprint(a)\n"), "[2, 4]\n");
        assert_eq!(
            error("s = 'abc'\ns[0] = 'z'\n"),
            "TypeError: 'str' object does not support item assignment"
        );
    }
}
