//! Statement execution
//!
//! Adds `impl Interpreter` methods that execute one statement or a block of
//! statements and report how control left them through [`ControlFlow`].
//! Loops live in `loops`, assignment targets in `ops::assign`.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::modules;
use crate::memory::value::{Function, Value};
use crate::parser::ast::*;
use std::rc::Rc;

impl Interpreter {
    /// Execute statements until one of them transfers control
    pub(crate) fn execute_block(&mut self, body: &[Stmt]) -> Result<ControlFlow, RuntimeError> {
        for stmt in body {
            let flow = self.execute_statement(stmt)?;
            if !matches!(flow, ControlFlow::Normal) {
                return Ok(flow);
            }
        }
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        self.tick(stmt.location())?;

        match stmt {
            Stmt::Expr { expr, .. } => {
                self.evaluate(expr)?;
            }

            Stmt::Assign { targets, value, .. } => {
                let value = self.evaluate(value)?;
                for target in targets {
                    self.assign_target(target, value.clone())?;
                }
            }

            Stmt::AugAssign {
                target,
                op,
                value,
                location,
            } => self.execute_aug_assign(target, *op, value, *location)?,

            Stmt::If {
                branches, orelse, ..
            } => {
                for (condition, body) in branches {
                    if self.evaluate(condition)?.is_truthy() {
                        return self.execute_block(body);
                    }
                }
                if let Some(orelse) = orelse {
                    return self.execute_block(orelse);
                }
            }

            Stmt::While {
                condition, body, ..
            } => return self.execute_while(condition, body),

            Stmt::For {
                target, iter, body, ..
            } => return self.execute_for(target, iter, body),

            Stmt::FunctionDef(def) => {
                let mut defaults = Vec::with_capacity(def.params.len());
                for param in &def.params {
                    defaults.push(match &param.default {
                        Some(expr) => Some(self.evaluate(expr)?),
                        None => None,
                    });
                }
                let function = Function {
                    def: Rc::clone(def),
                    defaults,
                };
                self.stack.store(&def.name, Value::Function(Rc::new(function)));
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::None,
                };
                return Ok(ControlFlow::Return(value));
            }

            Stmt::Break { .. } => return Ok(ControlFlow::Break),
            Stmt::Continue { .. } => return Ok(ControlFlow::Continue),
            Stmt::Pass { .. } | Stmt::Global { .. } => {}

            Stmt::Import {
                module,
                alias,
                location,
            } => {
                let value = modules::import(module, *location)?;
                let binding = alias.as_deref().unwrap_or(module.as_str());
                self.stack.store(binding, value);
            }

            Stmt::FromImport {
                module,
                names,
                location,
            } => {
                let Value::Module(module_name) = modules::import(module, *location)? else {
                    return Ok(ControlFlow::Normal);
                };
                for (name, alias) in names {
                    if name == "*" {
                        for (attr, value) in modules::exports(module_name) {
                            self.stack.store(attr, value);
                        }
                        continue;
                    }
                    let value = modules::attribute(module_name, name).ok_or_else(|| {
                        RuntimeError::Import {
                            name: name.clone(),
                            module: module.clone(),
                            location: *location,
                        }
                    })?;
                    self.stack.store(alias.as_deref().unwrap_or(name.as_str()), value);
                }
            }

            Stmt::Assert {
                test,
                message,
                location,
            } => {
                if !self.evaluate(test)?.is_truthy() {
                    let message = match message {
                        Some(expr) => {
                            let value = self.evaluate(expr)?;
                            self.display(&value, *location)?
                        }
                        None => String::new(),
                    };
                    return Err(RuntimeError::Assertion {
                        message,
                        location: *location,
                    });
                }
            }

            Stmt::Del { targets, .. } => {
                for target in targets {
                    self.delete_target(target)?;
                }
            }
        }

        Ok(ControlFlow::Normal)
    }

    fn execute_aug_assign(
        &mut self,
        target: &Target,
        op: BinOp,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match target {
            Target::Name(name, loc) => {
                let current = self.load_name(name, *loc)?;
                let rhs = self.evaluate(value)?;
                let result = self.inplace_op(op, current, rhs, location)?;
                self.stack.store(name, result);
            }
            Target::Subscript {
                object,
                index,
                location: loc,
            } => {
                let container = self.evaluate(object)?;
                let key = self.eval_subscript(index)?;
                let current = self.get_subscript(&container, &key, *loc)?;
                let rhs = self.evaluate(value)?;
                let result = self.inplace_op(op, current, rhs, location)?;
                self.set_subscript(&container, key, result, *loc)?;
            }
            Target::Tuple(_, loc) => {
                return Err(RuntimeError::type_error(
                    "'tuple' is an illegal expression for augmented assignment",
                    *loc,
                ))
            }
        }
        Ok(())
    }

    /// `+=` on a list extends it in place; everything else rebinds
    fn inplace_op(
        &mut self,
        op: BinOp,
        current: Value,
        rhs: Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let (BinOp::Add, Value::List(list)) = (op, &current) {
            let extra = self.collect_iterable(&rhs, location)?;
            self.check_sequence_len(list.len() + extra.len(), location)?;
            list.borrow_mut().extend(extra);
            return Ok(current);
        }
        self.binary_op(op, &current, &rhs, location)
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
    fn test_if_elif_else() {
        let source = "n = 0\nif n > 0:\n    print('pos')\nelif n < 0:\n    print('neg')\nelse:\n    print('zero')\n";
        assert_eq!(output(source), "zero\n");
    }

    #[test]
    fn test_augmented_assignment() {
        assert_eq!(output("x = 5\nx += 2\nx *= 3\nprint(x)\n"), "21\n");
        assert_eq!(output("d = {'a': 1}\nd['a'] += 4\nprint(d)\n"), "{'a': 5}\n");
    }

    #[test]
    fn test_list_plus_equals_mutates_in_place() {
        assert_eq!(output("a = [1]\nb = a\na += [2]\nprint(b)\n"), "[1, 2]\n");
    }

    #[test]
    fn test_functions_and_defaults() {
        let source = "def greet(name, greeting='Hello'):\n    return greeting + ', ' + name + '!'\nprint(greet('Sam'))\nprint(greet('Max', greeting='Hi'))\n";
        assert_eq!(output(source), "Hello, Sam!\nHi, Max!\n");
    }

    #[test]
    fn test_unbound_local() {
        let source = "count = 0\ndef bump():\n    count = count + 1\nbump()\n";
        assert_eq!(
            error(source),
            "UnboundLocalError: cannot access local variable 'count' where it is not associated with a value"
        );
    }

    #[test]
    fn test_global_statement() {
        let source = "count = 0\ndef bump():\n    global count\n    count = count + 1\nbump()\nbump()\nprint(count)\n";
        assert_eq!(output(source), "2\n");
    }

    #[test]
    fn test_imports() {
        assert_eq!(output("import math\nprint(math.sqrt(16))\n"), "4.0\n");
        assert_eq!(output("from math import pi as PI\nprint(round(PI, 2))\n"), "3.14\n");
        assert_eq!(error("import os\n"), "ModuleNotFoundError: No module named 'os'");
        assert_eq!(
            error("from math import tau2\n"),
            "ImportError: cannot import name 'tau2' from 'math'"
        );
    }

    #[test]
    fn test_assert_and_del() {
        assert_eq!(error("assert 1 == 2, 'nope'\n"), "AssertionError: nope");
        assert_eq!(error("x = 1\ndel x\nprint(x)\n"), "NameError: name 'x' is not defined");
        assert_eq!(output("a = [1, 2, 3]\ndel a[0]\nprint(a)\n"), "[2, 3]\n");
    }
}
