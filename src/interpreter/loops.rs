//! Loop statement execution (`while`, `for`) and the iteration protocol.
//!
//! Adds `impl Interpreter` methods for the two loop forms. `break` and
//! `continue` are consumed here; `return` is propagated to the caller as
//! [`ControlFlow::Return`]. Every iteration counts against the step budget,
//! so an empty `while True: pass` still ends in a timeout. Built-ins that
//! consume a whole iterable at once pay for it in [`Interpreter::collect_iterable`].
//!
//! [`PyIter`] walks lists live (appending while iterating is visible, as in
//! Python) and everything else from a fixed view.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{ListRef, RangeValue, TupleRef, Value};
use crate::parser::ast::{Expr, SourceLocation, Stmt, Target};

/// An in-progress iteration over a value
pub(crate) enum PyIter {
    List { list: ListRef, index: usize },
    Tuple { tuple: TupleRef, index: usize },
    Chars { chars: Vec<char>, index: usize },
    Range { range: RangeValue, index: usize },
    Values { items: Vec<Value>, index: usize },
}

impl Iterator for PyIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            PyIter::List { list, index } => {
                let item = list.get(*index)?;
                *index += 1;
                Some(item)
            }
            PyIter::Tuple { tuple, index } => {
                let item = tuple.items().get(*index)?.clone();
                *index += 1;
                Some(item)
            }
            PyIter::Chars { chars, index } => {
                let ch = *chars.get(*index)?;
                *index += 1;
                Some(Value::str(ch.to_string()))
            }
            PyIter::Range { range, index } => {
                if *index >= range.len() {
                    return None;
                }
                let item = range.get(*index);
                *index += 1;
                Some(Value::Int(item))
            }
            PyIter::Values { items, index } => {
                let item = items.get(*index)?.clone();
                *index += 1;
                Some(item)
            }
        }
    }
}

impl Interpreter {
    /// Start iterating over `value`
    pub(crate) fn iterate(&self, value: &Value, location: SourceLocation) -> Result<PyIter, RuntimeError> {
        match value {
            Value::List(list) => Ok(PyIter::List {
                list: list.clone(),
                index: 0,
            }),
            Value::Tuple(tuple) => Ok(PyIter::Tuple {
                tuple: tuple.clone(),
                index: 0,
            }),
            Value::Str(s) => Ok(PyIter::Chars {
                chars: s.chars().collect(),
                index: 0,
            }),
            Value::Range(range) => Ok(PyIter::Range {
                range: *range,
                index: 0,
            }),
            Value::Dict(dict) => Ok(PyIter::Values {
                items: dict.keys(),
                index: 0,
            }),
            other => Err(RuntimeError::type_error(
                format!("'{}' object is not iterable", other.type_name()),
                location,
            )),
        }
    }

    /// Materialise an iterable into a vector, respecting the sequence budget.
    /// Every item counts as one step for whoever walks the result.
    pub(crate) fn collect_iterable(
        &self,
        value: &Value,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        let items: Vec<Value> = match value {
            Value::List(list) => list.snapshot(),
            Value::Tuple(tuple) => tuple.items().to_vec(),
            Value::Range(range) => {
                self.check_sequence_len(range.len(), location)?;
                self.charge(range.len(), location)?;
                return Ok(self.iterate(value, location)?.collect());
            }
            _ => self.iterate(value, location)?.collect(),
        };
        self.charge(items.len(), location)?;
        Ok(items)
    }

    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &[Stmt],
    ) -> Result<ControlFlow, RuntimeError> {
        let location = condition.location();

        loop {
            self.tick(location)?;
            if !self.evaluate(condition)?.is_truthy() {
                break;
            }
            match self.execute_block(body)? {
                ControlFlow::Break => break,
                ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                ControlFlow::Normal | ControlFlow::Continue => {}
            }
        }

        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_for(
        &mut self,
        target: &Target,
        iter: &Expr,
        body: &[Stmt],
    ) -> Result<ControlFlow, RuntimeError> {
        let location = iter.location();
        let iterable = self.evaluate(iter)?;

        for item in self.iterate(&iterable, location)? {
            self.tick(location)?;
            self.assign_target(target, item)?;
            match self.execute_block(body)? {
                ControlFlow::Break => break,
                ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                ControlFlow::Normal | ControlFlow::Continue => {}
            }
        }

        Ok(ControlFlow::Normal)
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

    #[test]
    fn test_countdown() {
        let source = "for i in range(5, 0, -1):\n    print(i)\nprint('Blast off! 🚀')\n";
        assert_eq!(output(source), "5\n4\n3\n2\n1\nBlast off! 🚀\n");
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let source = "n = 0\nwhile True:\n    n += 1\n    if n % 2 == 0:\n        continue\n    if n > 7:\n        break\n    print(n)\n";
        assert_eq!(output(source), "1\n3\n5\n7\n");
    }

    #[test]
    fn test_for_over_dict_and_string() {
        assert_eq!(output("for k in {'a': 1, 'b': 2}:\n    print(k)\n"), "a\nb\n");
        assert_eq!(output("for ch in 'hi':\n    print(ch)\n"), "h\ni\n");
    }

    #[test]
    fn test_tuple_unpacking_in_for() {
        let source = "for i, name in enumerate(['ann', 'bo']):\n    print(i, name)\n";
        assert_eq!(output(source), "0 ann\n1 bo\n");
    }

    #[test]
    fn test_return_from_inside_loop() {
        let source = "def first_even(nums):\n    for n in nums:\n        if n % 2 == 0:\n            return n\n    return None\nprint(first_even([3, 5, 8, 10]))\n";
        assert_eq!(output(source), "8\n");
    }
}
