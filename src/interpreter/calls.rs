//! Calling functions, built-ins and bound methods
//!
//! User function calls push a [`StackFrame`], bind parameters with Python's
//! argument rules, and are limited by `ExecutionLimits::max_call_depth`.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::modules;
use crate::memory::value::{Function, Value};
use crate::memory::StackFrame;
use crate::parser::ast::SourceLocation;
use std::rc::Rc;

/// `'a'`, `'a' and 'b'`, `'a', 'b', and 'c'`
fn quoted_list(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{} and {}", a, b),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

impl Interpreter {
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => self.call_function(function, args, kwargs, location),
            Value::Builtin(name) if name.contains('.') => {
                modules::call(self, name, args, kwargs, location)
            }
            Value::Builtin(name) => self.call_builtin(name, args, kwargs, location),
            Value::BoundMethod { receiver, name } => {
                self.call_method(receiver, name, args, kwargs, location)
            }
            other => Err(RuntimeError::type_error(
                format!("'{}' object is not callable", other.type_name()),
                location,
            )),
        }
    }

    pub(crate) fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.stack.depth() >= self.limits.max_call_depth {
            return Err(RuntimeError::recursion(
                "maximum recursion depth exceeded",
                location,
            ));
        }

        let bound = self.bind_arguments(function, args, kwargs, location)?;

        let def = Rc::clone(&function.def);
        self.stack.push_frame(StackFrame::new(Rc::clone(&def), location));
        for (param, value) in def.params.iter().zip(bound) {
            self.stack.bind_local(&param.name, value);
        }

        let result = self.execute_block(&def.body);
        self.stack.pop_frame();

        match result? {
            ControlFlow::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }

    /// Match positional and keyword arguments to parameters
    fn bind_arguments(
        &self,
        function: &Function,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        let def = &function.def;
        let params = &def.params;

        if args.len() > params.len() {
            let required = function.defaults.iter().filter(|d| d.is_none()).count();
            let accepted = if required == params.len() {
                plural(params.len(), "positional argument")
            } else {
                format!("from {} to {} positional arguments", required, params.len())
            };
            let given = if args.len() == 1 { "was" } else { "were" };
            return Err(RuntimeError::type_error(
                format!(
                    "{}() takes {} but {} {} given",
                    def.name,
                    accepted,
                    args.len(),
                    given
                ),
                location,
            ));
        }

        let mut slots: Vec<Option<Value>> = args.into_iter().map(Some).collect();
        slots.resize(params.len(), None);

        for (name, value) in kwargs {
            let Some(index) = params.iter().position(|p| p.name == name) else {
                return Err(RuntimeError::type_error(
                    format!("{}() got an unexpected keyword argument '{}'", def.name, name),
                    location,
                ));
            };
            if slots[index].is_some() {
                return Err(RuntimeError::type_error(
                    format!("{}() got multiple values for argument '{}'", def.name, name),
                    location,
                ));
            }
            slots[index] = Some(value);
        }

        let mut missing = Vec::new();
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                match &function.defaults[index] {
                    Some(default) => *slot = Some(default.clone()),
                    None => missing.push(params[index].name.as_str()),
                }
            }
        }

        if !missing.is_empty() {
            return Err(RuntimeError::type_error(
                format!(
                    "{}() missing {}: {}",
                    def.name,
                    plural(missing.len(), "required positional argument"),
                    quoted_list(&missing)
                ),
                location,
            ));
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::quoted_list;
    use crate::executor::ExecutionLimits;
    use crate::interpreter::engine::Interpreter;
    use crate::parser::parse_program;

    fn run(source: &str) -> Result<String, String> {
        let program = parse_program(source, 100).unwrap();
        // Test threads have small stacks; the executor's worker thread is larger
        let mut interp = Interpreter::new(ExecutionLimits::default().with_max_call_depth(40));
        match interp.run(&program) {
            Ok(()) => Ok(interp.into_output()),
            Err(err) => Err(err.raw_message()),
        }
    }

    #[test]
    fn test_quoted_list() {
        assert_eq!(quoted_list(&["a"]), "'a'");
        assert_eq!(quoted_list(&["a", "b"]), "'a' and 'b'");
        assert_eq!(quoted_list(&["a", "b", "c"]), "'a', 'b', and 'c'");
    }

    #[test]
    fn test_recursion() {
        let source = "def fact(n):\n    if n <= 1:\n        return 1\n    return n * fact(n - 1)\nprint(fact(10))\n";
        assert_eq!(run(source), Ok("3628800\n".into()));
    }

    #[test]
    fn test_runaway_recursion_is_caught() {
        let source = "def forever(n):\n    return forever(n + 1)\nforever(0)\n";
        assert_eq!(
            run(source),
            Err("RecursionError: maximum recursion depth exceeded".into())
        );
    }

    #[test]
    fn test_argument_errors() {
        let def = "def add(a, b=2):\n    return a + b\n";
        assert_eq!(
            run(&format!("{}add(1, 2, 3)\n", def)),
            Err("TypeError: add() takes from 1 to 2 positional arguments but 3 were given".into())
        );
        assert_eq!(
            run(&format!("{}add()\n", def)),
            Err("TypeError: add() missing 1 required positional argument: 'a'".into())
        );
        assert_eq!(
            run(&format!("{}add(1, c=3)\n", def)),
            Err("TypeError: add() got an unexpected keyword argument 'c'".into())
        );
        assert_eq!(
            run(&format!("{}add(1, a=3)\n", def)),
            Err("TypeError: add() got multiple values for argument 'a'".into())
        );
        assert_eq!(
            run("def f():\n    pass\nf(1)\n"),
            Err("TypeError: f() takes 0 positional arguments but 1 was given".into())
        );
    }

    #[test]
    fn test_calling_a_non_callable() {
        assert_eq!(run("x = 5\nx()\n"), Err("TypeError: 'int' object is not callable".into()));
    }

    #[test]
    fn test_function_without_return_gives_none() {
        assert_eq!(run("def f():\n    pass\nprint(f())\n"), Ok("None\n".into()));
    }
}
