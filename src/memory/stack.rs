//! Name bindings and the call stack
//!
//! This module provides variable storage for one program run:
//! - [`Stack`]: module globals plus the stack of active function calls
//! - [`StackFrame`]: a single function's activation record
//! - [`Lookup`]: the result of resolving a name
//!
//! # Scoping
//!
//! Python decides at `def` time which names are local to a function
//! ([`FunctionDef::locals`]). Inside a call, those names resolve only in the
//! frame; everything else resolves in the globals. Reading a local before it
//! has been assigned is reported as [`Lookup::Unbound`].

use super::value::Value;
use crate::parser::ast::{FunctionDef, SourceLocation};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Result of resolving a name
#[derive(Debug)]
pub enum Lookup {
    Found(Value),
    /// Local to the current function but not assigned yet
    Unbound,
    Missing,
}

/// Stack frame for a function call
#[derive(Debug)]
pub struct StackFrame {
    pub function: Rc<FunctionDef>,
    pub locals: FxHashMap<String, Value>,
    pub call_location: SourceLocation,
}

impl StackFrame {
    pub fn new(function: Rc<FunctionDef>, call_location: SourceLocation) -> Self {
        StackFrame {
            function,
            locals: FxHashMap::default(),
            call_location,
        }
    }

    fn owns(&self, name: &str) -> bool {
        self.function.locals.contains(name)
    }
}

/// Globals plus the call stack
#[derive(Debug, Default)]
pub struct Stack {
    globals: FxHashMap<String, Value>,
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    /// Number of active function calls
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Resolve a name in the current scope
    pub fn lookup(&self, name: &str) -> Lookup {
        if let Some(frame) = self.frames.last() {
            if frame.owns(name) {
                return match frame.locals.get(name) {
                    Some(value) => Lookup::Found(value.clone()),
                    None => Lookup::Unbound,
                };
            }
        }

        match self.globals.get(name) {
            Some(value) => Lookup::Found(value.clone()),
            None => Lookup::Missing,
        }
    }

    /// Bind a name in the current scope
    pub fn store(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.owns(name) {
                frame.locals.insert(name.to_string(), value);
                return;
            }
        }
        self.globals.insert(name.to_string(), value);
    }

    /// Remove a binding, returning the old value if there was one
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        if let Some(frame) = self.frames.last_mut() {
            if frame.owns(name) {
                return frame.locals.remove(name);
            }
        }
        self.globals.remove(name)
    }

    /// Bind a parameter directly in the newest frame
    pub fn bind_local(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.locals.insert(name.to_string(), value);
        }
    }

    /// Drop every binding; dropping happens iteratively through the value handles
    pub fn clear(&mut self) {
        self.frames.clear();
        self.globals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Expr, Param, Stmt, Target};

    fn function(name: &str, assigned: &[&str]) -> Rc<FunctionDef> {
        let loc = SourceLocation::new(1, 1);
        let body = assigned
            .iter()
            .map(|n| Stmt::Assign {
                targets: vec![Target::Name(n.to_string(), loc)],
                value: Expr::Int(0, loc),
                location: loc,
            })
            .collect();
        let params = vec![Param {
            name: "arg".to_string(),
            default: None,
        }];
        Rc::new(FunctionDef::new(name.to_string(), params, body, loc))
    }

    #[test]
    fn test_globals_visible_inside_function() {
        let mut stack = Stack::new();
        stack.store("score", Value::Int(10));
        stack.push_frame(StackFrame::new(function("f", &[]), SourceLocation::default()));

        assert!(matches!(stack.lookup("score"), Lookup::Found(Value::Int(10))));
        assert!(matches!(stack.lookup("nothing"), Lookup::Missing));
    }

    #[test]
    fn test_assigned_names_are_local() {
        let mut stack = Stack::new();
        stack.store("total", Value::Int(1));
        stack.push_frame(StackFrame::new(function("f", &["total"]), SourceLocation::default()));

        assert!(matches!(stack.lookup("total"), Lookup::Unbound));

        stack.store("total", Value::Int(5));
        assert!(matches!(stack.lookup("total"), Lookup::Found(Value::Int(5))));

        stack.pop_frame();
        assert!(matches!(stack.lookup("total"), Lookup::Found(Value::Int(1))));
    }
}
