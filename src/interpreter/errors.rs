//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors or host failures).
//!
//! Every variant corresponds to a Python exception class; [`RuntimeError::exception_name`]
//! gives that class name and the `Display` impl gives the exception message, so
//! `"{name}: {message}"` reads exactly like the last line of a Python traceback.

use crate::diagnostics::FaultCategory;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// Name used before any assignment
    #[error("name '{name}' is not defined")]
    UndefinedName {
        name: String,
        location: SourceLocation,
    },

    /// Function-local name read before it was assigned
    #[error("cannot access local variable '{name}' where it is not associated with a value")]
    UnboundLocal {
        name: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Type {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Index {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    ZeroDivision {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Value {
        message: String,
        location: SourceLocation,
    },

    /// Missing dict key; `key` is the repr of the key
    #[error("{key}")]
    Key {
        key: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Attribute {
        message: String,
        location: SourceLocation,
    },

    /// `open()` always fails: there is no filesystem
    #[error("[Errno 2] No such file or directory: {path}")]
    FileNotFound {
        path: String,
        location: SourceLocation,
    },

    #[error("No module named '{name}'")]
    ModuleNotFound {
        name: String,
        location: SourceLocation,
    },

    #[error("cannot import name '{name}' from '{module}'")]
    Import {
        name: String,
        module: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Assertion {
        message: String,
        location: SourceLocation,
    },

    /// `input()` always fails: there is no stdin
    #[error("EOF when reading a line")]
    EndOfInput { location: SourceLocation },

    #[error("{message}")]
    Overflow {
        message: String,
        location: SourceLocation,
    },

    #[error("{message}")]
    Recursion {
        message: String,
        location: SourceLocation,
    },

    /// Output or sequence budget exhausted
    #[error("{message}")]
    OutOfMemory {
        message: String,
        location: SourceLocation,
    },

    /// Step or wall-clock budget exhausted
    #[error("{message}")]
    Timeout {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Type {
            message: message.into(),
            location,
        }
    }

    pub fn index_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Index {
            message: message.into(),
            location,
        }
    }

    pub fn value_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Value {
            message: message.into(),
            location,
        }
    }

    pub fn zero_division(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::ZeroDivision {
            message: message.into(),
            location,
        }
    }

    pub fn attribute_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Attribute {
            message: message.into(),
            location,
        }
    }

    pub fn overflow(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Overflow {
            message: message.into(),
            location,
        }
    }

    pub fn out_of_memory(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::OutOfMemory {
            message: message.into(),
            location,
        }
    }

    pub fn recursion(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::Recursion {
            message: message.into(),
            location,
        }
    }

    /// Python exception class name
    pub fn exception_name(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedName { .. } => "NameError",
            RuntimeError::UnboundLocal { .. } => "UnboundLocalError",
            RuntimeError::Type { .. } => "TypeError",
            RuntimeError::Index { .. } => "IndexError",
            RuntimeError::ZeroDivision { .. } => "ZeroDivisionError",
            RuntimeError::Value { .. } => "ValueError",
            RuntimeError::Key { .. } => "KeyError",
            RuntimeError::Attribute { .. } => "AttributeError",
            RuntimeError::FileNotFound { .. } => "FileNotFoundError",
            RuntimeError::ModuleNotFound { .. } => "ModuleNotFoundError",
            RuntimeError::Import { .. } => "ImportError",
            RuntimeError::Assertion { .. } => "AssertionError",
            RuntimeError::EndOfInput { .. } => "EOFError",
            RuntimeError::Overflow { .. } => "OverflowError",
            RuntimeError::Recursion { .. } => "RecursionError",
            RuntimeError::OutOfMemory { .. } => "MemoryError",
            RuntimeError::Timeout { .. } => "TimeoutError",
        }
    }

    /// Structured classification used by the diagnostics layer
    pub fn category(&self) -> FaultCategory {
        match self {
            RuntimeError::UndefinedName { .. } | RuntimeError::UnboundLocal { .. } => {
                FaultCategory::NameNotFound
            }
            RuntimeError::Type { .. } => FaultCategory::TypeMismatch,
            RuntimeError::Index { .. } => FaultCategory::IndexOutOfRange,
            RuntimeError::ZeroDivision { .. } => FaultCategory::DivisionByZero,
            RuntimeError::Value { .. } => FaultCategory::InvalidValue,
            RuntimeError::Key { .. } => FaultCategory::KeyNotFound,
            RuntimeError::Attribute { .. } => FaultCategory::AttributeNotFound,
            RuntimeError::FileNotFound { .. } => FaultCategory::FileNotFound,
            RuntimeError::Timeout { .. } => FaultCategory::Timeout,
            RuntimeError::ModuleNotFound { .. }
            | RuntimeError::Import { .. }
            | RuntimeError::Assertion { .. }
            | RuntimeError::EndOfInput { .. }
            | RuntimeError::Overflow { .. }
            | RuntimeError::Recursion { .. }
            | RuntimeError::OutOfMemory { .. } => FaultCategory::Other,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::UndefinedName { location, .. }
            | RuntimeError::UnboundLocal { location, .. }
            | RuntimeError::Type { location, .. }
            | RuntimeError::Index { location, .. }
            | RuntimeError::ZeroDivision { location, .. }
            | RuntimeError::Value { location, .. }
            | RuntimeError::Key { location, .. }
            | RuntimeError::Attribute { location, .. }
            | RuntimeError::FileNotFound { location, .. }
            | RuntimeError::ModuleNotFound { location, .. }
            | RuntimeError::Import { location, .. }
            | RuntimeError::Assertion { location, .. }
            | RuntimeError::EndOfInput { location }
            | RuntimeError::Overflow { location, .. }
            | RuntimeError::Recursion { location, .. }
            | RuntimeError::OutOfMemory { location, .. }
            | RuntimeError::Timeout { location, .. } => *location,
        }
    }

    /// `"ExceptionName: message"`, or just the name when the message is empty
    pub fn raw_message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            self.exception_name().to_string()
        } else {
            format!("{}: {}", self.exception_name(), message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_matches_python_traceback_line() {
        let err = RuntimeError::zero_division("division by zero", SourceLocation::new(1, 7));
        assert_eq!(err.raw_message(), "ZeroDivisionError: division by zero");
        assert_eq!(err.category(), FaultCategory::DivisionByZero);

        let err = RuntimeError::UndefinedName {
            name: "undefined_var".to_string(),
            location: SourceLocation::new(1, 7),
        };
        assert_eq!(err.raw_message(), "NameError: name 'undefined_var' is not defined");
    }

    #[test]
    fn test_empty_assertion_message() {
        let err = RuntimeError::Assertion {
            message: String::new(),
            location: SourceLocation::default(),
        };
        assert_eq!(err.raw_message(), "AssertionError");
    }

    #[test]
    fn test_key_error_shows_key_repr() {
        let err = RuntimeError::Key {
            key: "'banana'".to_string(),
            location: SourceLocation::default(),
        };
        assert_eq!(err.raw_message(), "KeyError: 'banana'");
        assert_eq!(err.category(), FaultCategory::KeyNotFound);
    }
}
