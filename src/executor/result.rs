// What one run of a learner's program produced

use crate::diagnostics::{translate_fault, FaultCategory};
use crate::interpreter::RuntimeError;
use crate::parser::ParseError;
use std::time::Duration;

/// Why a run failed, with the message a child sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureInfo {
    pub category: FaultCategory,
    /// Python exception class name, e.g. `ZeroDivisionError`
    pub exception: String,
    /// `"<ExceptionName>: <message>"`
    pub raw_message: String,
    pub translated_message: String,
    /// 1-based source line, when the fault has one
    pub line: Option<usize>,
}

impl FailureInfo {
    fn new(category: FaultCategory, exception: &str, raw_message: String, line: usize) -> Self {
        FailureInfo {
            category,
            exception: exception.to_string(),
            translated_message: translate_fault(category, &raw_message),
            raw_message,
            line: (line > 0).then_some(line),
        }
    }

    pub fn from_parse_error(err: &ParseError) -> Self {
        Self::new(
            err.category(),
            err.exception_name(),
            err.raw_message(),
            err.location.line,
        )
    }

    pub fn from_runtime_error(err: &RuntimeError) -> Self {
        Self::new(
            err.category(),
            err.exception_name(),
            err.raw_message(),
            err.location().line,
        )
    }

    /// A failure of the engine itself, such as a panic on the worker thread
    pub fn internal(message: &str) -> Self {
        Self::new(
            FaultCategory::Other,
            "InternalError",
            format!("InternalError: {}", message),
            0,
        )
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub steps: u64,
    pub elapsed: Duration,
}

/// Everything a run produced. On failure `captured_output` holds exactly
/// what was printed before the fault.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub captured_output: String,
    pub failure: Option<FailureInfo>,
    pub stats: ExecutionStats,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The kid-friendly message, if the run failed
    pub fn friendly_message(&self) -> Option<&str> {
        self.failure
            .as_ref()
            .map(|failure| failure.translated_message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failure_from_runtime_error() {
        let err = RuntimeError::zero_division("division by zero", SourceLocation::new(3, 7));
        let failure = FailureInfo::from_runtime_error(&err);

        assert_eq!(failure.category, FaultCategory::DivisionByZero);
        assert_eq!(failure.exception, "ZeroDivisionError");
        assert_eq!(failure.raw_message, "ZeroDivisionError: division by zero");
        assert_eq!(failure.line, Some(3));
        assert!(failure.translated_message.ends_with("(ZeroDivisionError)"));
    }

    #[test]
    fn test_internal_failure_uses_fallback_message() {
        let failure = FailureInfo::internal("worker thread panicked");
        assert_eq!(failure.line, None);
        assert_eq!(
            failure.translated_message,
            "Oops! Something went wrong: InternalError: worker thread panicked"
        );
    }
}
