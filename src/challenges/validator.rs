//! Validation predicates
//!
//! A [`Validator`] decides whether a failure-free run solved an exercise. It
//! sees the exact submitted source and the exact captured output, and must be
//! pure and total: the same inputs always give the same answer, and it never
//! panics.
//!
//! Closures `Fn(&str, &str) -> bool` are validators, and so are the reusable
//! predicate structs in this module, which compose with [`AllOf`] / [`AnyOf`].

use std::fmt;

/// Predicate over `(source, output)` for one exercise
pub trait Validator: Send + Sync {
    fn evaluate(&self, source: &str, output: &str) -> bool;
}

impl<F> Validator for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn evaluate(&self, source: &str, output: &str) -> bool {
        self(source, output)
    }
}

/// Output, trimmed, equals the expected text, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedOutput(pub String);

impl ExpectedOutput {
    pub fn new(expected: impl Into<String>) -> Self {
        ExpectedOutput(expected.into())
    }
}

impl Validator for ExpectedOutput {
    fn evaluate(&self, _source: &str, output: &str) -> bool {
        output.trim() == self.0.trim()
    }
}

/// Output contains the needle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputContains(pub String);

impl OutputContains {
    pub fn new(needle: impl Into<String>) -> Self {
        OutputContains(needle.into())
    }
}

impl Validator for OutputContains {
    fn evaluate(&self, _source: &str, output: &str) -> bool {
        output.contains(self.0.as_str())
    }
}

/// Output contains the needle, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputContainsIgnoreCase(String);

impl OutputContainsIgnoreCase {
    pub fn new(needle: impl Into<String>) -> Self {
        OutputContainsIgnoreCase(needle.into().to_lowercase())
    }
}

impl Validator for OutputContainsIgnoreCase {
    fn evaluate(&self, _source: &str, output: &str) -> bool {
        output.to_lowercase().contains(self.0.as_str())
    }
}

/// Output contains at least one of the words, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMentionsAny(Vec<String>);

impl OutputMentionsAny {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        OutputMentionsAny(words.into_iter().map(|w| w.into().to_lowercase()).collect())
    }
}

impl Validator for OutputMentionsAny {
    fn evaluate(&self, _source: &str, output: &str) -> bool {
        let output = output.to_lowercase();
        self.0.iter().any(|word| output.contains(word.as_str()))
    }
}

/// Submitted source contains the needle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContains(pub String);

impl SourceContains {
    pub fn new(needle: impl Into<String>) -> Self {
        SourceContains(needle.into())
    }
}

impl Validator for SourceContains {
    fn evaluate(&self, source: &str, _output: &str) -> bool {
        source.contains(self.0.as_str())
    }
}

/// Every inner validator passes
#[derive(Default)]
pub struct AllOf(Vec<Box<dyn Validator>>);

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.0.push(Box::new(validator));
        self
    }
}

impl FromIterator<Box<dyn Validator>> for AllOf {
    fn from_iter<I: IntoIterator<Item = Box<dyn Validator>>>(iter: I) -> Self {
        AllOf(iter.into_iter().collect())
    }
}

impl Validator for AllOf {
    fn evaluate(&self, source: &str, output: &str) -> bool {
        self.0.iter().all(|v| v.evaluate(source, output))
    }
}

impl fmt::Debug for AllOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllOf({} validators)", self.0.len())
    }
}

/// At least one inner validator passes
#[derive(Default)]
pub struct AnyOf(Vec<Box<dyn Validator>>);

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.0.push(Box::new(validator));
        self
    }
}

impl FromIterator<Box<dyn Validator>> for AnyOf {
    fn from_iter<I: IntoIterator<Item = Box<dyn Validator>>>(iter: I) -> Self {
        AnyOf(iter.into_iter().collect())
    }
}

impl Validator for AnyOf {
    fn evaluate(&self, source: &str, output: &str) -> bool {
        self.0.iter().any(|v| v.evaluate(source, output))
    }
}

impl fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnyOf({} validators)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_output_ignores_surrounding_whitespace() {
        let v = ExpectedOutput::new("Hello, World!");
        assert!(v.evaluate("", "Hello, World!\n"));
        assert!(v.evaluate("", "  Hello, World!  \n\n"));
        assert!(!v.evaluate("", "Hello World!\n"));
        assert!(!v.evaluate("print('Hello, World!')", ""));
    }

    #[test]
    fn test_containment() {
        assert!(OutputContains::new("30").evaluate("", "The zoo has 30 legs"));
        assert!(!OutputContains::new("30").evaluate("print(30)", ""));
        assert!(OutputContainsIgnoreCase::new("HELLO").evaluate("", "hello there"));
        assert!(OutputMentionsAny::new(["tiger", "lion"]).evaluate("", "A LION!"));
        assert!(!OutputMentionsAny::new(["tiger", "lion"]).evaluate("", "a cat"));
        assert!(SourceContains::new("for ").evaluate("for i in x:", ""));
    }

    #[test]
    fn test_closures_and_combinators() {
        let has_two_lines = |_: &str, output: &str| output.lines().count() >= 2;
        let both = AllOf::new()
            .with(has_two_lines)
            .with(OutputContains::new("Woof"));
        assert!(both.evaluate("", "Woof\nMeow\n"));
        assert!(!both.evaluate("", "Woof\n"));

        let either = AnyOf::new()
            .with(OutputContains::new("hooray"))
            .with(OutputContains::new("keep looking"));
        assert!(either.evaluate("", "keep looking!"));
        assert!(!AnyOf::new().evaluate("", "anything"));
        assert!(AllOf::new().evaluate("", ""));
    }

    #[test]
    fn test_validators_are_pure() {
        let v = OutputContainsIgnoreCase::new("potion");
        let first = v.evaluate("src", "You created a Potion!");
        for _ in 0..3 {
            assert_eq!(v.evaluate("src", "You created a Potion!"), first);
        }
    }
}
