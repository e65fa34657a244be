// Captured standard output for a single program run

use thiserror::Error;

/// Raised when a program writes more than the configured output budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("program printed more than {limit} bytes of output")]
pub struct OutputLimitExceeded {
    pub limit: usize,
}

/// In-memory terminal that collects everything `print` writes.
///
/// Each run owns its own capture, so nothing outside the interpreter ever
/// observes or redirects the host's real stdout.
#[derive(Debug, Clone)]
pub struct OutputCapture {
    buffer: String,
    limit: usize,
}

impl OutputCapture {
    pub fn new(limit: usize) -> Self {
        OutputCapture {
            buffer: String::new(),
            limit,
        }
    }

    /// Append text; a write that would exceed the budget is rejected whole
    pub fn write(&mut self, text: &str) -> Result<(), OutputLimitExceeded> {
        if self.buffer.len() + text.len() > self.limit {
            return Err(OutputLimitExceeded { limit: self.limit });
        }
        self.buffer.push_str(text);
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Default for OutputCapture {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

/// Split captured output into display lines, dropping the empty line after a trailing newline
pub fn output_lines(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output.split('\n').map(|s| s.to_string()).collect();
    if lines.last().is_some_and(|s| s.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_accumulates() {
        let mut capture = OutputCapture::new(100);
        capture.write("Hello").unwrap();
        capture.write(", tiger!\n").unwrap();

        assert_eq!(capture.as_str(), "Hello, tiger!\n");
        assert_eq!(output_lines(capture.as_str()), vec!["Hello, tiger!"]);
    }

    #[test]
    fn test_limit_rejects_whole_write() {
        let mut capture = OutputCapture::new(8);
        capture.write("1234\n").unwrap();

        let err = capture.write("56789\n").unwrap_err();
        assert_eq!(err.limit, 8);
        assert_eq!(capture.into_string(), "1234\n");
    }

    #[test]
    fn test_output_lines_keeps_inner_blank_lines() {
        assert_eq!(output_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(output_lines("").is_empty());
    }
}
