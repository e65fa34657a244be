//! Kid-friendly diagnostics
//!
//! Maps a raw fault description such as `ZeroDivisionError: division by zero`
//! to a fixed sentence a child can act on. Two entry points:
//!
//! - [`translate`]: substring match over the raw text, first entry in table
//!   order wins, otherwise a generic fallback that embeds the raw text.
//! - [`translate_fault`]: uses the structured [`FaultCategory`] when it has a
//!   sentence, and falls back to [`translate`] otherwise.
//!
//! Both are pure and total: every input produces a non-empty message.

use std::fmt;

/// Classification of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultCategory {
    NameNotFound,
    SyntaxMalformed,
    TypeMismatch,
    IndexOutOfRange,
    DivisionByZero,
    IndentationMalformed,
    InvalidValue,
    FileNotFound,
    KeyNotFound,
    AttributeNotFound,
    Timeout,
    Other,
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultCategory::NameNotFound => "name-not-found",
            FaultCategory::SyntaxMalformed => "syntax-malformed",
            FaultCategory::TypeMismatch => "type-mismatch",
            FaultCategory::IndexOutOfRange => "index-out-of-range",
            FaultCategory::DivisionByZero => "division-by-zero",
            FaultCategory::IndentationMalformed => "indentation-malformed",
            FaultCategory::InvalidValue => "invalid-value",
            FaultCategory::FileNotFound => "file-not-found",
            FaultCategory::KeyNotFound => "key-not-found",
            FaultCategory::AttributeNotFound => "attribute-not-found",
            FaultCategory::Timeout => "timeout",
            FaultCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// One row of the message table
#[derive(Debug, Clone, Copy)]
pub struct FriendlyMessage {
    pub token: &'static str,
    pub category: FaultCategory,
    pub sentence: &'static str,
}

/// Canned messages, in match priority order
pub const MESSAGES: &[FriendlyMessage] = &[
    FriendlyMessage {
        token: "NameError",
        category: FaultCategory::NameNotFound,
        sentence: "Oops! You're trying to use something that doesn't exist yet. Did you forget to create a variable?",
    },
    FriendlyMessage {
        token: "SyntaxError",
        category: FaultCategory::SyntaxMalformed,
        sentence: "Hmm, there's something wrong with how you wrote your code. Check for missing punctuation or spelling!",
    },
    FriendlyMessage {
        token: "TypeError",
        category: FaultCategory::TypeMismatch,
        sentence: "Oops! You're trying to mix different types of things that don't go together, like adding a number to a word.",
    },
    FriendlyMessage {
        token: "IndexError",
        category: FaultCategory::IndexOutOfRange,
        sentence: "You're trying to get an item that doesn't exist in your list. Remember, lists start counting at 0!",
    },
    FriendlyMessage {
        token: "ZeroDivisionError",
        category: FaultCategory::DivisionByZero,
        sentence: "Oops! You can't divide by zero - even computers can't do that!",
    },
    FriendlyMessage {
        token: "IndentationError",
        category: FaultCategory::IndentationMalformed,
        sentence: "Check your spacing at the beginning of the line. Python is picky about that!",
    },
    FriendlyMessage {
        token: "ValueError",
        category: FaultCategory::InvalidValue,
        sentence: "The value you're using isn't right for what you're trying to do.",
    },
    FriendlyMessage {
        token: "FileNotFoundError",
        category: FaultCategory::FileNotFound,
        sentence: "The file you're looking for doesn't exist. Check the name and location!",
    },
    FriendlyMessage {
        token: "KeyError",
        category: FaultCategory::KeyNotFound,
        sentence: "You're looking for something in a dictionary that isn't there.",
    },
    FriendlyMessage {
        token: "AttributeError",
        category: FaultCategory::AttributeNotFound,
        sentence: "You're trying to use a property or method that doesn't exist for that type of object.",
    },
    FriendlyMessage {
        token: "TimeoutError",
        category: FaultCategory::Timeout,
        sentence: "Your program ran for too long! Check for a loop that never stops.",
    },
];

fn format_message(entry: &FriendlyMessage) -> String {
    format!("{} ({})", entry.sentence, entry.token)
}

/// Translate raw fault text into a kid-friendly message
pub fn translate(raw: &str) -> String {
    MESSAGES
        .iter()
        .find(|entry| raw.contains(entry.token))
        .map(format_message)
        .unwrap_or_else(|| format!("Oops! Something went wrong: {}", raw))
}

/// Translate using the structured category first, then the raw text
pub fn translate_fault(category: FaultCategory, raw: &str) -> String {
    MESSAGES
        .iter()
        .find(|entry| entry.category == category)
        .map(format_message)
        .unwrap_or_else(|| translate(raw))
}
