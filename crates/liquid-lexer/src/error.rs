//! Lexing and configuration error types.

use std::ops::Range;
use thiserror::Error;

/// An error that aborted a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    /// The kind of error.
    pub kind: LexErrorKind,
    /// 1-indexed line number at which the error was detected.
    pub line: usize,
    /// Byte range of the offending text, relative to the string being lexed.
    pub span: Range<usize>,
}

impl LexError {
    /// Creates a new lexing error.
    pub fn new(kind: LexErrorKind, line: usize, span: Range<usize>) -> Self {
        Self { kind, line, span }
    }
}

/// The kind of lexing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that no rule of the active grammar accepts.
    #[error("unexpected {found:?}")]
    UnexpectedCharacter {
        /// The offending text.
        found: String,
    },

    /// Operator-like text with no entry in the operator table.
    #[error("unknown operator {found:?}")]
    UnknownOperator {
        /// The offending operator text.
        found: String,
    },

    /// A tag or output statement that is never closed.
    #[error("expected '{expected}', found end of input")]
    UnterminatedRegion {
        /// The closing delimiter that was expected.
        expected: String,
    },
}

/// An error raised while building a lexer configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// One of the four delimiter strings is empty.
    #[error("the {which} delimiter must not be empty")]
    EmptyDelimiter {
        /// Which delimiter was empty, e.g. `tag start`.
        which: &'static str,
    },

    /// A rule pattern failed to compile.
    #[error("invalid pattern for rule {rule}: {source}")]
    InvalidPattern {
        /// The name of the offending rule.
        rule: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// A grammar name that does not match any built-in grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown grammar {name:?}")]
pub struct UnknownGrammar {
    /// The name that was requested.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LexError::new(
            LexErrorKind::UnexpectedCharacter {
                found: "~".to_string(),
            },
            2,
            4..5,
        );
        assert_eq!(error.to_string(), "unexpected \"~\"");
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_unterminated_display() {
        let kind = LexErrorKind::UnterminatedRegion {
            expected: "}}".to_string(),
        };
        assert_eq!(kind.to_string(), "expected '}}', found end of input");
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::EmptyDelimiter { which: "tag start" };
        assert_eq!(error.to_string(), "the tag start delimiter must not be empty");
    }
}
