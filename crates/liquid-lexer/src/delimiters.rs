//! Delimiter configuration for the template lexer.

use crate::error::ConfigError;
use smol_str::SmolStr;

/// The four strings that open and close tags and output statements.
///
/// Delimiters are matched literally. Two configurations that compare equal
/// share one compiled rule set in a [`crate::LexerCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Delimiters {
    /// Opens a tag. Defaults to `{%`.
    pub tag_start: SmolStr,
    /// Closes a tag. Defaults to `%}`.
    pub tag_end: SmolStr,
    /// Opens an output statement. Defaults to `{{`.
    pub statement_start: SmolStr,
    /// Closes an output statement. Defaults to `}}`.
    pub statement_end: SmolStr,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            tag_start: SmolStr::new_static("{%"),
            tag_end: SmolStr::new_static("%}"),
            statement_start: SmolStr::new_static("{{"),
            statement_end: SmolStr::new_static("}}"),
        }
    }
}

impl Delimiters {
    /// Creates a delimiter configuration from all four strings.
    pub fn new(
        tag_start: impl Into<SmolStr>,
        tag_end: impl Into<SmolStr>,
        statement_start: impl Into<SmolStr>,
        statement_end: impl Into<SmolStr>,
    ) -> Self {
        Self {
            tag_start: tag_start.into(),
            tag_end: tag_end.into(),
            statement_start: statement_start.into(),
            statement_end: statement_end.into(),
        }
    }

    /// Replaces the tag delimiters.
    pub fn with_tag(mut self, start: impl Into<SmolStr>, end: impl Into<SmolStr>) -> Self {
        self.tag_start = start.into();
        self.tag_end = end.into();
        self
    }

    /// Replaces the output statement delimiters.
    pub fn with_statement(mut self, start: impl Into<SmolStr>, end: impl Into<SmolStr>) -> Self {
        self.statement_start = start.into();
        self.statement_end = end.into();
        self
    }

    /// Checks that no delimiter is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("tag start", &self.tag_start),
            ("tag end", &self.tag_end),
            ("statement start", &self.statement_start),
            ("statement end", &self.statement_end),
        ];
        for (which, value) in fields {
            if value.is_empty() {
                return Err(ConfigError::EmptyDelimiter { which });
            }
        }
        Ok(())
    }
}
