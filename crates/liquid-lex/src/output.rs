//! Output formatting.

use crate::cli::OutputFormat;
use crate::lex::LexedToken;
use liquid_lexer::TokenKind;
use serde::Serialize;

/// A token formatted for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedToken {
    /// 1-indexed line number.
    pub line: usize,
    /// The token kind, in snake case.
    pub kind: TokenKind,
    /// The token text.
    pub value: String,
    /// Tokens of the expression body, when expanded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormattedToken>,
}

impl From<&LexedToken> for FormattedToken {
    fn from(lexed: &LexedToken) -> Self {
        Self {
            line: lexed.token.line,
            kind: lexed.token.kind,
            value: lexed.token.value.to_string(),
            children: lexed.children.iter().map(FormattedToken::from).collect(),
        }
    }
}

/// Formats token streams for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a token stream.
    pub fn format(&self, tokens: &[LexedToken]) -> String {
        match self.format {
            OutputFormat::Human => Self::format_human(tokens),
            OutputFormat::Json => Self::format_json(tokens),
        }
    }

    /// One token per line, expanded bodies indented under their token.
    fn format_human(tokens: &[LexedToken]) -> String {
        let mut output = String::new();
        Self::write_human(&mut output, tokens, 0);
        output
    }

    fn write_human(output: &mut String, tokens: &[LexedToken], depth: usize) {
        for lexed in tokens {
            output.push_str(&format!("{:indent$}{}\n", "", lexed.token, indent = depth * 4));
            Self::write_human(output, &lexed.children, depth + 1);
        }
    }

    fn format_json(tokens: &[LexedToken]) -> String {
        let formatted: Vec<FormattedToken> = tokens.iter().map(FormattedToken::from).collect();
        let mut output = serde_json::to_string_pretty(&formatted).unwrap_or_default();
        output.push('\n');
        output
    }
}
