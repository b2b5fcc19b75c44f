//! Rendering lexing failures as miette diagnostics.

use crate::lex::LexFailure;
use liquid_lexer::LexErrorKind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A lexing failure with its source text attached.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(liquid_lex::lex))]
pub struct LexDiagnostic {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
}

impl LexDiagnostic {
    /// Builds a diagnostic for `failure` in the input called `origin`.
    pub fn new(origin: &str, failure: LexFailure) -> Self {
        let LexFailure {
            error,
            text,
            context,
        } = failure;

        let (name, message) = match &context {
            Some(context) => (
                format!("{origin} ({context}, line {})", error.line),
                format!("{error} in {context} on line {}", error.line),
            ),
            None => (origin.to_string(), format!("{error} on line {}", error.line)),
        };
        let help = match &error.kind {
            LexErrorKind::UnterminatedRegion { expected } => {
                Some(format!("close the region with '{expected}'"))
            }
            LexErrorKind::UnknownOperator { .. } => {
                Some("valid operators are ==, !=, <>, <, >, <= and >=".to_string())
            }
            LexErrorKind::UnexpectedCharacter { .. } => None,
        };

        Self {
            message,
            span: error.span.clone().into(),
            src: NamedSource::new(name, text),
            help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liquid_lexer::LexError;

    fn failure(context: Option<&str>) -> LexFailure {
        LexFailure {
            error: LexError::new(
                LexErrorKind::UnterminatedRegion {
                    expected: "}}".to_string(),
                },
                2,
                3..9,
            ),
            text: "ok\n{{ x ".to_string(),
            context: context.map(str::to_string),
        }
    }

    #[test]
    fn test_template_failure() {
        let diagnostic = LexDiagnostic::new("page.liquid", failure(None));
        assert_eq!(
            diagnostic.to_string(),
            "expected '}}', found end of input on line 2"
        );
        assert_eq!(diagnostic.src.name(), "page.liquid");
        assert_eq!(diagnostic.span, SourceSpan::from(3..9));
        assert_eq!(diagnostic.help.as_deref(), Some("close the region with '}}'"));
    }

    #[test]
    fn test_expression_failure_names_context() {
        let diagnostic = LexDiagnostic::new("page.liquid", failure(Some("`if` expression")));
        assert_eq!(
            diagnostic.to_string(),
            "expected '}}', found end of input in `if` expression on line 2"
        );
        assert_eq!(diagnostic.src.name(), "page.liquid (`if` expression, line 2)");
    }
}
