//! Runs the lexers selected on the command line.

use crate::cli::{Args, ExpressionMode};
use liquid_lexer::{
    tokenize_liquid_from, ConfigError, Delimiters, Grammar, LexError, LexerCache, Token,
    TokenKind,
};
use log::debug;
use thiserror::Error;

/// A token and, when expanded, the tokens of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedToken {
    /// The token itself.
    pub token: Token,
    /// Tokens of the expression or statement body. Empty unless expanded.
    pub children: Vec<LexedToken>,
}

impl LexedToken {
    fn leaf(token: Token) -> Self {
        Self {
            token,
            children: Vec::new(),
        }
    }
}

/// A lexing error together with the text its span points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexFailure {
    /// The error reported by the lexer.
    pub error: LexError,
    /// The string that was being lexed when the error occurred.
    pub text: String,
    /// Where `text` came from, e.g. "`if` expression", or `None` for the whole input.
    pub context: Option<String>,
}

impl LexFailure {
    fn new(error: LexError, text: &str, context: Option<String>) -> Self {
        Self {
            error,
            text: text.to_string(),
            context,
        }
    }
}

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The delimiters given on the command line are unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input did not lex.
    #[error("{}", .0.error)]
    Lex(LexFailure),
}

impl From<LexFailure> for RunError {
    fn from(failure: LexFailure) -> Self {
        RunError::Lex(failure)
    }
}

/// Lexes `source` as selected by `args`.
pub fn run(args: &Args, cache: &LexerCache, source: &str) -> Result<Vec<LexedToken>, RunError> {
    let tokens = match args.grammar {
        Some(mode) => lex_expression(mode, source)?,
        None => lex_template(cache, &args.delimiters(), source, args.expand)?,
    };
    debug!("lexed {} top-level tokens", tokens.len());
    Ok(tokens)
}

fn lex_expression(mode: ExpressionMode, source: &str) -> Result<Vec<LexedToken>, LexFailure> {
    match mode {
        ExpressionMode::Grammar(grammar) => grammar
            .tokenize(source)
            .map(|token| token.map(LexedToken::leaf))
            .collect::<Result<_, _>>()
            .map_err(|error| LexFailure::new(error, source, None)),
        ExpressionMode::Liquid => Ok(tokenize_liquid_from(source, 1)
            .map(LexedToken::leaf)
            .collect()),
    }
}

fn lex_template(
    cache: &LexerCache,
    delimiters: &Delimiters,
    source: &str,
    expand: bool,
) -> Result<Vec<LexedToken>, RunError> {
    let mut tokens = Vec::new();
    let mut tag = String::new();
    let mut lexer = cache.tokenize(delimiters, source)?;

    while let Some(token) = lexer.next() {
        let token = token.map_err(|error| LexFailure::new(error, source, None))?;
        let line = lexer.body_line();
        let children = match token.kind {
            TokenKind::Statement if expand => {
                lex_body(Grammar::Filtered, "output statement", &token.value, line)?
            }
            TokenKind::Expression if expand => expand_expression(&tag, &token.value, line)?,
            _ => Vec::new(),
        };
        if token.kind == TokenKind::Tag {
            tag = token.value.to_string();
        }
        tokens.push(LexedToken { token, children });
    }

    Ok(tokens)
}

/// Lexes the expression of `tag`, starting on template line `line`, with the
/// grammar routed to it.
///
/// The body of a `liquid` tag is split into lines first, and each line's
/// expression is expanded in turn.
fn expand_expression(
    tag: &str,
    expression: &str,
    line: usize,
) -> Result<Vec<LexedToken>, LexFailure> {
    if tag == "liquid" {
        let mut lines = Vec::new();
        let mut line_tag = String::new();
        for token in tokenize_liquid_from(expression, line) {
            let children = match token.kind {
                TokenKind::Expression => expand_expression(&line_tag, &token.value, token.line)?,
                _ => {
                    line_tag = token.value.to_string();
                    Vec::new()
                }
            };
            lines.push(LexedToken { token, children });
        }
        return Ok(lines);
    }

    match Grammar::for_tag(tag) {
        Some(grammar) => lex_body(grammar, &format!("`{tag}` expression"), expression, line),
        None => {
            debug!("no grammar for tag {tag:?}, leaving its expression unexpanded");
            Ok(Vec::new())
        }
    }
}

fn lex_body(
    grammar: Grammar,
    context: &str,
    body: &str,
    line: usize,
) -> Result<Vec<LexedToken>, LexFailure> {
    grammar
        .tokenize_from(body, line)
        .map(|token| token.map(LexedToken::leaf))
        .collect::<Result<_, _>>()
        .map_err(|error| LexFailure::new(error, body, Some(context.to_string())))
}
