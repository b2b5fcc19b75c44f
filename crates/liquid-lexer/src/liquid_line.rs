//! Line-oriented lexer for the body of a `{% liquid %}` tag.
//!
//! Inside a `liquid` tag every line is a tag without delimiters:
//!
//! ```text
//! {% liquid
//!   assign x = 1
//!   if x > 0
//!     echo x
//!   endif
//! %}
//! ```
//!
//! Each line yields a [`TokenKind::Tag`] token for its first word and, when
//! anything follows, a [`TokenKind::Expression`] token with the rest of the
//! line, unscanned.

use crate::token::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t]*(?P<name>\w*)[ \t]*(?P<expr>.*?)[ \t\r]*$")
        .expect("liquid line pattern compiles")
});

/// A lazy token stream over the body of a `liquid` tag.
#[derive(Debug, Clone)]
pub struct LiquidLineLexer<'s> {
    lines: std::str::Split<'s, char>,
    line: usize,
    pending: Option<Token>,
}

impl<'s> LiquidLineLexer<'s> {
    /// Creates a lexer whose first line is numbered `line`.
    pub fn new(source: &'s str, line: usize) -> Self {
        Self {
            lines: source.split('\n'),
            line,
            pending: None,
        }
    }
}

impl Iterator for LiquidLineLexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        loop {
            let text = self.lines.next()?;
            let line = self.line;
            self.line += 1;

            let Some(captures) = LINE.captures(text) else {
                continue;
            };
            let name = captures.name("name").map_or("", |m| m.as_str());
            if name.is_empty() {
                continue;
            }

            let expr = captures.name("expr").map_or("", |m| m.as_str());
            if !expr.is_empty() {
                self.pending = Some(Token::new(line, TokenKind::Expression, expr));
            }
            return Some(Token::new(line, TokenKind::Tag, name));
        }
    }
}

impl std::iter::FusedIterator for LiquidLineLexer<'_> {}

/// Tokenizes the body of a `liquid` tag, numbering lines from 1.
pub fn tokenize_liquid(source: &str) -> LiquidLineLexer<'_> {
    LiquidLineLexer::new(source, 1)
}

/// Tokenizes the body of a `liquid` tag, numbering lines from `line`.
pub fn tokenize_liquid_from(source: &str, line: usize) -> LiquidLineLexer<'_> {
    LiquidLineLexer::new(source, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize_liquid(source).collect()
    }

    #[test]
    fn test_tag_and_expression() {
        assert_eq!(
            tokens("assign x = 1"),
            vec![
                Token::new(1, TokenKind::Tag, "assign"),
                Token::new(1, TokenKind::Expression, "x = 1"),
            ]
        );
    }

    #[test]
    fn test_tag_without_expression() {
        assert_eq!(
            tokens("if x\n  echo x\nendif"),
            vec![
                Token::new(1, TokenKind::Tag, "if"),
                Token::new(1, TokenKind::Expression, "x"),
                Token::new(2, TokenKind::Tag, "echo"),
                Token::new(2, TokenKind::Expression, "x"),
                Token::new(3, TokenKind::Tag, "endif"),
            ]
        );
    }

    #[test]
    fn test_blank_lines_count() {
        assert_eq!(
            tokens("\n  \ncycle 'a', 'b'\n\n\nbreak"),
            vec![
                Token::new(3, TokenKind::Tag, "cycle"),
                Token::new(3, TokenKind::Expression, "'a', 'b'"),
                Token::new(6, TokenKind::Tag, "break"),
            ]
        );
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        assert_eq!(
            tokens("\techo  product.title | upcase \t\r\n"),
            vec![
                Token::new(1, TokenKind::Tag, "echo"),
                Token::new(1, TokenKind::Expression, "product.title | upcase"),
            ]
        );
    }

    #[test]
    fn test_starting_line() {
        let tokens: Vec<_> = tokenize_liquid_from("\nassign a = b", 10).collect();
        assert_eq!(tokens[0], Token::new(11, TokenKind::Tag, "assign"));
    }

    #[test]
    fn test_empty_source() {
        assert!(tokens("").is_empty());
        assert!(tokens("\n\n").is_empty());
    }
}
