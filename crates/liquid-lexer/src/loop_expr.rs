//! Loop expression rules.
//!
//! Loop expressions (`for` and `tablerow`) differ from the other grammars in
//! three ways: ranges use `..`, integers may be negative, and bracketed
//! subscripts are folded into single tokens. `items[0]` becomes an identifier
//! followed by an [`TokenKind::IdentIndex`] with value `0`, and
//! `items["title"]` becomes two identifiers.

use crate::expression::Rule;
use crate::rules::RuleMatch;
use crate::token::{Token, TokenKind};

const IDENTINDEX_PATTERN: &str = r"\[\s*(?P<identindex>-?\d+)\s*]";

const IDENTSTRING_PATTERN: &str =
    r#"\[\s*(?:"(?P<identdq>[^"]*)"|'(?P<identsq>[^']*)')\s*]"#;

/// `2.` with no fractional digits. The character after the point is matched
/// only to rule out a range and is not consumed.
const OPEN_FLOAT_PATTERN: &str = r"(?P<openfloat>-?\d+\.)(?:[^.]|\z)";

pub(crate) const LOOP_RULES: &[(Rule, &str)] = &[
    (Rule::Token(TokenKind::IdentIndex), IDENTINDEX_PATTERN),
    (Rule::IdentString, IDENTSTRING_PATTERN),
    (Rule::Token(TokenKind::Range), r"\.\."),
    // A point followed by another point is a range, so `1..5` is not a float.
    (Rule::Token(TokenKind::Float), r"-?\d+\.\d+"),
    (Rule::OpenFloat, OPEN_FLOAT_PATTERN),
    (Rule::Token(TokenKind::Integer), r"-?\d+\b"),
    (Rule::Token(TokenKind::Dot), r"\."),
    (Rule::Token(TokenKind::Identifier), r"[a-zA-Z_][\w\-]*\??"),
    (Rule::Token(TokenKind::LParen), r"\("),
    (Rule::Token(TokenKind::RParen), r"\)"),
    (Rule::Token(TokenKind::LBracket), r"\["),
    (Rule::Token(TokenKind::RBracket), r"]"),
    (Rule::Token(TokenKind::Colon), r":"),
    (Rule::Token(TokenKind::Pipe), r"\|"),
    (Rule::Newline, r"\n"),
    (Rule::Skip, r"[ \t\r]+"),
    (Rule::Illegal, r"."),
];

pub(crate) const LOOP_KEYWORDS: &[TokenKind] = &[
    TokenKind::In,
    TokenKind::Offset,
    TokenKind::Limit,
    TokenKind::Reversed,
    TokenKind::Cols,
    TokenKind::Continue,
];

/// Folds a bracketed subscript match into a single token.
///
/// Integer subscripts keep only the index text. Quoted subscripts are property
/// lookups and become plain identifiers.
pub(crate) fn reduce_subscript(m: &RuleMatch<'_, Rule>, line: usize) -> Token {
    match m.rule() {
        Rule::IdentString => {
            let name = m
                .text("identdq")
                .or_else(|| m.text("identsq"))
                .unwrap_or_else(|| m.as_str());
            Token::new(line, TokenKind::Identifier, name)
        }
        _ => {
            let index = m.text("identindex").unwrap_or_else(|| m.as_str());
            Token::new(line, TokenKind::IdentIndex, index)
        }
    }
}
