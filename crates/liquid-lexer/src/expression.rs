//! Expression sub-lexers.
//!
//! The template lexer leaves the body of every tag and output statement
//! unscanned. The parser hands each body to one of the grammars below, chosen
//! by the tag that owns it (see [`Grammar::for_tag`]). All grammars share one
//! emission loop, [`ExpressionLexer`], and differ only in rule order and
//! keyword set.

use crate::error::{ConfigError, LexError, LexErrorKind, UnknownGrammar};
use crate::loop_expr;
use crate::rules::{PatternTable, RuleMatch};
use crate::token::{Token, TokenKind};
use log::trace;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// How the emission loop treats a rule's matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Emit a token of this kind.
    ///
    /// `Identifier` matches are checked against the grammar's keywords, `String`
    /// matches are unquoted and `IdentIndex` matches lose their brackets.
    Token(TokenKind),
    /// A bracketed, quoted property name, emitted as an identifier.
    IdentString,
    /// A float with no digits after the point, taken from the `openfloat`
    /// group. Lexing resumes at the end of that group.
    OpenFloat,
    /// Operator-like text, mapped through [`TokenKind::operator`].
    Operator,
    /// A line break. Advances the line counter.
    Newline,
    /// Insignificant whitespace.
    Skip,
    /// Catch-all for characters no other rule accepts.
    Illegal,
}

/// A double- or single-quoted string. The unquoted text is in `dquoted` or `squoted`.
pub(crate) const STRING_PATTERN: &str = r#""(?P<dquoted>[^"]*)"|'(?P<squoted>[^']*)'"#;

const IDENTIFIER_PATTERN: &str = r"\w[a-zA-Z0-9_\-]*";

/// Identifiers in boolean and include expressions may end in `?`.
const QUESTION_IDENTIFIER_PATTERN: &str = r"\w[a-zA-Z0-9_\-?]*";

const IDENTIFIER_RULES: &[(Rule, &str)] = &[
    (Rule::Token(TokenKind::Integer), r"\d+"),
    (Rule::Token(TokenKind::String), STRING_PATTERN),
    (Rule::Token(TokenKind::Identifier), IDENTIFIER_PATTERN),
    (Rule::Token(TokenKind::Dot), r"\."),
    (Rule::Token(TokenKind::LBracket), r"\["),
    (Rule::Token(TokenKind::RBracket), r"]"),
    (Rule::Newline, r"\n"),
    (Rule::Skip, r"[ \t]+"),
    (Rule::Illegal, r"."),
];

const FILTERED_RULES: &[(Rule, &str)] = &[
    (Rule::Token(TokenKind::Float), r"\d+\.\d*"),
    (Rule::Token(TokenKind::Integer), r"\d+"),
    (Rule::Token(TokenKind::Negative), r"-"),
    (Rule::Token(TokenKind::String), STRING_PATTERN),
    (Rule::Token(TokenKind::Identifier), IDENTIFIER_PATTERN),
    (Rule::Token(TokenKind::Dot), r"\."),
    (Rule::Token(TokenKind::Comma), r","),
    (Rule::Token(TokenKind::LBracket), r"\["),
    (Rule::Token(TokenKind::RBracket), r"]"),
    (Rule::Token(TokenKind::Colon), r":"),
    (Rule::Token(TokenKind::Pipe), r"\|"),
    (Rule::Newline, r"\n"),
    (Rule::Skip, r"[ \t]+"),
    (Rule::Illegal, r"."),
];

const ASSIGN_RULE: (Rule, &str) = (Rule::Token(TokenKind::Assign), r"=");

const BOOLEAN_RULES: &[(Rule, &str)] = &[
    (Rule::Token(TokenKind::Float), r"\d+\.\d*"),
    (Rule::Token(TokenKind::Integer), r"\d+"),
    (Rule::Token(TokenKind::Negative), r"-"),
    (Rule::Token(TokenKind::String), STRING_PATTERN),
    (Rule::Token(TokenKind::Identifier), QUESTION_IDENTIFIER_PATTERN),
    (Rule::Token(TokenKind::Dot), r"\."),
    (Rule::Token(TokenKind::LBracket), r"\["),
    (Rule::Token(TokenKind::RBracket), r"]"),
    (Rule::Token(TokenKind::Colon), r":"),
    (Rule::Newline, r"\n"),
    (Rule::Operator, r"[!=<>]{1,2}"),
    (Rule::Skip, r"[ \t]+"),
    (Rule::Illegal, r"."),
];

const INCLUDE_RULES: &[(Rule, &str)] = &[
    (Rule::Token(TokenKind::Float), r"\d+\.\d*"),
    (Rule::Token(TokenKind::Integer), r"\d+"),
    (Rule::Token(TokenKind::Negative), r"-"),
    (Rule::Token(TokenKind::String), STRING_PATTERN),
    (Rule::Token(TokenKind::Identifier), QUESTION_IDENTIFIER_PATTERN),
    (Rule::Token(TokenKind::Dot), r"\."),
    (Rule::Token(TokenKind::Comma), r","),
    (Rule::Token(TokenKind::LBracket), r"\["),
    (Rule::Token(TokenKind::RBracket), r"]"),
    (Rule::Token(TokenKind::Colon), r":"),
    (Rule::Newline, r"\n"),
    (Rule::Skip, r"[ \t]+"),
    (Rule::Illegal, r"."),
];

const LITERAL_KEYWORDS: &[TokenKind] = &[
    TokenKind::True,
    TokenKind::False,
    TokenKind::Nil,
    TokenKind::Empty,
];

const BOOLEAN_KEYWORDS: &[TokenKind] = &[
    TokenKind::True,
    TokenKind::False,
    TokenKind::Nil,
    TokenKind::Empty,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Contains,
];

const INCLUDE_KEYWORDS: &[TokenKind] = &[
    TokenKind::True,
    TokenKind::False,
    TokenKind::Nil,
    TokenKind::Empty,
    TokenKind::With,
    TokenKind::For,
    TokenKind::As,
];

fn compiled<'p>(
    name: &'static str,
    rules: impl IntoIterator<Item = (Rule, &'p str)>,
    keywords: &[TokenKind],
) -> ExpressionRules {
    ExpressionRules::new(name, rules, keywords)
        .unwrap_or_else(|e| panic!("built-in {name} grammar failed to compile: {e}"))
}

static IDENTIFIER: Lazy<ExpressionRules> =
    Lazy::new(|| compiled("identifier", IDENTIFIER_RULES.iter().copied(), &[]));

static FILTERED: Lazy<ExpressionRules> =
    Lazy::new(|| compiled("filtered", FILTERED_RULES.iter().copied(), LITERAL_KEYWORDS));

static ASSIGNMENT: Lazy<ExpressionRules> = Lazy::new(|| {
    let rules = std::iter::once(ASSIGN_RULE).chain(FILTERED_RULES.iter().copied());
    compiled("assignment", rules, LITERAL_KEYWORDS)
});

static BOOLEAN: Lazy<ExpressionRules> =
    Lazy::new(|| compiled("boolean", BOOLEAN_RULES.iter().copied(), BOOLEAN_KEYWORDS));

static LOOP: Lazy<ExpressionRules> = Lazy::new(|| {
    compiled(
        "loop",
        loop_expr::LOOP_RULES.iter().copied(),
        loop_expr::LOOP_KEYWORDS,
    )
});

static INCLUDE: Lazy<ExpressionRules> =
    Lazy::new(|| compiled("include", INCLUDE_RULES.iter().copied(), INCLUDE_KEYWORDS));

static PAGINATE: Lazy<ExpressionRules> = Lazy::new(|| {
    compiled(
        "paginate",
        IDENTIFIER_RULES.iter().copied(),
        &[TokenKind::By],
    )
});

/// A compiled expression grammar: an ordered rule table plus a keyword set.
#[derive(Debug, Clone)]
pub struct ExpressionRules {
    name: &'static str,
    table: PatternTable<Rule>,
    keywords: FxHashMap<&'static str, TokenKind>,
}

impl ExpressionRules {
    /// Compiles a grammar from ordered rules and the keyword kinds it recognizes.
    ///
    /// The last rule should be an [`Rule::Illegal`] catch-all so that every
    /// character is accounted for. Kinds in `keywords` that are not keywords are
    /// ignored.
    pub fn new<'p>(
        name: &'static str,
        rules: impl IntoIterator<Item = (Rule, &'p str)>,
        keywords: &[TokenKind],
    ) -> Result<Self, ConfigError> {
        let table = PatternTable::compile(rules)?;
        let keywords = keywords
            .iter()
            .filter_map(|kind| kind.keyword().map(|text| (text, *kind)))
            .collect();
        Ok(Self {
            name,
            table,
            keywords,
        })
    }

    /// The grammar's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the keyword kind for `text`, if it is a keyword of this grammar.
    pub fn keyword(&self, text: &str) -> Option<TokenKind> {
        self.keywords.get(text).copied()
    }

    /// Tokenizes `source`, numbering lines from 1.
    pub fn tokenize<'s>(&self, source: &'s str) -> ExpressionLexer<'_, 's> {
        self.tokenize_from(source, 1)
    }

    /// Tokenizes `source`, numbering lines from `line`.
    pub fn tokenize_from<'s>(&self, source: &'s str, line: usize) -> ExpressionLexer<'_, 's> {
        ExpressionLexer {
            rules: self,
            source,
            offset: 0,
            line,
            finished: false,
        }
    }
}

/// A lazy token stream over one expression.
///
/// Yields tokens until the end of the expression or the first error, after
/// which it yields nothing.
#[derive(Debug, Clone)]
pub struct ExpressionLexer<'r, 's> {
    rules: &'r ExpressionRules,
    source: &'s str,
    offset: usize,
    line: usize,
    finished: bool,
}

impl<'r, 's> ExpressionLexer<'r, 's> {
    /// Returns the source string being lexed.
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Returns the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    fn fail(&mut self, kind: LexErrorKind, line: usize, span: std::ops::Range<usize>) -> LexError {
        self.finished = true;
        LexError::new(kind, line, span)
    }

    fn emit(&self, m: &RuleMatch<'s, Rule>, kind: TokenKind, line: usize) -> Token {
        match kind {
            TokenKind::Identifier => {
                let text = m.as_str();
                Token::new(line, self.rules.keyword(text).unwrap_or(kind), text)
            }
            TokenKind::String => Token::new(line, kind, unquoted(m)),
            _ => Token::new(line, kind, m.as_str()),
        }
    }
}

impl<'r, 's> Iterator for ExpressionLexer<'r, 's> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(m) = self.rules.table.match_at(self.source, self.offset) else {
                self.finished = true;
                // Only reachable for grammars without a catch-all rule.
                let rest = self.source.get(self.offset..)?;
                let found = rest.chars().next()?;
                let span = self.offset..self.offset + found.len_utf8();
                return Some(Err(self.fail(
                    LexErrorKind::UnexpectedCharacter {
                        found: found.to_string(),
                    },
                    self.line,
                    span,
                )));
            };

            let end = match m.rule() {
                Rule::OpenFloat => m.span("openfloat").map_or(m.end(), |span| span.end),
                _ => m.end(),
            };
            let line = self.line;
            self.line += newlines(&self.source[self.offset..end]);
            self.offset = end;

            let token = match m.rule() {
                Rule::Token(TokenKind::IdentIndex) | Rule::IdentString => {
                    loop_expr::reduce_subscript(&m, line)
                }
                Rule::Token(kind) => self.emit(&m, kind, line),
                Rule::OpenFloat => {
                    let value = m.text("openfloat").unwrap_or_else(|| m.as_str());
                    Token::new(line, TokenKind::Float, value)
                }
                Rule::Operator => match TokenKind::operator(m.as_str()) {
                    Some(kind) => Token::new(line, kind, m.as_str()),
                    None => {
                        let kind = LexErrorKind::UnknownOperator {
                            found: m.as_str().to_string(),
                        };
                        return Some(Err(self.fail(kind, line, m.range())));
                    }
                },
                Rule::Newline | Rule::Skip => continue,
                Rule::Illegal => {
                    let kind = LexErrorKind::UnexpectedCharacter {
                        found: m.as_str().to_string(),
                    };
                    return Some(Err(self.fail(kind, line, m.range())));
                }
            };

            return Some(Ok(token));
        }
    }
}

impl std::iter::FusedIterator for ExpressionLexer<'_, '_> {}

/// The unquoted text of a [`STRING_PATTERN`] match.
fn unquoted<'h>(m: &RuleMatch<'h, Rule>) -> &'h str {
    m.text("dquoted")
        .or_else(|| m.text("squoted"))
        .unwrap_or_else(|| m.as_str())
}

pub(crate) fn newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

/// The built-in expression grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Dotted and bracketed identifier paths, e.g. `capture` and `increment` names.
    Identifier,
    /// An expression followed by zero or more filters, as in output statements.
    Filtered,
    /// `name = <filtered expression>`.
    Assignment,
    /// Comparisons joined by `and` and `or`.
    Boolean,
    /// `for` and `tablerow` loop expressions, including ranges.
    Loop,
    /// `include` and `render` arguments.
    Include,
    /// `paginate <path> by <n>`.
    Paginate,
}

impl Grammar {
    /// Every built-in grammar.
    pub const ALL: [Grammar; 7] = [
        Grammar::Identifier,
        Grammar::Filtered,
        Grammar::Assignment,
        Grammar::Boolean,
        Grammar::Loop,
        Grammar::Include,
        Grammar::Paginate,
    ];

    /// The name used to select this grammar, e.g. on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Identifier => "identifier",
            Grammar::Filtered => "filtered",
            Grammar::Assignment => "assignment",
            Grammar::Boolean => "boolean",
            Grammar::Loop => "loop",
            Grammar::Include => "include",
            Grammar::Paginate => "paginate",
        }
    }

    /// The compiled rules for this grammar.
    pub fn rules(&self) -> &'static ExpressionRules {
        match self {
            Grammar::Identifier => &IDENTIFIER,
            Grammar::Filtered => &FILTERED,
            Grammar::Assignment => &ASSIGNMENT,
            Grammar::Boolean => &BOOLEAN,
            Grammar::Loop => &LOOP,
            Grammar::Include => &INCLUDE,
            Grammar::Paginate => &PAGINATE,
        }
    }

    /// The grammar of the expression that follows a standard tag, if it has one.
    ///
    /// Output statements use [`Grammar::Filtered`]. The `liquid` tag has its own
    /// line-oriented lexer, see [`crate::tokenize_liquid`].
    pub fn for_tag(tag: &str) -> Option<Grammar> {
        let grammar = match tag {
            "if" | "elsif" | "unless" => Grammar::Boolean,
            "for" | "tablerow" => Grammar::Loop,
            "assign" => Grammar::Assignment,
            "echo" | "cycle" | "case" | "when" => Grammar::Filtered,
            "include" | "render" => Grammar::Include,
            "paginate" => Grammar::Paginate,
            "capture" | "increment" | "decrement" => Grammar::Identifier,
            _ => return None,
        };
        Some(grammar)
    }

    /// Tokenizes `source`, numbering lines from 1.
    pub fn tokenize(self, source: &str) -> ExpressionLexer<'static, '_> {
        self.tokenize_from(source, 1)
    }

    /// Tokenizes `source`, numbering lines from `line`.
    ///
    /// Pass the line of the owning tag so tokens report template line numbers.
    pub fn tokenize_from(self, source: &str, line: usize) -> ExpressionLexer<'static, '_> {
        trace!("tokenizing {} bytes as a {} expression", source.len(), self);
        self.rules().tokenize_from(source, line)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Grammar {
    type Err = UnknownGrammar;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grammar::ALL
            .into_iter()
            .find(|grammar| grammar.name() == s)
            .ok_or_else(|| UnknownGrammar {
                name: s.to_string(),
            })
    }
}
