//! The template delimiting lexer.
//!
//! Splits template source into four kinds of region, tried in this order at
//! every position:
//!
//! 1. raw blocks, `{% raw %}...{% endraw %}`, whose interior becomes one literal
//! 2. output statements, `{{ ... }}`
//! 3. tags, `{% name ... %}`
//! 4. literal text up to the next opening delimiter
//!
//! Tag and statement bodies are not scanned here. The parser hands them to an
//! expression sub-lexer once it knows which grammar applies.
//!
//! A `-` directly inside a delimiter trims whitespace from the neighbouring
//! literal: `{{- x }}` trims the literal before it and `{{ x -}}` the one after.

use crate::delimiters::Delimiters;
use crate::error::{ConfigError, LexError, LexErrorKind};
use crate::expression::newlines;
use crate::rules::PatternTable;
use crate::token::{Token, TokenKind};
use log::{debug, trace};
use once_cell::sync::Lazy;
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Raw,
    Statement,
    Tag,
    Literal,
}

static DEFAULT_RULES: Lazy<Arc<TemplateRules>> = Lazy::new(|| {
    let rules = TemplateRules::compile(Delimiters::default())
        .unwrap_or_else(|e| panic!("default template rules failed to compile: {e}"));
    Arc::new(rules)
});

/// Compiled template rules for one delimiter configuration.
///
/// Compiling is the expensive part of lexing a template; share instances
/// through a [`crate::LexerCache`] rather than compiling per template.
#[derive(Debug)]
pub struct TemplateRules {
    delimiters: Delimiters,
    table: PatternTable<Region>,
}

impl TemplateRules {
    /// Compiles the region rules for `delimiters`.
    pub fn compile(delimiters: Delimiters) -> Result<Self, ConfigError> {
        delimiters.validate()?;
        debug!("compiling template rules for {delimiters:?}");

        let tag_s = regex::escape(&delimiters.tag_start);
        let tag_e = regex::escape(&delimiters.tag_end);
        let stmt_s = regex::escape(&delimiters.statement_start);
        let stmt_e = regex::escape(&delimiters.statement_end);

        let raw = format!(r"{tag_s}\s*raw\s*{tag_e}(?P<raw>.*?){tag_s}\s*endraw\s*{tag_e}");
        let statement = format!(r"{stmt_s}-?\s*(?P<stmt>.*?)\s*(?P<rss>-?){stmt_e}");
        // `name` may be empty so that a malformed tag is still lexed as a tag.
        let tag = format!(r"{tag_s}-?\s*(?P<name>\w*)\s*(?P<expr>.*?)\s*(?P<rst>-?){tag_e}");
        // The delimiter after the literal is matched only to read its trim
        // marker. The lexer resumes at the end of the `literal` group.
        let literal = format!(r"(?P<literal>.+?)(?:(?:{tag_s}|{stmt_s})(?P<rstrip>-?)|\z)");

        let table = PatternTable::compile([
            (Region::Raw, raw.as_str()),
            (Region::Statement, statement.as_str()),
            (Region::Tag, tag.as_str()),
            (Region::Literal, literal.as_str()),
        ])?;

        Ok(Self { delimiters, table })
    }

    /// The delimiters these rules were compiled for.
    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }
}

/// A lazy token stream over one template.
///
/// Yields [`TokenKind::Literal`], [`TokenKind::Tag`], [`TokenKind::Expression`]
/// and [`TokenKind::Statement`] tokens until the end of the source or the first
/// error, after which it yields nothing.
#[derive(Debug, Clone)]
pub struct TemplateLexer<'s> {
    rules: Arc<TemplateRules>,
    source: &'s str,
    offset: usize,
    line: usize,
    /// Set by a trailing trim marker, consumed by the next literal.
    lstrip: bool,
    /// Line on which the body of the last tag or statement starts.
    body_line: usize,
    /// The expression of the last tag, emitted after its name.
    pending: Option<Token>,
    finished: bool,
}

impl<'s> TemplateLexer<'s> {
    /// Creates a lexer over `source` using compiled `rules`.
    pub fn new(rules: Arc<TemplateRules>, source: &'s str) -> Self {
        Self {
            rules,
            source,
            offset: 0,
            line: 1,
            lstrip: false,
            body_line: 1,
            pending: None,
            finished: false,
        }
    }

    /// Returns the source string being lexed.
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Returns the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the line on which the body of the most recent tag or output
    /// statement starts.
    ///
    /// Tag and statement tokens carry the line of their opening delimiter. A
    /// body that begins after a line break, as in `{% liquid\n  echo x %}`,
    /// starts further down. Pass this line to [`crate::Grammar::tokenize_from`]
    /// so that body tokens report template lines.
    pub fn body_line(&self) -> usize {
        self.body_line
    }

    fn consume(&mut self, end: usize) -> usize {
        let line = self.line;
        self.line += newlines(&self.source[self.offset..end]);
        self.offset = end;
        line
    }

    /// The line of a body group, given the line its region starts on.
    fn line_of(&self, line: usize, region: Range<usize>, body: Option<Range<usize>>) -> usize {
        match body {
            Some(body) => line + newlines(&self.source[region.start..body.start]),
            None => line,
        }
    }

    fn unterminated(&self, value: &str) -> Option<&str> {
        let delimiters = &self.rules.delimiters;
        if value.starts_with(delimiters.statement_start.as_str()) {
            Some(delimiters.statement_end.as_str())
        } else if value.starts_with(delimiters.tag_start.as_str()) {
            Some(delimiters.tag_end.as_str())
        } else {
            None
        }
    }
}

impl<'s> Iterator for TemplateLexer<'s> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(Ok(token));
        }
        if self.finished {
            return None;
        }

        loop {
            let Some(m) = self.rules.table.match_at(self.source, self.offset) else {
                self.finished = true;
                return None;
            };

            match m.rule() {
                Region::Raw => {
                    let line = self.consume(m.end());
                    let value = m.text("raw").unwrap_or_default();
                    trace!("raw block at line {line}");
                    if value.is_empty() {
                        continue;
                    }
                    return Some(Ok(Token::new(line, TokenKind::Literal, value)));
                }
                Region::Statement => {
                    let line = self.consume(m.end());
                    self.body_line = self.line_of(line, m.range(), m.span("stmt"));
                    self.lstrip = m.text("rss").is_some_and(|s| !s.is_empty());
                    let value = m.text("stmt").unwrap_or_default();
                    trace!("statement at line {line}");
                    return Some(Ok(Token::new(line, TokenKind::Statement, value)));
                }
                Region::Tag => {
                    let line = self.consume(m.end());
                    self.body_line = self.line_of(line, m.range(), m.span("expr"));
                    self.lstrip = m.text("rst").is_some_and(|s| !s.is_empty());
                    let name = m.text("name").unwrap_or_default();
                    let expr = m.text("expr").unwrap_or_default();
                    trace!("tag {name:?} at line {line}");
                    if !expr.is_empty() {
                        self.pending = Some(Token::new(line, TokenKind::Expression, expr));
                    }
                    return Some(Ok(Token::new(line, TokenKind::Tag, name)));
                }
                Region::Literal => {
                    let (Some(span), Some(mut value)) = (m.span("literal"), m.text("literal"))
                    else {
                        self.finished = true;
                        return None;
                    };
                    let line = self.consume(span.end);

                    if std::mem::take(&mut self.lstrip) {
                        value = value.trim_start();
                    }
                    if m.text("rstrip").is_some_and(|s| !s.is_empty()) {
                        value = value.trim_end();
                    }
                    if value.is_empty() {
                        continue;
                    }

                    if let Some(expected) = self.unterminated(value) {
                        let kind = LexErrorKind::UnterminatedRegion {
                            expected: expected.to_string(),
                        };
                        self.finished = true;
                        // Reported at the end of the unclosed region.
                        return Some(Err(LexError::new(kind, self.line, span)));
                    }

                    return Some(Ok(Token::new(line, TokenKind::Literal, value)));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for TemplateLexer<'_> {}

/// Tokenizes `source` with the default delimiters.
pub fn tokenize(source: &str) -> TemplateLexer<'_> {
    TemplateLexer::new(Arc::clone(&DEFAULT_RULES), source)
}
