//! Prioritized pattern tables.
//!
//! A [`PatternTable`] joins an ordered list of `(rule, pattern)` pairs into a
//! single alternation. The `regex` crate uses leftmost-first semantics, so when
//! several rules could match at the same position the one listed first wins.
//! Every lexer in this crate is a loop over [`PatternTable::match_at`].
//!
//! The alternation is anchored with `\A` and run on the input from the current
//! offset onwards, so a position where no rule matches fails without scanning
//! the rest of the input. Patterns must not look behind their start with `\b`.

use crate::error::ConfigError;
use regex::{Captures, Match, Regex, RegexBuilder};
use std::fmt;
use std::ops::Range;

/// An ordered set of rules compiled into one matcher.
#[derive(Debug, Clone)]
pub struct PatternTable<R> {
    regex: Regex,
    /// Capture group index of each rule's outer group, in rule order.
    groups: Vec<(usize, R)>,
}

impl<R: Copy + fmt::Debug> PatternTable<R> {
    /// Compiles `rules` into a single matcher. `.` matches newlines.
    ///
    /// Named groups inside the fragments stay addressable through
    /// [`RuleMatch::span`], so names must be unique across the table.
    pub fn compile<'p, I>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (R, &'p str)>,
    {
        let mut pattern = String::from(r"\A(?:");
        let mut groups = Vec::new();
        let mut next_group = 1;

        for (rule, fragment) in rules {
            // Compiled alone first to count its groups and to blame the right rule.
            let alone = Regex::new(fragment).map_err(|source| ConfigError::InvalidPattern {
                rule: format!("{rule:?}"),
                source,
            })?;

            if !groups.is_empty() {
                pattern.push('|');
            }
            pattern.push('(');
            pattern.push_str(fragment);
            pattern.push(')');

            groups.push((next_group, rule));
            // One outer group plus the fragment's own groups.
            next_group += alone.captures_len();
        }
        pattern.push(')');

        let regex = RegexBuilder::new(&pattern)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                rule: "combined table".to_string(),
                source,
            })?;

        Ok(Self { regex, groups })
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finds the highest-priority rule matching at exactly `offset`.
    ///
    /// Returns `None` at end of input, when no rule matches at `offset`, or when
    /// the match would be empty. Callers treat any of these as "cannot advance".
    pub fn match_at<'h>(&self, haystack: &'h str, offset: usize) -> Option<RuleMatch<'h, R>> {
        let rest = haystack.get(offset..)?;
        if rest.is_empty() {
            return None;
        }

        let captures = self.regex.captures(rest)?;
        let whole = captures.get(0)?;
        if whole.is_empty() {
            return None;
        }

        let rule = self
            .groups
            .iter()
            .find(|(group, _)| captures.get(*group).is_some())
            .map(|(_, rule)| *rule)?;

        Some(RuleMatch {
            rule,
            base: offset,
            whole,
            captures,
        })
    }
}

/// The result of matching a [`PatternTable`] at one position.
///
/// Ranges are byte offsets into the whole haystack, not into the tail that
/// was searched.
#[derive(Debug)]
pub struct RuleMatch<'h, R> {
    rule: R,
    base: usize,
    whole: Match<'h>,
    captures: Captures<'h>,
}

impl<'h, R: Copy> RuleMatch<'h, R> {
    /// The rule that matched.
    pub fn rule(&self) -> R {
        self.rule
    }

    /// The full matched text.
    pub fn as_str(&self) -> &'h str {
        self.whole.as_str()
    }

    /// Byte range of the full match in the haystack.
    pub fn range(&self) -> Range<usize> {
        self.base + self.whole.start()..self.base + self.whole.end()
    }

    /// Byte offset just past the full match.
    pub fn end(&self) -> usize {
        self.base + self.whole.end()
    }

    /// Byte range of a named capture group in the haystack, if it participated
    /// in the match.
    pub fn span(&self, name: &str) -> Option<Range<usize>> {
        let group = self.captures.name(name)?;
        Some(self.base + group.start()..self.base + group.end())
    }

    /// The text of a named capture group, if it participated in the match.
    pub fn text(&self, name: &str) -> Option<&'h str> {
        self.captures.name(name).map(|m| m.as_str())
    }
}
