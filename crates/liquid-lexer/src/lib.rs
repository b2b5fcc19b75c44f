//! Lexer for Liquid templates.
//!
//! This crate provides:
//! - A template lexer that splits source into literals, tags and output statements
//! - Expression sub-lexers for the bodies of tags and statements
//! - A line lexer for the body of the `liquid` tag
//! - A cache of compiled rules keyed by delimiter configuration
//!
//! Lexing happens in two stages. [`tokenize`] finds the regions of a template
//! and leaves tag and statement bodies unscanned. A parser then picks a
//! [`Grammar`] for each body and tokenizes it on demand.
//!
//! # Example
//!
//! ```
//! use liquid_lexer::{tokenize, Grammar, TokenKind};
//!
//! let source = "{% if user.name == 'alice' %}Hi {{ user.name | upcase }}{% endif %}";
//!
//! let tokens: Vec<_> = tokenize(source).collect::<Result<_, _>>().unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Tag);
//! assert_eq!(tokens[0].value, "if");
//!
//! let grammar = Grammar::for_tag(&tokens[0].value).unwrap();
//! let condition: Vec<_> = grammar
//!     .tokenize_from(&tokens[1].value, tokens[1].line)
//!     .map(|t| t.unwrap().kind)
//!     .collect();
//! assert_eq!(
//!     condition,
//!     [
//!         TokenKind::Identifier,
//!         TokenKind::Dot,
//!         TokenKind::Identifier,
//!         TokenKind::Eq,
//!         TokenKind::String,
//!     ]
//! );
//! ```

mod cache;
mod delimiters;
mod error;
mod expression;
mod liquid_line;
mod loop_expr;
mod rules;
mod template;
mod token;

pub use cache::LexerCache;
pub use delimiters::Delimiters;
pub use error::{ConfigError, LexError, LexErrorKind, UnknownGrammar};
pub use expression::{ExpressionLexer, ExpressionRules, Grammar, Rule};
pub use liquid_line::{tokenize_liquid, tokenize_liquid_from, LiquidLineLexer};
pub use rules::{PatternTable, RuleMatch};
pub use template::{tokenize, TemplateLexer, TemplateRules};
pub use token::{Token, TokenKind};
