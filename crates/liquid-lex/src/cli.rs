//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};
use liquid_lexer::{Delimiters, Grammar};

/// Tokenize Liquid templates and expressions.
#[derive(Debug, Parser)]
#[command(name = "liquid-lex")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Template or expression file (reads stdin when omitted)
    pub file: Option<Utf8PathBuf>,

    /// Lex the input as one expression with this grammar instead of a template
    /// (identifier, filtered, assignment, boolean, loop, include, paginate, liquid)
    #[arg(long, short, value_parser = parse_mode)]
    pub grammar: Option<ExpressionMode>,

    /// Re-lex every tag and statement body with the grammar for its tag
    #[arg(long, conflicts_with = "grammar")]
    pub expand: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Opening tag delimiter
    #[arg(long = "tag-start")]
    pub tag_start: Option<String>,

    /// Closing tag delimiter
    #[arg(long = "tag-end")]
    pub tag_end: Option<String>,

    /// Opening output statement delimiter
    #[arg(long = "statement-start")]
    pub statement_start: Option<String>,

    /// Closing output statement delimiter
    #[arg(long = "statement-end")]
    pub statement_end: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// How a standalone expression is lexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionMode {
    /// One of the built-in expression grammars.
    Grammar(Grammar),
    /// The line-oriented body of a `liquid` tag.
    Liquid,
}

fn parse_mode(value: &str) -> Result<ExpressionMode, String> {
    if value == "liquid" {
        return Ok(ExpressionMode::Liquid);
    }
    value
        .parse()
        .map(ExpressionMode::Grammar)
        .map_err(|e: liquid_lexer::UnknownGrammar| e.to_string())
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One token per line (default)
    #[default]
    Human,
    /// JSON array of tokens
    Json,
}

impl Args {
    /// Returns the delimiters selected on the command line.
    pub fn delimiters(&self) -> Delimiters {
        let mut delimiters = Delimiters::default();
        if let Some(value) = &self.tag_start {
            delimiters.tag_start = value.as_str().into();
        }
        if let Some(value) = &self.tag_end {
            delimiters.tag_end = value.as_str().into();
        }
        if let Some(value) = &self.statement_start {
            delimiters.statement_start = value.as_str().into();
        }
        if let Some(value) = &self.statement_end {
            delimiters.statement_end = value.as_str().into();
        }
        delimiters
    }

    /// Returns the log level filter for the `-v` count.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
