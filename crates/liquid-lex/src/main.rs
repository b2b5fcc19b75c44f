//! liquid-lex: Tokenize Liquid templates and expressions.

mod cli;
mod lex;
mod output;
mod report;

use camino::Utf8Path;
use clap::Parser;
use cli::Args;
use lex::RunError;
use liquid_lexer::LexerCache;
use miette::{IntoDiagnostic, Result, WrapErr};
use output::Formatter;
use report::LexDiagnostic;
use std::io::Read;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let (origin, source) = read_input(args.file.as_deref())?;
    let cache = LexerCache::new();

    match lex::run(&args, &cache, &source) {
        Ok(tokens) => {
            print!("{}", Formatter::new(args.output).format(&tokens));
            Ok(())
        }
        Err(RunError::Config(e)) => Err(e).into_diagnostic().wrap_err("invalid delimiters"),
        Err(RunError::Lex(failure)) => Err(LexDiagnostic::new(&origin, failure).into()),
    }
}

/// Reads the input file, or stdin when no file is given.
fn read_input(file: Option<&Utf8Path>) -> Result<(String, String)> {
    match file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read {path}"))?;
            Ok((path.to_string(), source))
        }
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .into_diagnostic()
                .wrap_err("failed to read stdin")?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}
