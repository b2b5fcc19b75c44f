//! Corpus tests that lex every fixture template, including the expressions
//! inside tags and output statements.

use liquid_lexer::{
    tokenize, tokenize_liquid_from, Delimiters, Grammar, LexErrorKind, LexerCache, Token,
    TokenKind,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

fn get_fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("test-fixtures")
}

fn collect_liquid_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "liquid") {
                files.push(path);
            } else if path.is_dir() {
                files.extend(collect_liquid_files(&path));
            }
        }
    }
    files.sort();
    files
}

/// Lexes a template, pairing each token with the line its body starts on.
fn tokenize_with_body_lines(filename: &str, source: &str) -> Vec<(Token, usize)> {
    let mut lexer = tokenize(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.body_line())),
            Err(err) => panic!("Valid fixture {filename} failed at line {}: {err}", err.line),
        }
    }
    tokens
}

/// Lexes the expression that belongs to `tag`, if the tag has a grammar.
fn lex_tag_expression(filename: &str, tag: &str, expression: &str, line: usize) {
    if tag == "liquid" {
        let lines: Vec<Token> = tokenize_liquid_from(expression, line).collect();
        let mut lines = lines.iter().peekable();
        while let Some(line_tag) = lines.next() {
            assert_eq!(line_tag.kind, TokenKind::Tag);
            if let Some(expr) = lines.next_if(|t| t.kind == TokenKind::Expression) {
                lex_tag_expression(filename, &line_tag.value, &expr.value, expr.line);
            }
        }
        return;
    }

    let Some(grammar) = Grammar::for_tag(tag) else {
        return;
    };
    if let Some(err) = grammar
        .tokenize_from(expression, line)
        .find_map(Result::err)
    {
        panic!("{filename}: {tag} expression {expression:?} failed as {grammar}: {err}");
    }
}

#[test]
fn test_lex_all_valid_fixtures() {
    let files = collect_liquid_files(&get_fixtures_dir().join("valid"));
    assert!(!files.is_empty(), "No valid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let filename = path.file_name().unwrap().to_string_lossy();

        let tokens = tokenize_with_body_lines(&filename, &source);
        assert!(!tokens.is_empty(), "Valid fixture {filename} produced no tokens");

        let mut tokens = tokens.iter().peekable();
        while let Some((token, line)) = tokens.next() {
            match token.kind {
                TokenKind::Tag => {
                    if let Some((expr, line)) =
                        tokens.next_if(|(t, _)| t.kind == TokenKind::Expression)
                    {
                        lex_tag_expression(&filename, &token.value, &expr.value, *line);
                    }
                }
                TokenKind::Statement => {
                    let result: Result<Vec<_>, _> = Grammar::Filtered
                        .tokenize_from(&token.value, *line)
                        .collect();
                    assert!(
                        result.is_ok(),
                        "{filename}: statement {:?} failed: {:?}",
                        token.value,
                        result
                    );
                }
                TokenKind::Literal => {}
                kind => panic!("{filename}: unexpected {kind} token from the template lexer"),
            }
        }
    }
}

#[test]
fn test_lex_all_invalid_fixtures() {
    let files = collect_liquid_files(&get_fixtures_dir().join("invalid"));
    assert!(!files.is_empty(), "No invalid fixtures found");

    for path in &files {
        let source = fs::read_to_string(path).expect("Failed to read file");
        let filename = path.file_name().unwrap().to_string_lossy();

        let mut lexer = tokenize(&source);
        let err = lexer
            .by_ref()
            .find_map(Result::err)
            .unwrap_or_else(|| panic!("Invalid fixture {filename} should fail to lex"));
        assert!(
            matches!(err.kind, LexErrorKind::UnterminatedRegion { .. }),
            "{filename}: {err}"
        );
        assert_eq!(lexer.next(), None, "{filename}: lexer should stop after an error");
    }
}

#[test]
fn test_fixture_line_numbers() {
    let source = fs::read_to_string(get_fixtures_dir().join("valid/collection.liquid")).unwrap();
    let tags: Vec<_> = tokenize(&source)
        .filter_map(Result::ok)
        .filter(|t| t.kind == TokenKind::Tag)
        .map(|t| (t.value.to_string(), t.line))
        .collect();
    let expected: Vec<_> = [
        ("paginate", 1),
        ("tablerow", 2),
        ("endtablerow", 4),
        ("for", 5),
        ("cycle", 5),
        ("endfor", 5),
        ("endpaginate", 6),
        ("capture", 7),
        ("endcapture", 7),
        ("increment", 8),
    ]
    .into_iter()
    .map(|(name, line)| (name.to_string(), line))
    .collect();
    assert_eq!(tags, expected);
}

#[test]
fn test_liquid_tag_body_lines() {
    let source = fs::read_to_string(get_fixtures_dir().join("valid/liquid_tag.liquid")).unwrap();
    let tokens = tokenize_with_body_lines("liquid_tag.liquid", &source);
    let (body, line) = tokens
        .iter()
        .find(|(t, _)| t.kind == TokenKind::Expression)
        .unwrap();
    assert_eq!(body.line, 1);
    assert_eq!(*line, 2);

    let tags: Vec<_> = tokenize_liquid_from(&body.value, *line)
        .filter(|t| t.kind == TokenKind::Tag)
        .map(|t| (t.value.to_string(), t.line))
        .collect();
    let expected: Vec<_> = [
        ("assign", 2),
        ("if", 3),
        ("echo", 4),
        ("else", 5),
        ("echo", 6),
        ("endif", 7),
    ]
    .into_iter()
    .map(|(name, line)| (name.to_string(), line))
    .collect();
    assert_eq!(tags, expected);
}

/// Rebuilds canonical template text from a token stream.
fn rebuild(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        match token.kind {
            TokenKind::Literal => out.push_str(&token.value),
            TokenKind::Statement => {
                out.push_str("{{ ");
                out.push_str(&token.value);
                out.push_str(" }}");
            }
            TokenKind::Tag => {
                out.push_str("{% ");
                out.push_str(&token.value);
                if let Some(expr) = iter.next_if(|t| t.kind == TokenKind::Expression) {
                    out.push(' ');
                    out.push_str(&expr.value);
                }
                out.push_str(" %}");
            }
            kind => panic!("unexpected {kind} token"),
        }
    }
    out
}

#[test]
fn test_canonical_templates_rebuild_exactly() {
    let sources = [
        "Hello, {{ customer.name | capitalize }}!",
        "{% if a %}\n  yes\n{% elsif b %}\n  maybe\n{% else %}\n  no\n{% endif %}",
        "{% for x in (1..3) %}{{ x }},{% endfor %}",
        "plain text with { braces } and % signs",
    ];
    for source in sources {
        let tokens: Vec<Token> = tokenize(source).collect::<Result<_, _>>().unwrap();
        assert_eq!(rebuild(&tokens), source);
    }
}

#[test]
fn test_trimmed_template_rebuilds_without_whitespace() {
    let source = "<p>\n  {%- if x -%}\n    {{- x -}}\n  {%- endif -%}\n</p>";
    let tokens: Vec<Token> = tokenize(source).collect::<Result<_, _>>().unwrap();
    assert_eq!(rebuild(&tokens), "<p>{% if x %}{{ x }}{% endif %}</p>");
}

#[test]
fn test_expression_lines_follow_template_lines() {
    let source = "a\nb\n{% if x and\n  y %}";
    let tokens: Vec<Token> = tokenize(source).collect::<Result<_, _>>().unwrap();
    let expr = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Expression)
        .unwrap();
    assert_eq!(expr.line, 3);

    let lines: Vec<_> = Grammar::Boolean
        .tokenize_from(&expr.value, expr.line)
        .map(|t| t.unwrap().line)
        .collect();
    assert_eq!(lines, vec![3, 3, 4]);
}

#[test]
fn test_cache_with_custom_delimiters() {
    let cache = LexerCache::new();
    let delimiters = Delimiters::new("<%", "%>", "<%=", "%>");
    let tokens: Vec<Token> = cache
        .tokenize(&delimiters, "<%= name %> <% if x %>y<% endif %>")
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::new(1, TokenKind::Statement, "name"),
            Token::new(1, TokenKind::Literal, " "),
            Token::new(1, TokenKind::Tag, "if"),
            Token::new(1, TokenKind::Expression, "x"),
            Token::new(1, TokenKind::Literal, "y"),
            Token::new(1, TokenKind::Tag, "endif"),
        ]
    );
}
