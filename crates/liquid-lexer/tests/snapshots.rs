use liquid_lexer::{tokenize, Grammar, LexError, Token};
use std::fmt::Write;

fn render(tokens: impl Iterator<Item = Result<Token, LexError>>) -> String {
    let mut output = String::new();
    for token in tokens {
        match token {
            Ok(token) => writeln!(output, "{token}").unwrap(),
            Err(err) => writeln!(output, "error at line {}: {err}", err.line).unwrap(),
        }
    }
    output
}

fn template_snapshot(name: &str, source: &str) {
    let output = format!("Source:\n{}\n\nTokens:\n{}", source, render(tokenize(source)));
    insta::assert_snapshot!(name, output);
}

fn expression_snapshot(name: &str, grammar: Grammar, source: &str) {
    let output = format!(
        "Grammar: {}\nSource:\n{}\n\nTokens:\n{}",
        grammar,
        source,
        render(grammar.tokenize(source))
    );
    insta::assert_snapshot!(name, output);
}

#[test]
fn test_snapshot_if_block() {
    template_snapshot(
        "if_block",
        "{% if product.available %}\n  In stock\n{% else %}\n  Sold out\n{% endif %}",
    );
}

#[test]
fn test_snapshot_whitespace_control() {
    template_snapshot(
        "whitespace_control",
        "<ul>\n{%- for item in items -%}\n  <li>{{ item }}</li>\n{%- endfor -%}\n</ul>",
    );
}

#[test]
fn test_snapshot_raw_block() {
    template_snapshot("raw_block", "{% raw %}{{ x }}{% endraw %}\n{{ y }}");
}

#[test]
fn test_snapshot_unterminated_statement() {
    template_snapshot("unterminated_statement", "Hello\n{{ name }\n");
}

#[test]
fn test_snapshot_boolean_expression() {
    expression_snapshot(
        "boolean_expression",
        Grammar::Boolean,
        r#"x.size >= 2 and y contains "a" or not_nil != nil"#,
    );
}

#[test]
fn test_snapshot_multiline_assignment() {
    expression_snapshot(
        "multiline_assignment",
        Grammar::Assignment,
        "total =\n  price | times: 2",
    );
}
