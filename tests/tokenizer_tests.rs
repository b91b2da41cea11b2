// tests/tokenizer_tests.rs

use rql_engine::error::RqlError;
use rql_engine::tokenizer::{Token, TokenKind, Tokenizer, tokenize};

fn tokens(input: &str) -> Vec<String> {
    tokenize(input).unwrap_or_else(|e| panic!("failed to tokenize {:?}: {}", input, e))
}

// ============================================================================
// Delimiters
// ============================================================================

#[test]
fn test_sibling_calls() {
    assert_eq!(
        tokens("f(a, b),f(b,c)"),
        vec!["f(", "a", "b", ")", "f(", "b", "c", ")"]
    );
}

#[test]
fn test_repeated_delimiters_collapse() {
    assert_eq!(tokens("f(,,,,a, , , , b)"), vec!["f(", "a", "b", ")"]);
    assert_eq!(tokens("f(a,,,b)"), vec!["f(", "a", "b", ")"]);
}

#[test]
fn test_whitespace_variants() {
    assert_eq!(tokens("  eq( a ,\tb\n)  "), vec!["eq(", "a", "b", ")"]);
}

#[test]
fn test_empty_input() {
    assert!(tokens("").is_empty());
    assert!(tokens(" , ,").is_empty());
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        tokens("and(eq(a,1),eq(b,2))"),
        vec!["and(", "eq(", "a", "1", ")", "eq(", "b", "2", ")", ")"]
    );
}

#[test]
fn test_operator_tokens_are_bare() {
    assert_eq!(tokens("a = b"), vec!["a", "=", "b"]);
    assert_eq!(tokens("a=b"), vec!["a=b"]);
}

// ============================================================================
// Quotes and escapes
// ============================================================================

#[test]
fn test_escaped_comma_is_literal() {
    assert_eq!(tokens("a,b\\,c"), vec!["a", "b,c"]);
}

#[test]
fn test_quoted_comma_is_literal() {
    assert_eq!(tokens("'a,b,c'"), vec!["'a,b,c'"]);
    assert_eq!(tokens("\"a b (c)\""), vec!["\"a b (c)\""]);
}

#[test]
fn test_escaped_paren_joins_identifier() {
    assert_eq!(
        tokens("fun\\(ction(a,b,c)"),
        vec!["fun(ction(", "a", "b", "c", ")"]
    );
}

#[test]
fn test_quoted_sql_argument() {
    let input = "eq(_query, \"SELECT * FROM t WHERE x IN ('a','b') AND y = 1\")";
    assert_eq!(
        tokens(input),
        vec![
            "eq(",
            "_query",
            "\"SELECT * FROM t WHERE x IN ('a','b') AND y = 1\"",
            ")"
        ]
    );
}

#[test]
fn test_double_backslash_is_literal_backslash() {
    assert_eq!(tokens("a\\\\b,c"), vec!["a\\b", "c"]);
    assert_eq!(tokens("a\\\\,b"), vec!["a\\", "b"]);
}

#[test]
fn test_escaped_quote_inside_quotes() {
    assert_eq!(tokens("eq(a,'it\\'s')"), vec!["eq(", "a", "'it's'", ")"]);
}

#[test]
fn test_other_quote_inside_quotes() {
    assert_eq!(tokens("\"it's\""), vec!["\"it's\""]);
}

#[test]
fn test_quoted_token_kinds() {
    let all: Vec<Token> = Tokenizer::new("'a' 'a'b \\'a\\'")
        .collect::<Result<_, _>>()
        .unwrap();
    let kinds: Vec<TokenKind> = all.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Quoted, TokenKind::Bare, TokenKind::Bare]);
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_malformed_inputs_fail() {
    let inputs = [
        "'hanging quote",
        "\"hanging quote",
        "hanging escape\\",
        "func(",
        "func(abc",
        ")",
        "asdfasdf)",
    ];
    for input in inputs {
        assert!(tokenize(input).is_err(), "expected failure for {:?}", input);
    }
}

#[test]
fn test_error_positions() {
    assert_eq!(
        tokenize("eq(a,'b"),
        Err(RqlError::UnterminatedQuote { quote: '\'', position: 5 })
    );
    assert_eq!(
        tokenize("abc\\"),
        Err(RqlError::TrailingEscape { position: 3 })
    );
    assert_eq!(
        tokenize("and(eq(a,1)"),
        Err(RqlError::UnclosedFunction { name: "and".into(), position: 0 })
    );
    assert_eq!(
        tokenize("f(a))"),
        Err(RqlError::UnmatchedClose { position: 4 })
    );
}

#[test]
fn test_tokens_before_error_are_yielded_lazily() {
    let mut tokenizer = Tokenizer::new("f(a, 'oops");
    assert_eq!(tokenizer.next().unwrap().unwrap().text, "f(");
    assert_eq!(tokenizer.next().unwrap().unwrap().text, "a");
    assert!(tokenizer.next().unwrap().is_err());
    assert!(tokenizer.next().is_none());
}

#[test]
fn test_bare_paren_is_its_own_token() {
    let all: Vec<Token> = Tokenizer::new("(a)").collect::<Result<_, _>>().unwrap();
    assert_eq!(all[0].kind, TokenKind::Open);
    assert_eq!(all[0].text, "(");
    assert_eq!(all[2].kind, TokenKind::Close);
}
