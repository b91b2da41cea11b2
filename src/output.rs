//! JSON rendering of tokens and term trees.
//!
//! Calls render as `{"function": name, "args": [...]}`; leaves render as
//! `{"token": text, "type": kind, "value": typed}` where `type` is one of
//! `null`, `bool`, `number`, `text` or `identifier`.
//!
//! ```
//! use rql_engine::{output, parse};
//!
//! let tree = parse("eq(price,10)").unwrap();
//! assert_eq!(
//!     output::to_json(&output::tree_to_json(&tree)),
//!     r#"[{"args":[{"token":"price","type":"identifier","value":"price"},{"token":"10","type":"number","value":10}],"function":"eq"}]"#
//! );
//! ```

use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value, json};

use crate::{
    ast::{Literal, TermRef, TermTree},
    tokenizer::{Token, TokenKind},
};

pub fn term_to_json(term: TermRef<'_>) -> Value {
    if term.is_call() {
        json!({
            "function": term.token(),
            "args": term.terms().map(term_to_json).collect::<Vec<_>>(),
        })
    } else {
        let (kind, value) = literal_to_json(term.literal());
        let mut leaf = Map::new();
        leaf.insert("token".to_string(), Value::String(term.token().to_string()));
        leaf.insert("type".to_string(), Value::String(kind.to_string()));
        leaf.insert("value".to_string(), value);
        Value::Object(leaf)
    }
}

/// All root terms of a tree, in order.
pub fn tree_to_json(tree: &TermTree) -> Value {
    Value::Array(tree.roots().iter().map(|&id| term_to_json(tree.get(id))).collect())
}

pub fn tokens_to_json(tokens: &[Token]) -> Value {
    Value::Array(
        tokens
            .iter()
            .map(|t| {
                json!({
                    "text": t.text,
                    "kind": kind_name(t.kind),
                    "position": t.position,
                })
            })
            .collect(),
    )
}

fn kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::FunctionOpen => "function_open",
        TokenKind::Open => "open",
        TokenKind::Close => "close",
        TokenKind::Quoted => "quoted",
        TokenKind::Bare => "bare",
    }
}

fn literal_to_json(literal: Literal) -> (&'static str, Value) {
    match literal {
        Literal::Null => ("null", Value::Null),
        Literal::Bool(b) => ("bool", Value::Bool(b)),
        Literal::Number(n) => {
            let value = if n.fract().is_zero() {
                n.to_i64().map(Value::from)
            } else {
                n.to_f64().and_then(serde_json::Number::from_f64).map(Value::Number)
            };
            ("number", value.unwrap_or_else(|| Value::String(n.to_string())))
        }
        Literal::Text(s) => ("text", Value::String(s)),
        Literal::Identifier(s) => ("identifier", Value::String(s)),
    }
}

/// Compact JSON.
pub fn to_json(value: &Value) -> String {
    value.to_string()
}

/// JSON with two-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    format!("{:#}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse, tokenizer::Tokenizer};

    #[test]
    fn test_leaf_types() {
        let tree = parse("f(null,true,2.5,'x',y)").unwrap();
        let json = tree_to_json(&tree);
        let types: Vec<&str> = json[0]["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["null", "bool", "number", "text", "identifier"]);
        assert_eq!(json[0]["args"][2]["value"], json!(2.5));
        assert_eq!(json[0]["args"][3]["value"], json!("x"));
    }

    #[test]
    fn test_tokens_json() {
        let tokens: Vec<Token> = Tokenizer::new("f(a)").collect::<Result<_, _>>().unwrap();
        let json = tokens_to_json(&tokens);
        assert_eq!(json[0], json!({"text": "f(", "kind": "function_open", "position": 0}));
        assert_eq!(json[2]["kind"], "close");
    }

    #[test]
    fn test_pretty() {
        let value = json!({"a": 1});
        assert_eq!(to_json_pretty(&value), "{\n  \"a\": 1\n}");
    }
}
