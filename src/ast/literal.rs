use std::str::FromStr;

use rust_decimal::Decimal;

use crate::ast::term::{dequote, is_quoted};

/// Typed reading of a leaf token.
///
/// Quoted tokens are always text; bare tokens are tried as keywords and
/// numbers before falling back to identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `null`
    Null,

    /// `true` / `false`
    Bool(bool),

    /// Exact decimal number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.50
    /// ```
    Number(Decimal),

    /// Quoted literal with the quotes removed
    ///
    /// # Examples
    /// ```text
    /// 'LAYS'
    /// "a,b,c"
    /// ```
    Text(String),

    /// Any other bare token, usually a column name
    Identifier(String),
}

impl Literal {
    pub fn classify(token: &str) -> Self {
        if is_quoted(token) {
            return Literal::Text(dequote(token).to_string());
        }
        match token {
            "null" => Literal::Null,
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => match Decimal::from_str(token) {
                Ok(n) => Literal::Number(n),
                Err(_) => Literal::Identifier(token.to_string()),
            },
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        match self {
            Literal::Number(n) if n.fract().is_zero() => n.to_i64(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Literal::classify("null"), Literal::Null);
        assert_eq!(Literal::classify("false"), Literal::Bool(false));
        assert_eq!(Literal::classify("12.50"), Literal::Number(Decimal::new(1250, 2)));
        assert_eq!(Literal::classify("'12'"), Literal::Text("12".into()));
        assert_eq!(Literal::classify("brand"), Literal::Identifier("brand".into()));
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(Literal::classify("25").as_i64(), Some(25));
        assert_eq!(Literal::classify("2.5").as_i64(), None);
        assert_eq!(Literal::classify("x").as_i64(), None);
    }
}
