//! Error taxonomy for the RQL engine.
//!
//! Parsing failures ([`RqlError`]) are kept apart from semantic rejections
//! ([`ValidationError`]) because a tree that fails validation was still built
//! successfully. [`QueryError`] covers routing terms into query clauses.

/// Lexical or structural failure while turning text into a term tree.
///
/// Every variant carries the character offset of the offending input so a
/// caller can point at it (or map it to a client error response).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RqlError {
    #[error("unterminated {quote} quote starting at offset {position}")]
    UnterminatedQuote { quote: char, position: usize },

    #[error("dangling escape character at offset {position}")]
    TrailingEscape { position: usize },

    #[error("unclosed function call '{name}(' opened at offset {position}")]
    UnclosedFunction { name: String, position: usize },

    #[error("unmatched ')' at offset {position}")]
    UnmatchedClose { position: usize },

    #[error("'(' at offset {position} is not preceded by a function name")]
    AnonymousGroup { position: usize },

    #[error("malformed operator clause '{clause}' at offset {position}")]
    MalformedOperator { clause: String, position: usize },

    #[error("calls nested deeper than {limit} levels at offset {position}")]
    TooDeep { limit: usize, position: usize },
}

impl RqlError {
    /// Character offset in the source text where the failure was detected.
    pub fn position(&self) -> usize {
        match self {
            RqlError::UnterminatedQuote { position, .. }
            | RqlError::TrailingEscape { position }
            | RqlError::UnclosedFunction { position, .. }
            | RqlError::UnmatchedClose { position }
            | RqlError::AnonymousGroup { position }
            | RqlError::MalformedOperator { position, .. }
            | RqlError::TooDeep { position, .. } => *position,
        }
    }
}

/// A syntactically valid term that is not acceptable as a column reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid column '{column}' in {function}(...)")]
    InvalidColumn { column: String, function: String },
}

/// Failure while assembling a [`Query`](crate::query::Query) from RQL text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] RqlError),

    #[error("unknown query function '{0}'")]
    UnknownFunction(String),

    #[error("invalid value '{value}' for {function}(...)")]
    InvalidValue { function: String, value: String },
}

pub type Result<T, E = RqlError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_is_exposed_for_every_variant() {
        let errors = [
            RqlError::UnterminatedQuote { quote: '\'', position: 3 },
            RqlError::TrailingEscape { position: 3 },
            RqlError::UnclosedFunction { name: "f".into(), position: 3 },
            RqlError::UnmatchedClose { position: 3 },
            RqlError::AnonymousGroup { position: 3 },
            RqlError::MalformedOperator { clause: "=a".into(), position: 3 },
            RqlError::TooDeep { limit: 1, position: 3 },
        ];
        for err in errors {
            assert_eq!(err.position(), 3, "{}", err);
        }
    }

    #[test]
    fn test_query_error_wraps_parse_error() {
        let err: QueryError = RqlError::UnmatchedClose { position: 0 }.into();
        assert_eq!(err.to_string(), "unmatched ')' at offset 0");
    }
}
