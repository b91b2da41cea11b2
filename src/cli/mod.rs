//! CLI support for rql-engine
//!
//! Provides programmatic access to the `rql` command operations so they can
//! be embedded in other tools.

mod check;
mod docs;
mod query;

pub use check::{CheckOptions, CheckResult, OutputFormat, execute_check, execute_parse, execute_tokenize};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use query::execute_query;

use std::io;

use crate::{ClauseKind, FunctionRegistry, QueryError, RqlError, ValidationError};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Tokenizer or parser error
    Parse(RqlError),
    /// Query routing or paging error
    Query(QueryError),
    /// Column validation failures
    Invalid(Vec<ValidationError>),
    /// IO error
    Io(io::Error),
    /// No expression provided
    NoInput,
    /// Malformed `--function name=kind` argument
    FunctionSpec(String),
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Parse(e) => write!(f, "Parse error: {}", e),
            CliError::Query(e) => write!(f, "Query error: {}", e),
            CliError::Invalid(errors) => {
                write!(f, "Validation failed:")?;
                for e in errors {
                    write!(f, "\n  {}", e)?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No expression provided. Pass one as an argument or pipe it to stdin."),
            CliError::FunctionSpec(spec) => {
                write!(f, "Invalid function '{}': expected name=kind (kind: select, where, group, order, page)", spec)
            }
            CliError::UnknownCategory(c) => {
                write!(f, "Unknown category: '{}'\nRun 'rql docs' to see available categories.", c)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Parse(e) => Some(e),
            CliError::Query(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RqlError> for CliError {
    fn from(e: RqlError) -> Self {
        CliError::Parse(e)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Build a registry from the default vocabulary plus `name=kind` entries.
pub fn build_registry(extra: &[String]) -> Result<FunctionRegistry, CliError> {
    let mut registry = FunctionRegistry::default();
    for spec in extra {
        let (name, kind) = spec
            .split_once('=')
            .ok_or_else(|| CliError::FunctionSpec(spec.clone()))?;
        let kind: ClauseKind = kind.parse().map_err(|_| CliError::FunctionSpec(spec.clone()))?;
        if name.is_empty() {
            return Err(CliError::FunctionSpec(spec.clone()));
        }
        registry.register(name, kind);
    }
    Ok(registry)
}
