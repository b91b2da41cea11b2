pub mod ast;
pub mod error;
pub mod output;
pub mod parser;
pub mod query;
pub mod registry;
pub mod tokenizer;
pub mod validate;

pub mod cli;

pub use ast::{Literal, TermId, TermRef, TermTree};
pub use error::{QueryError, RqlError, ValidationError};
pub use output::{to_json, to_json_pretty};
pub use parser::{Parser, parse, parse_clause, parse_into};
pub use query::{Clause, Query, with_group_by, with_term};
pub use registry::{ClauseKind, FunctionRegistry};
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};
pub use validate::{ColumnValidator, is_invalid_column};
