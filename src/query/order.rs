use std::fmt;

use crate::{error::QueryError, query::Clause};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: String,
    pub direction: Direction,
}

/// Read sort keys from `sort(...)`/`order(...)` terms.
///
/// Columns may carry a `+`/`-` prefix (`sort(-price,name)`), or be followed
/// by an `asc`/`desc` argument (`order(price,desc)`).
pub fn sorts(clause: &Clause) -> Result<Vec<Sort>, QueryError> {
    let mut sorts: Vec<Sort> = Vec::new();

    for term in clause.terms() {
        if !term.token().eq_ignore_ascii_case("sort") && !term.token().eq_ignore_ascii_case("order") {
            return Err(QueryError::UnknownFunction(term.token().to_string()));
        }

        for arg in term.terms() {
            if !arg.is_leaf() || arg.is_call() {
                return Err(QueryError::InvalidValue {
                    function: term.token().to_string(),
                    value: arg.to_string(),
                });
            }

            let token = arg.dequoted();
            let explicit = if token.eq_ignore_ascii_case("asc") {
                Some(Direction::Asc)
            } else if token.eq_ignore_ascii_case("desc") {
                Some(Direction::Desc)
            } else {
                None
            };

            match explicit {
                Some(direction) => match sorts.last_mut() {
                    Some(last) => last.direction = direction,
                    None => {
                        return Err(QueryError::InvalidValue {
                            function: term.token().to_string(),
                            value: token.to_string(),
                        });
                    }
                },
                None => sorts.push(sort_key(token)),
            }
        }
    }
    Ok(sorts)
}

fn sort_key(token: &str) -> Sort {
    if let Some(column) = token.strip_prefix('-') {
        Sort {
            column: column.to_string(),
            direction: Direction::Desc,
        }
    } else {
        Sort {
            column: token.strip_prefix('+').unwrap_or(token).to_string(),
            direction: Direction::Asc,
        }
    }
}
