use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{TermRef, TermTree},
    error::ValidationError,
    query::Query,
    registry::{ClauseKind, FunctionRegistry},
};

/// Public column names: word characters only, no leading underscore.
/// Underscore-prefixed tokens such as `_query` are reserved.
static COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_]*$").expect("column pattern is valid"));

pub fn is_valid_column_name(name: &str) -> bool {
    COLUMN.is_match(name)
}

/// True when `term` does not name an acceptable column.
///
/// A leaf is checked itself; for a call the first argument (the column slot
/// of `eq(column,value)` and friends) is checked. A call in the column slot,
/// or a call with no arguments, is invalid.
pub fn is_invalid_column(term: TermRef<'_>) -> bool {
    let column = if term.is_call() {
        match term.get_term(0) {
            Some(first) => first,
            None => return true,
        }
    } else {
        term
    };
    column.is_call() || !is_valid_column_name(column.token())
}

/// Walks term trees and reports every column reference that fails
/// [`is_invalid_column`].
pub struct ColumnValidator<'r> {
    registry: &'r FunctionRegistry,
}

impl<'r> ColumnValidator<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        ColumnValidator { registry }
    }

    pub fn invalid_columns(&self, tree: &TermTree) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for &root in tree.roots() {
            self.check(tree.get(root), &mut errors);
        }
        errors
    }

    pub fn validate(&self, tree: &TermTree) -> Result<(), ValidationError> {
        match self.invalid_columns(tree).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Validate every clause of a query.
    pub fn validate_query(&self, query: &Query<'_>) -> Result<(), ValidationError> {
        for (_, clause) in query.clauses() {
            self.validate(clause.tree())?;
        }
        Ok(())
    }

    fn check(&self, term: TermRef<'_>, errors: &mut Vec<ValidationError>) {
        if !term.is_call() {
            return;
        }
        let function = term.token();

        if self.registry.is_logical(function) {
            for arg in term.terms() {
                self.check(arg, errors);
            }
            return;
        }

        match self.registry.kind_of(function) {
            Some(ClauseKind::Where) => {
                if is_invalid_column(term) {
                    let column = term.get_term(0).map(|c| c.to_string()).unwrap_or_default();
                    errors.push(invalid(column, function));
                }
            }
            Some(ClauseKind::Group) => {
                for arg in term.terms() {
                    if is_invalid_column(arg) {
                        errors.push(invalid(arg.to_string(), function));
                    }
                }
            }
            Some(ClauseKind::Order) => {
                for arg in term.terms() {
                    let token = arg.token();
                    if !arg.is_call() && (token.eq_ignore_ascii_case("asc") || token.eq_ignore_ascii_case("desc")) {
                        continue;
                    }
                    let column = token.strip_prefix(['-', '+']).unwrap_or(token);
                    if arg.is_call() || !is_valid_column_name(column) {
                        errors.push(invalid(arg.to_string(), function));
                    }
                }
            }
            Some(ClauseKind::Select) if has_column_arguments(function) => {
                for arg in term.terms() {
                    if is_invalid_column(arg) {
                        errors.push(invalid(arg.to_string(), function));
                    }
                }
            }
            _ => {}
        }
    }
}

fn has_column_arguments(function: &str) -> bool {
    ["includes", "excludes", "distinct"]
        .iter()
        .any(|f| f.eq_ignore_ascii_case(function))
}

fn invalid(column: String, function: &str) -> ValidationError {
    ValidationError::InvalidColumn {
        column,
        function: function.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first_invalid(rql: &str) -> bool {
        let tree = parse(rql).unwrap();
        is_invalid_column(tree.get(tree.roots()[0]))
    }

    #[test]
    fn test_is_invalid_column() {
        assert!(!first_invalid("function(column,1,2,3)"));
        assert!(!first_invalid("function(column_name,1,2,3)"));
        assert!(first_invalid("function(_column,1,2,3)"));
        assert!(first_invalid("function(col-umn,1,2,3)"));
        assert!(first_invalid("function(f(x),1)"));
        assert!(first_invalid("function()"));
        assert!(!first_invalid("column"));
    }

    #[test]
    fn test_validator_recurses_into_logical() {
        let registry = FunctionRegistry::default();
        let tree = parse("and(eq(a,1),or(gt(_b,2),lt(c,3))) group(d,'e') sort(-f,desc,_g)").unwrap();
        let errors = ColumnValidator::new(&registry).invalid_columns(&tree);
        let columns: Vec<String> = errors
            .into_iter()
            .map(|ValidationError::InvalidColumn { column, .. }| column)
            .collect();
        assert_eq!(columns, vec!["_b", "'e'", "_g"]);
    }
}
