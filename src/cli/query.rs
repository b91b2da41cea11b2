//! Assemble a query from several RQL clauses

use serde_json::{Map, Value, json};

use super::{CliError, OutputFormat};
use crate::{ColumnValidator, FunctionRegistry, Query, output};

/// Route every clause into one query, validate it, and describe the result.
pub fn execute_query(clauses: &[String], registry: &FunctionRegistry, format: OutputFormat) -> Result<String, CliError> {
    let mut query = Query::new(registry);
    for clause in clauses {
        query.with_rql(clause)?;
    }

    let errors: Vec<_> = query
        .clauses()
        .flat_map(|(_, clause)| ColumnValidator::new(registry).invalid_columns(clause.tree()))
        .collect();
    if !errors.is_empty() {
        return Err(CliError::Invalid(errors));
    }

    let page = query.paging()?;
    let sorts = query.sorts()?;

    if format == OutputFormat::Text {
        let mut lines = Vec::new();
        for (kind, clause) in query.clauses().filter(|(_, c)| !c.is_empty()) {
            lines.push(format!("{}: {}", kind, clause));
        }
        if let Some(limit) = page.limit() {
            lines.push(format!("limit: {} offset: {} page: {}", limit, page.offset(), page.page_num()));
        }
        if !sorts.is_empty() {
            let keys: Vec<String> = sorts.iter().map(|s| format!("{} {}", s.column, s.direction)).collect();
            lines.push(format!("sort: {}", keys.join(", ")));
        }
        return Ok(lines.join("\n"));
    }

    let mut object = Map::new();
    for (kind, clause) in query.clauses() {
        object.insert(kind.to_string(), output::tree_to_json(clause.tree()));
    }
    object.insert(
        "paging".to_string(),
        json!({
            "limit": page.limit(),
            "offset": page.offset(),
            "page": page.page_num(),
            "after": page.after(),
        }),
    );
    object.insert(
        "sorts".to_string(),
        Value::Array(
            sorts
                .iter()
                .map(|s| json!({"column": s.column, "direction": s.direction.to_string()}))
                .collect(),
        ),
    );
    Ok(format.render(&Value::Object(object)))
}
