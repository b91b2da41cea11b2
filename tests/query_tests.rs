// tests/query_tests.rs

use rql_engine::ast::TermTree;
use rql_engine::error::QueryError;
use rql_engine::query::{Clause, Direction, Query, with_group_by, with_term};
use rql_engine::registry::{ClauseKind, FunctionRegistry};

// ============================================================================
// Term builder
// ============================================================================

#[test]
fn test_term_builder() {
    let mut tree = TermTree::new();
    let eq = tree.term(None, "eq", ["column", "value"]);
    assert_eq!(tree.get(eq).to_string(), "eq(column,value)");

    let first = tree.get(eq).get_term(0).unwrap();
    assert_eq!(first.parent().unwrap().id(), eq);
}

// ============================================================================
// Clause accumulation
// ============================================================================

#[test]
fn test_group_by_collapses_into_one_term() {
    let mut group = Clause::new("group");
    with_group_by(&mut group, ["a", "b"]);
    with_group_by(&mut group, ["c"]);

    let terms = group.find_all("group");
    assert_eq!(terms.len(), 1);
    let columns: Vec<&str> = terms[0].terms().map(|t| t.token()).collect();
    assert_eq!(columns, vec!["a", "b", "c"]);
}

#[test]
fn test_with_term_keeps_other_functions_apart() {
    let mut select = Clause::new("select");
    with_term(&mut select, "includes", ["id"]);
    with_term(&mut select, "excludes", ["secret"]);
    with_term(&mut select, "includes", ["name"]);
    assert_eq!(select.to_string(), "includes(id,name)&excludes(secret)");
}

#[test]
fn test_find_all_preserves_order() {
    let mut clause = Clause::new("where");
    clause.parse("eq(a,1) gt(b,2) eq(c,3)").unwrap();
    let found: Vec<String> = clause.find_all("eq").iter().map(|t| t.to_string()).collect();
    assert_eq!(found, vec!["eq(a,1)", "eq(c,3)"]);
    assert!(clause.find("lt").is_none());
}

// ============================================================================
// Query routing
// ============================================================================

#[test]
fn test_query_routes_by_registry() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query
        .with_rql("eq(brandfamily,'LAYS')")
        .unwrap()
        .with_rql("includes(id,name) sort(-price)")
        .unwrap()
        .with_rql("limit(10,20)")
        .unwrap();

    assert_eq!(query.where_().to_string(), "eq(brandfamily,'LAYS')");
    assert_eq!(query.select().to_string(), "includes(id,name)");
    assert_eq!(query.order().to_string(), "sort(-price)");
    assert_eq!(query.page().to_string(), "limit(10,20)");
    assert_eq!(
        query.to_string(),
        "includes(id,name)&eq(brandfamily,'LAYS')&sort(-price)&limit(10,20)"
    );
}

#[test]
fn test_query_operator_clauses() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_rql("brand=LAYS").unwrap();
    query.with_rql("price=ge=2.5").unwrap();
    assert_eq!(query.where_().to_string(), "eq(brand,LAYS)&ge(price,2.5)");
}

#[test]
fn test_query_rejects_unknown_function_atomically() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    let err = query.with_rql("eq(a,1) frobnicate(b)").unwrap_err();
    assert_eq!(err, QueryError::UnknownFunction("frobnicate".into()));
    assert!(query.where_().is_empty());

    assert!(matches!(query.with_rql("justaleaf"), Err(QueryError::UnknownFunction(_))));
    assert!(matches!(query.with_rql("eq(a,"), Err(QueryError::Parse(_))));
}

#[test]
fn test_custom_registry() {
    let registry = FunctionRegistry::default().with("near", ClauseKind::Where);
    let mut query = Query::new(&registry);
    query.with_rql("near(location,10)").unwrap();
    assert_eq!(query.where_().len(), 1);
    assert_eq!(query.find_all("near").len(), 1);
}

#[test]
fn test_query_group_by_accumulates() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_group_by(["a", "b"]);
    query.with_group_by(["c"]);
    assert_eq!(query.group().to_string(), "group(a,b,c)");

    query.with_term("includes", ["a"]).unwrap();
    assert!(query.with_term("bogus", ["a"]).is_err());
}

#[test]
fn test_with_term_folds_names_ignoring_case() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_group_by(["a"]);
    query.with_term("GROUP", ["b"]).unwrap();
    assert_eq!(query.group().len(), 1);
    assert_eq!(query.group().to_string(), "group(a,b)");
}

#[test]
fn test_parsed_group_terms_are_separate() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_rql("group(a)").unwrap();
    query.with_rql("group(b)").unwrap();
    assert_eq!(query.group().find_all("group").len(), 2);
}

// ============================================================================
// Paging and sorting
// ============================================================================

#[test]
fn test_paging_and_sorting() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_rql("page(2,50) sort(-price,name)").unwrap();

    let page = query.paging().unwrap();
    assert_eq!(page.limit(), Some(50));
    assert_eq!(page.offset(), 50);
    assert_eq!(page.page_num(), 2);

    let sorts = query.sorts().unwrap();
    assert_eq!(sorts.len(), 2);
    assert_eq!(sorts[0].column, "price");
    assert_eq!(sorts[0].direction, Direction::Desc);
    assert_eq!(sorts[1].direction, Direction::Asc);
}

#[test]
fn test_invalid_paging_value() {
    let registry = FunctionRegistry::default();
    let mut query = Query::new(&registry);
    query.with_rql("limit('ten')").unwrap();
    assert_eq!(
        query.paging(),
        Err(QueryError::InvalidValue {
            function: "limit".into(),
            value: "'ten'".into()
        })
    );
}
