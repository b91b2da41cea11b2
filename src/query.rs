//! Query clause wrappers.
//!
//! A [`Query`] routes parsed root terms into one [`Clause`] per
//! [`ClauseKind`], using a [`FunctionRegistry`] to decide where each
//! function belongs.
//!
//! ```
//! use rql_engine::{FunctionRegistry, Query};
//!
//! let registry = FunctionRegistry::default();
//! let mut query = Query::new(&registry);
//! query.with_rql("eq(brandfamily,'LAYS')").unwrap();
//! query.with_rql("price=gt=10").unwrap();
//! query.with_group_by(["brand"]);
//! query.with_group_by(["size"]);
//!
//! assert_eq!(query.where_().to_string(), "eq(brandfamily,'LAYS')&gt(price,10)");
//! assert_eq!(query.group().to_string(), "group(brand,size)");
//! ```
pub mod clause;
pub mod order;
pub mod page;

use std::{collections::BTreeMap, fmt};

pub use clause::{Clause, with_group_by, with_term};
pub use order::{Direction, Sort};
pub use page::Page;

use crate::{
    ast::{TermId, TermRef},
    error::QueryError,
    parser,
    registry::{ClauseKind, FunctionRegistry},
};

/// Mutable query under construction. Not meant to be shared across threads.
#[derive(Debug, Clone)]
pub struct Query<'r> {
    registry: &'r FunctionRegistry,
    clauses: BTreeMap<ClauseKind, Clause>,
}

impl<'r> Query<'r> {
    pub fn new(registry: &'r FunctionRegistry) -> Self {
        let clauses = ClauseKind::ALL
            .into_iter()
            .map(|kind| (kind, Clause::new(kind.name())))
            .collect();
        Query { registry, clauses }
    }

    pub fn registry(&self) -> &'r FunctionRegistry {
        self.registry
    }

    /// Parse one RQL clause (operator forms allowed) and route every root
    /// term. Nothing is added unless every root can be routed.
    pub fn with_rql(&mut self, input: &str) -> Result<&mut Self, QueryError> {
        tracing::trace!(input, "parsing query clause");
        let tree = parser::parse_clause(input)?;

        let mut routed = Vec::with_capacity(tree.roots().len());
        for &root in tree.roots() {
            routed.push((self.route(tree.get(root))?, root));
        }
        for (kind, root) in routed {
            tracing::debug!(function = tree.token(root), clause = %kind, "routed term");
            self.clause_mut(kind).add_term(tree.get(root));
        }
        Ok(self)
    }

    /// Programmatic counterpart of [`with_term`], routed by function name.
    pub fn with_term<I, S>(&mut self, name: &str, values: I) -> Result<TermId, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kind = self
            .registry
            .kind_of(name)
            .ok_or_else(|| QueryError::UnknownFunction(name.to_string()))?;
        Ok(with_term(self.clause_mut(kind), name, values))
    }

    pub fn with_group_by<I, S>(&mut self, columns: I) -> TermId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        with_group_by(self.clause_mut(ClauseKind::Group), columns)
    }

    fn route(&self, term: TermRef<'_>) -> Result<ClauseKind, QueryError> {
        if !term.is_call() {
            return Err(QueryError::UnknownFunction(term.token().to_string()));
        }
        self.registry
            .kind_of(term.token())
            .ok_or_else(|| QueryError::UnknownFunction(term.token().to_string()))
    }

    fn clause_mut(&mut self, kind: ClauseKind) -> &mut Clause {
        self.clauses
            .entry(kind)
            .or_insert_with(|| Clause::new(kind.name()))
    }

    pub fn clause(&self, kind: ClauseKind) -> Option<&Clause> {
        self.clauses.get(&kind)
    }

    pub fn clauses(&self) -> impl Iterator<Item = (ClauseKind, &Clause)> {
        self.clauses.iter().map(|(kind, clause)| (*kind, clause))
    }

    fn known(&self, kind: ClauseKind) -> &Clause {
        &self.clauses[&kind]
    }

    pub fn select(&self) -> &Clause {
        self.known(ClauseKind::Select)
    }

    pub fn where_(&self) -> &Clause {
        self.known(ClauseKind::Where)
    }

    pub fn group(&self) -> &Clause {
        self.known(ClauseKind::Group)
    }

    pub fn order(&self) -> &Clause {
        self.known(ClauseKind::Order)
    }

    pub fn page(&self) -> &Clause {
        self.known(ClauseKind::Page)
    }

    /// Every root term named `name`, across all clauses.
    pub fn find_all(&self, name: &str) -> Vec<TermRef<'_>> {
        self.clauses.values().flat_map(|c| c.find_all(name)).collect()
    }

    pub fn paging(&self) -> Result<Page, QueryError> {
        Page::from_clause(self.page())
    }

    pub fn sorts(&self) -> Result<Vec<Sort>, QueryError> {
        order::sorts(self.order())
    }
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for clause in self.clauses.values().filter(|c| !c.is_empty()) {
            if !first {
                f.write_str("&")?;
            }
            write!(f, "{}", clause)?;
            first = false;
        }
        Ok(())
    }
}
