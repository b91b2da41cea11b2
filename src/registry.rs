use std::{collections::HashMap, fmt, str::FromStr};

/// The query clause a function contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClauseKind {
    /// Projection and aggregation
    ///
    /// # Examples
    /// ```text
    /// includes(id,name)
    /// count(*)
    /// ```
    Select,

    /// Row predicates
    ///
    /// # Examples
    /// ```text
    /// eq(brandfamily,'LAYS')
    /// and(gt(price,10),sw(name,chip))
    /// ```
    Where,

    /// `group(col1,col2)`
    Group,

    /// `sort(-price,name)`
    Order,

    /// `page(2,25)`, `limit(10)`, `offset(20)`
    Page,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 5] = [
        ClauseKind::Select,
        ClauseKind::Where,
        ClauseKind::Group,
        ClauseKind::Order,
        ClauseKind::Page,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ClauseKind::Select => "select",
            ClauseKind::Where => "where",
            ClauseKind::Group => "group",
            ClauseKind::Order => "order",
            ClauseKind::Page => "page",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClauseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "select" => Ok(ClauseKind::Select),
            "where" | "filter" => Ok(ClauseKind::Where),
            "group" => Ok(ClauseKind::Group),
            "order" | "sort" => Ok(ClauseKind::Order),
            "page" | "paging" => Ok(ClauseKind::Page),
            other => Err(format!("unknown clause kind '{}'", other)),
        }
    }
}

const WHERE_FUNCTIONS: &[&str] = &[
    "_key", "and", "or", "not", "eq", "ne", "n", "nn", "emp", "nemp", "lt", "le", "gt", "ge", "like", "w", "sw",
    "ew", "wo", "in", "out",
];
const SELECT_FUNCTIONS: &[&str] = &[
    "includes", "excludes", "distinct", "count", "sum", "min", "max", "as", "func", "aggregate",
];
const ORDER_FUNCTIONS: &[&str] = &["sort", "order"];
const PAGE_FUNCTIONS: &[&str] = &["page", "pagenum", "pagesize", "limit", "offset", "after"];

/// Functions whose arguments after the first are values, not columns.
const LOGICAL_FUNCTIONS: &[&str] = &["and", "or", "not"];

/// Maps RQL function names to the clause they belong to.
///
/// Built once by the embedding application and passed by reference to
/// whatever routes terms; there is no process-wide registry.
///
/// ```
/// use rql_engine::{ClauseKind, FunctionRegistry};
///
/// let mut registry = FunctionRegistry::default();
/// registry.register("near", ClauseKind::Where);
/// assert_eq!(registry.kind_of("NEAR"), Some(ClauseKind::Where));
/// assert_eq!(registry.kind_of("sort"), Some(ClauseKind::Order));
/// ```
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, ClauseKind>,
}

impl FunctionRegistry {
    /// A registry with no functions at all.
    pub fn empty() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    /// Add or replace a function. Names are case-insensitive.
    pub fn register(&mut self, name: &str, kind: ClauseKind) -> &mut Self {
        self.functions.insert(name.to_lowercase(), kind);
        self
    }

    pub fn with(mut self, name: &str, kind: ClauseKind) -> Self {
        self.register(name, kind);
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<ClauseKind> {
        self.functions.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    /// `and`, `or`, `not`: arguments are nested predicates.
    pub fn is_logical(&self, name: &str) -> bool {
        LOGICAL_FUNCTIONS.iter().any(|f| f.eq_ignore_ascii_case(name))
    }

    /// Registered function names of one clause kind, sorted.
    pub fn functions_of(&self, kind: ClauseKind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .functions
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = FunctionRegistry::empty();
        let groups: [(&[&str], ClauseKind); 4] = [
            (WHERE_FUNCTIONS, ClauseKind::Where),
            (SELECT_FUNCTIONS, ClauseKind::Select),
            (ORDER_FUNCTIONS, ClauseKind::Order),
            (PAGE_FUNCTIONS, ClauseKind::Page),
        ];
        for (names, kind) in groups {
            for name in names {
                registry.register(name, kind);
            }
        }
        registry.register("group", ClauseKind::Group);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let registry = FunctionRegistry::default();
        assert_eq!(registry.kind_of("eq"), Some(ClauseKind::Where));
        assert_eq!(registry.kind_of("group"), Some(ClauseKind::Group));
        assert_eq!(registry.kind_of("includes"), Some(ClauseKind::Select));
        assert_eq!(registry.kind_of("limit"), Some(ClauseKind::Page));
        assert_eq!(registry.kind_of("bogus"), None);
    }

    #[test]
    fn test_register_overrides() {
        let registry = FunctionRegistry::default().with("sort", ClauseKind::Select);
        assert_eq!(registry.kind_of("sort"), Some(ClauseKind::Select));
        assert_eq!(registry.functions_of(ClauseKind::Order), vec!["order"]);
    }

    #[test]
    fn test_clause_kind_from_str() {
        assert_eq!("Where".parse::<ClauseKind>(), Ok(ClauseKind::Where));
        assert!("nope".parse::<ClauseKind>().is_err());
    }
}
