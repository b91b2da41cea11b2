use std::fmt;

use crate::{
    ast::{TermId, TermRef, TermTree},
    error::Result,
    parser,
};

/// Root terms of one query clause, kept in the order they were added.
///
/// A clause may hold several terms with the same function name; parsing
/// always adds new roots, while [`with_term`] folds programmatic additions
/// into an existing root of that name.
#[derive(Debug, Clone)]
pub struct Clause {
    name: String,
    tree: TermTree,
}

impl Clause {
    pub fn new(name: impl Into<String>) -> Self {
        Clause {
            name: name.into(),
            tree: TermTree::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tree(&self) -> &TermTree {
        &self.tree
    }

    /// Root terms in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = TermRef<'_>> {
        self.tree.roots().iter().map(|&id| self.tree.get(id))
    }

    pub fn len(&self) -> usize {
        self.tree.roots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.roots().is_empty()
    }

    /// Every root term named `function`, in insertion order.
    pub fn find_all(&self, function: &str) -> Vec<TermRef<'_>> {
        self.tree
            .find_all(function)
            .into_iter()
            .map(|id| self.tree.get(id))
            .collect()
    }

    pub fn find(&self, function: &str) -> Option<TermRef<'_>> {
        self.find_all(function).into_iter().next()
    }

    /// Copy a term from another tree in as a new root.
    pub fn add_term(&mut self, term: TermRef<'_>) -> TermId {
        self.tree.graft(term.tree(), term.id(), None)
    }

    /// Parse RQL text and add each of its roots to this clause.
    pub fn parse(&mut self, input: &str) -> Result<Vec<TermId>> {
        parser::parse_into(&mut self.tree, input)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// Append `values` as leaf arguments to the first root named `name` (ASCII
/// case ignored), or add a new root `name(values...)` when there is none.
pub fn with_term<I, S>(clause: &mut Clause, name: &str, values: I) -> TermId
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let existing = clause
        .tree
        .roots()
        .iter()
        .copied()
        .find(|&id| clause.tree.has_token(id, &[name]));
    match existing {
        Some(existing) => {
            for value in values {
                clause.tree.with_term(existing, value);
            }
            existing
        }
        None => clause.tree.term(None, name, values),
    }
}

/// `with_term(clause, "group", columns)`.
pub fn with_group_by<I, S>(clause: &mut Clause, columns: I) -> TermId
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    with_term(clause, "group", columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_accumulates() {
        let mut group = Clause::new("group");
        with_group_by(&mut group, ["a", "b"]);
        with_group_by(&mut group, ["c"]);
        assert_eq!(group.len(), 1);
        assert_eq!(group.to_string(), "group(a,b,c)");
    }

    #[test]
    fn test_parsed_terms_stay_separate() {
        let mut group = Clause::new("group");
        group.parse("group(a)").unwrap();
        group.parse("group(b)").unwrap();
        assert_eq!(group.find_all("group").len(), 2);
        assert_eq!(group.to_string(), "group(a)&group(b)");
    }

    #[test]
    fn test_failed_parse_leaves_clause_untouched() {
        let mut clause = Clause::new("where");
        clause.parse("eq(a,1)").unwrap();
        assert!(clause.parse("eq(b,").is_err());
        assert_eq!(clause.to_string(), "eq(a,1)");
    }
}
