use std::fmt::{self, Write};

use crate::ast::Literal;

/// Index of a node inside a [`TermTree`].
///
/// Ids are only meaningful for the tree that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(usize);

impl TermId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    token: String,
    parent: Option<TermId>,
    children: Vec<TermId>,
    /// Written as a call (`name(...)`) even when it has no arguments
    call: bool,
}

/// Arena holding one or more term trees.
///
/// Every node stores its parent's id, so parent lookups never need shared
/// ownership. Children are owned by exactly one parent; roots are kept in the
/// order they were added. The shape is append-only: terms can be added but
/// never detached.
///
/// ```
/// use rql_engine::TermTree;
///
/// let mut tree = TermTree::new();
/// let eq = tree.term(None, "eq", ["column", "value"]);
/// assert_eq!(tree.get(eq).to_string(), "eq(column,value)");
///
/// let column = tree.get_term(eq, 0).unwrap();
/// assert_eq!(tree.parent(column), Some(eq));
/// ```
///
/// Methods taking a [`TermId`] panic when given an id from another tree.
#[derive(Debug, Clone, Default)]
pub struct TermTree {
    nodes: Vec<Node>,
    roots: Vec<TermId>,
}

impl TermTree {
    pub fn new() -> Self {
        TermTree::default()
    }

    fn push(&mut self, parent: Option<TermId>, token: String, call: bool) -> TermId {
        let id = TermId(self.nodes.len());
        self.nodes.push(Node {
            token,
            parent,
            children: Vec::new(),
            call,
        });
        match parent {
            Some(p) => {
                let node = &mut self.nodes[p.0];
                node.children.push(id);
                node.call = true;
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Create a function term `name(children...)` with one leaf per child
    /// value, appended to `parent` or added as a new root.
    pub fn term<I, S>(&mut self, parent: Option<TermId>, name: impl Into<String>, children: I) -> TermId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.function(parent, name);
        for child in children {
            self.push(Some(id), child.into(), false);
        }
        id
    }

    /// Create a function term with no arguments yet.
    pub fn function(&mut self, parent: Option<TermId>, name: impl Into<String>) -> TermId {
        self.push(parent, name.into(), true)
    }

    /// Create a leaf term.
    pub fn leaf(&mut self, parent: Option<TermId>, token: impl Into<String>) -> TermId {
        self.push(parent, token.into(), false)
    }

    /// Append a leaf argument to an existing term.
    pub fn with_term(&mut self, id: TermId, token: impl Into<String>) -> TermId {
        self.push(Some(id), token.into(), false)
    }

    /// Deep-copy the subtree rooted at `id` in `source` into this tree.
    pub fn graft(&mut self, source: &TermTree, id: TermId, parent: Option<TermId>) -> TermId {
        let node = &source.nodes[id.0];
        let copy = self.push(parent, node.token.clone(), node.call);
        for &child in &node.children {
            self.graft(source, child, Some(copy));
        }
        copy
    }

    pub fn get(&self, id: TermId) -> TermRef<'_> {
        TermRef { tree: self, id }
    }

    pub fn token(&self, id: TermId) -> &str {
        &self.nodes[id.0].token
    }

    pub fn parent(&self, id: TermId) -> Option<TermId> {
        self.nodes[id.0].parent
    }

    /// Ordered arguments of a term.
    pub fn terms(&self, id: TermId) -> &[TermId] {
        &self.nodes[id.0].children
    }

    pub fn get_term(&self, id: TermId, index: usize) -> Option<TermId> {
        self.nodes[id.0].children.get(index).copied()
    }

    pub fn get_token(&self, id: TermId, index: usize) -> Option<&str> {
        self.get_term(id, index).map(|child| self.token(child))
    }

    /// True when the term has no arguments.
    pub fn is_leaf(&self, id: TermId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// True when the term was written or built as a function call.
    pub fn is_call(&self, id: TermId) -> bool {
        self.nodes[id.0].call
    }

    /// Case-insensitive match of the term's token against any of `tokens`.
    pub fn has_token(&self, id: TermId, tokens: &[&str]) -> bool {
        let token = self.token(id);
        tokens.iter().any(|t| t.eq_ignore_ascii_case(token))
    }

    /// Position of the first argument whose token equals `token`.
    pub fn index_of(&self, id: TermId, token: &str) -> Option<usize> {
        self.terms(id).iter().position(|&child| self.token(child) == token)
    }

    pub fn roots(&self) -> &[TermId] {
        &self.roots
    }

    /// Every root term whose token equals `name`, in insertion order.
    pub fn find_all(&self, name: &str) -> Vec<TermId> {
        self.roots
            .iter()
            .copied()
            .filter(|&id| self.token(id) == name)
            .collect()
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn descendants(&self, id: TermId) -> Vec<TermId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.terms(next).iter().rev());
        }
        out
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Borrowed view of one term.
///
/// Displays in canonical form: `name(arg1,arg2)` for calls, the bare token
/// for leaves. Delimiters inside tokens are escaped again, so the rendered
/// text parses back into the same tree.
#[derive(Clone, Copy)]
pub struct TermRef<'a> {
    tree: &'a TermTree,
    id: TermId,
}

impl<'a> TermRef<'a> {
    pub fn id(&self) -> TermId {
        self.id
    }

    pub fn tree(&self) -> &'a TermTree {
        self.tree
    }

    pub fn token(&self) -> &'a str {
        self.tree.token(self.id)
    }

    pub fn parent(&self) -> Option<TermRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.get(id))
    }

    pub fn terms(self) -> impl Iterator<Item = TermRef<'a>> + 'a {
        let tree = self.tree;
        tree.terms(self.id).iter().map(move |&id| tree.get(id))
    }

    pub fn get_term(&self, index: usize) -> Option<TermRef<'a>> {
        self.tree.get_term(self.id, index).map(|id| self.tree.get(id))
    }

    pub fn len(&self) -> usize {
        self.tree.terms(self.id).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_leaf(&self) -> bool {
        self.tree.is_leaf(self.id)
    }

    pub fn is_call(&self) -> bool {
        self.tree.is_call(self.id)
    }

    pub fn is_quoted(&self) -> bool {
        is_quoted(self.token())
    }

    /// Token with its surrounding quotes removed, if it has any.
    pub fn dequoted(&self) -> &'a str {
        dequote(self.token())
    }

    pub fn literal(&self) -> Literal {
        Literal::classify(self.token())
    }
}

impl fmt::Display for TermRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, self.token())?;
        if self.is_call() {
            f.write_char('(')?;
            for (i, child) in self.terms().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write!(f, "{}", child)?;
            }
            f.write_char(')')?;
        }
        Ok(())
    }
}

impl fmt::Debug for TermRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Term({})", self)
    }
}

/// Structural equality: same tokens, same call-ness, same arguments in order.
impl PartialEq for TermRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.token() == other.token()
            && self.is_call() == other.is_call()
            && self.len() == other.len()
            && self.terms().zip(other.terms()).all(|(a, b)| a == b)
    }
}

pub(crate) fn is_quoted(token: &str) -> bool {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) => (first == '\'' || first == '"') && first == last,
        _ => false,
    }
}

pub(crate) fn dequote(token: &str) -> &str {
    if is_quoted(token) {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &str) -> fmt::Result {
    if is_quoted(token) {
        let quote = token.chars().next().unwrap_or('\'');
        f.write_char(quote)?;
        for ch in dequote(token).chars() {
            if ch == quote || ch == '\\' {
                f.write_char('\\')?;
            }
            f.write_char(ch)?;
        }
        return f.write_char(quote);
    }
    for ch in token.chars() {
        if matches!(ch, '\\' | ',' | '(' | ')' | '\'' | '"') || ch.is_whitespace() {
            f.write_char('\\')?;
        }
        f.write_char(ch)?;
    }
    Ok(())
}
