//! # RQL Term Tree
//!
//! Parsed RQL is a forest of [`Term`](term::TermRef) nodes stored in a
//! [`TermTree`] arena.
//!
//! ## Shape
//!
//! A term is either a function call or a leaf:
//!
//! ```text
//! and(eq(brandfamily,'LAYS'),gt(price,10))
//! ```
//!
//! - `and` and both `eq`/`gt` calls are function terms; their token is the
//!   function name and their arguments are their children in source order.
//! - `brandfamily`, `'LAYS'`, `price` and `10` are leaves.
//!
//! Quoted leaves keep their quotes, so `'price'` (a string) and `price`
//! (a column) stay distinguishable. [`Literal`] gives the typed reading of a
//! leaf when a consumer needs one.
//!
//! ## Ownership
//!
//! Nodes are addressed by [`TermId`]. Each node records its parent's id;
//! the arena owns every node, so there are no reference cycles.
pub mod literal;
pub mod term;

pub use literal::Literal;
pub use term::{TermId, TermRef, TermTree};
