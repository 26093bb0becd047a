//! Requirement layer: constraint grammars, parsing, rendering and satisfaction
//!
//! Every ecosystem shares one parser. What differs between them (separators,
//! bare operator, wildcard and tilde rules, opaque forms) lives in a
//! [`GrammarTable`] value, looked up through a [`GrammarRegistry`].
//!
//! ```text
//!  "^1.0, <1.5 || dev-master"
//!          │ parse
//!          ▼
//!  Requirement ─┬─ OrGroup [Atom ^1.0] [Atom <1.5]
//!               └─ OrGroup [Opaque dev-master]
//!          │ render            │ satisfies(v)
//!          ▼                   ▼
//!  original text       any group ∧ every clause
//! ```
//!
//! # Modules
//!
//! - [`grammar`]: `GrammarId`, `GrammarTable`, `GrammarRegistry`
//! - [`grammars`]: Table for each shipped ecosystem
//! - [`model`]: Requirement, OR-group, clause and atom types
//! - [`parser`]: Table-driven parser
//! - `range`: Operator expansion into primitive comparators
//! - [`satisfy`]: Satisfaction evaluator

pub mod grammar;
pub mod grammars;
pub mod model;
pub mod parser;
pub(crate) mod range;
pub mod satisfy;

pub use grammar::{GrammarId, GrammarRegistry, GrammarTable};
pub use model::{Atom, Clause, Cmp, Comparator, Opaque, OpaqueKind, Operator, OrGroup, Part, Requirement};
pub use satisfy::satisfies;
