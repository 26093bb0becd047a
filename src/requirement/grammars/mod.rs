//! Shipped grammar tables, one file per ecosystem

pub mod cargo;
pub mod composer;
pub mod go;
pub mod julia;
pub mod npm;
pub mod rust_toolchain;

use crate::requirement::grammar::{GrammarId, GrammarTable};
use crate::requirement::model::Operator;

/// Comparison, tilde and caret spellings shared by the semver-style grammars
pub(crate) const SEMVER_OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("=", Operator::Exact),
    ("~", Operator::Tilde),
    ("^", Operator::Caret),
];

/// Table for a grammar id
pub fn table(id: GrammarId) -> GrammarTable {
    match id {
        GrammarId::Npm => npm::table(),
        GrammarId::Cargo => cargo::table(),
        GrammarId::Composer => composer::table(),
        GrammarId::GoModules => go::table(),
        GrammarId::Julia => julia::table(),
        GrammarId::RustToolchain => rust_toolchain::table(),
    }
}
