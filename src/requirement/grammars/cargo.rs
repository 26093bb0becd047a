//! Cargo constraint grammar
//!
//! Supports Cargo version requirement syntax:
//! - `1.2.3` - caret requirement (same as `^1.2.3`)
//! - `~1.2.3`, `=1.2.3`, `>=1.2, <1.5` - comma separated comparators
//! - `=1.2` - any `1.2.x`
//! - `1.*`, `*` - wildcards

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::grammars::SEMVER_OPERATORS;
use crate::requirement::model::Operator;
use crate::version::VersionScheme;

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::Cargo,
        scheme: VersionScheme {
            allow_v_prefix: false,
            ..VersionScheme::semver()
        },
        or_split: OrSplit::None,
        and_split: AndSplit::Comma,
        operators: SEMVER_OPERATORS,
        bare_operator: Operator::Caret,
        partial_exact_is_prefix: true,
        hyphen_ranges: false,
        wildcard_chars: &['*'],
        wildcards: WildcardPolicy::Trailing,
        tilde: TildeRule::Minor,
        caret_narrow_pre_1: true,
        opaque: OpaquePolicy::default(),
        update: UpdateRules {
            mode: UpdateMode::Replace,
            widen_precision: WidenPrecision::MatchExisting,
            collapse_operator: "^",
            default_or_separator: None,
            major_only_covers: false,
        },
    }
}
