//! rust-toolchain channel grammar
//!
//! A toolchain file names one of:
//! - a channel: `stable`, `beta`, `nightly`
//! - a dated channel: `nightly-2023-12-25`
//! - a version: `1.72.0`, or `1.72` meaning any `1.72.x`

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::model::Operator;
use crate::version::{IdentifierOrder, TOOLCHAIN_CHANNELS, VersionScheme};

pub const SCHEME: VersionScheme = VersionScheme {
    order: IdentifierOrder::NumericFirst,
    allow_v_prefix: false,
    loose_prerelease: false,
    allow_prerelease: false,
    channels: Some(TOOLCHAIN_CHANNELS),
};

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::RustToolchain,
        scheme: SCHEME,
        or_split: OrSplit::None,
        and_split: AndSplit::Single,
        operators: &[],
        bare_operator: Operator::Exact,
        partial_exact_is_prefix: true,
        hyphen_ranges: false,
        wildcard_chars: &[],
        wildcards: WildcardPolicy::Forbidden,
        tilde: TildeRule::Minor,
        caret_narrow_pre_1: true,
        opaque: OpaquePolicy::default(),
        update: UpdateRules {
            mode: UpdateMode::Replace,
            widen_precision: WidenPrecision::MatchExisting,
            collapse_operator: "",
            default_or_separator: None,
            major_only_covers: false,
        },
    }
}
