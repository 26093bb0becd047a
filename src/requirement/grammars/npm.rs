//! npm constraint grammar
//!
//! Supports npm semver range syntax:
//! - `1.2.3` - exact match, `1.2` - any `1.2.x`
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `*` - wildcards
//! - `1.2.3 - 2.3.4` - hyphen ranges
//! - `latest`, `next` - dist-tags, kept as opaque text

use std::sync::LazyLock;

use regex::Regex;

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::grammars::SEMVER_OPERATORS;
use crate::requirement::model::Operator;
use crate::version::VersionScheme;

static OR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|\|\s*").unwrap());

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::Npm,
        scheme: VersionScheme::semver(),
        or_split: OrSplit::Pattern(&OR_RE),
        and_split: AndSplit::Whitespace,
        operators: SEMVER_OPERATORS,
        bare_operator: Operator::Exact,
        partial_exact_is_prefix: true,
        hyphen_ranges: true,
        wildcard_chars: &['*', 'x', 'X'],
        wildcards: WildcardPolicy::Trailing,
        tilde: TildeRule::Minor,
        caret_narrow_pre_1: true,
        opaque: OpaquePolicy {
            tags: true,
            ..OpaquePolicy::default()
        },
        update: UpdateRules {
            mode: UpdateMode::Replace,
            widen_precision: WidenPrecision::MatchExisting,
            collapse_operator: "^",
            default_or_separator: Some(" || "),
            major_only_covers: false,
        },
    }
}
