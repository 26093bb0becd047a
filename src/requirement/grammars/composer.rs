//! Composer constraint grammar
//!
//! For details on Composer version constraints, see
//! <https://getcomposer.org/doc/articles/versions.md#writing-version-constraints>
//!
//! - `1.2.3`, `v1.2.3`, `1.0-beta2`, `1.2.3@dev` - exact versions
//! - `^1.2`, `~1.2`, `1.2.*`, `>=1.2,<2.0`, `1.2 - 2.0` - ranges
//! - `^1.0 || ^2.0`, `~0.4|~1.0` - alternatives
//! - `dev-master`, `dev-master#c87d856`, `1.x-dev`, `mybranch as 1.2.x`,
//!   `@stable` - opaque

use std::sync::LazyLock;

use regex::Regex;

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::model::Operator;
use crate::version::{IdentifierOrder, VersionScheme};

static OR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s,]*\|\|?\s*").unwrap());

const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("==", Operator::Exact),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("=", Operator::Exact),
    ("~", Operator::Tilde),
    ("^", Operator::Caret),
];

pub const SCHEME: VersionScheme = VersionScheme {
    order: IdentifierOrder::Stability,
    allow_v_prefix: true,
    loose_prerelease: true,
    allow_prerelease: true,
    channels: None,
};

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::Composer,
        scheme: SCHEME,
        or_split: OrSplit::Pattern(&OR_RE),
        and_split: AndSplit::CommaOrWhitespace,
        operators: OPERATORS,
        bare_operator: Operator::Exact,
        partial_exact_is_prefix: false,
        hyphen_ranges: true,
        wildcard_chars: &['*'],
        wildcards: WildcardPolicy::Trailing,
        tilde: TildeRule::SecondToLast,
        caret_narrow_pre_1: true,
        opaque: OpaquePolicy {
            branch_prefix: Some("dev-"),
            aliases: true,
            stability_flags: true,
            tags: false,
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
