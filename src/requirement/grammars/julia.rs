//! Julia `[compat]` constraint grammar
//!
//! See <https://pkgdocs.julialang.org/v1/compatibility/>. A plain version is
//! a caret specifier, `,` between specifiers is a union, and `,` between
//! two comparison specifiers (`>= 1.0, < 2.0`) is an intersection.

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::model::Operator;
use crate::version::VersionScheme;

const OPERATORS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterOrEqual),
    ("\u{2265}", Operator::GreaterOrEqual),
    ("<=", Operator::LessOrEqual),
    ("\u{2264}", Operator::LessOrEqual),
    ("==", Operator::Exact),
    ("=", Operator::Exact),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("~", Operator::Tilde),
    ("^", Operator::Caret),
];

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::Julia,
        scheme: VersionScheme {
            allow_v_prefix: false,
            ..VersionScheme::semver()
        },
        or_split: OrSplit::CommaUnion,
        and_split: AndSplit::Comma,
        operators: OPERATORS,
        bare_operator: Operator::Caret,
        partial_exact_is_prefix: false,
        hyphen_ranges: true,
        wildcard_chars: &['*'],
        wildcards: WildcardPolicy::BareOnly,
        tilde: TildeRule::JuliaMinor,
        caret_narrow_pre_1: true,
        opaque: OpaquePolicy::default(),
        update: UpdateRules {
            mode: UpdateMode::Append,
            widen_precision: WidenPrecision::Minimal,
            collapse_operator: "^",
            default_or_separator: Some(", "),
            major_only_covers: true,
        },
    }
}
