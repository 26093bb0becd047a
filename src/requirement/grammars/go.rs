//! Go modules constraint grammar
//!
//! A go.mod requirement is a single exact version such as `v1.2.3`,
//! `v2.0.0+incompatible` or a pseudo-version
//! `v0.0.0-20210101000000-abcdefabcdef`. `+incompatible` is build metadata.

use crate::requirement::grammar::{
    AndSplit, GrammarId, GrammarTable, OpaquePolicy, OrSplit, TildeRule, UpdateMode,
    UpdateRules, WidenPrecision, WildcardPolicy,
};
use crate::requirement::model::Operator;
use crate::version::VersionScheme;

pub fn table() -> GrammarTable {
    GrammarTable {
        id: GrammarId::GoModules,
        scheme: VersionScheme::semver(),
        or_split: OrSplit::None,
        and_split: AndSplit::Single,
        operators: &[],
        bare_operator: Operator::Exact,
        partial_exact_is_prefix: false,
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfies(req: &str, version: &str) -> bool {
        let table = table();
        let req = table.parse_requirement(req).unwrap();
        req.satisfied_by(&table.parse_version(version).unwrap())
    }

    #[rstest]
    #[case("v1.2.3", "v1.2.3", true)]
    #[case("v1.2.3", "v1.2.4", false)]
    #[case("v2.0.0+incompatible", "v2.0.0", true)]
    #[case(
        "v0.0.0-20210101000000-abcdefabcdef",
        "v0.0.0-20210101000000-abcdefabcdef",
        true
    )]
    fn satisfies_returns_expected(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[test]
    fn pseudo_versions_order_by_timestamp() {
        let table = table();
        let older = table
            .parse_version("v0.0.0-20210101000000-abcdefabcdef")
            .unwrap();
        let newer = table
            .parse_version("v0.0.0-20220101000000-123456789abc")
            .unwrap();
        assert!(older < newer);
    }

    #[rstest]
    #[case("^v1.2.3")]
    #[case("v1.*")]
    #[case("v1.2.3 v1.3.0")]
    fn parse_rejects_ranges(#[case] req: &str) {
        assert!(table().parse_requirement(req).is_err());
    }
}
