use req_bump::requirement::grammars::rust_toolchain;
use req_bump::{
    Engine, EngineConfig, EngineError, GrammarId, UpdateOutcome, UpdateRequest, UpdateResult,
    UpdateStrategy, Version,
};
use rstest::rstest;
use std::cmp::Ordering;

fn process(
    grammar: GrammarId,
    requirement: &str,
    target: &str,
    strategy: UpdateStrategy,
) -> UpdateOutcome {
    Engine::from_config(&EngineConfig::default())
        .process(&UpdateRequest::new(grammar, Some(requirement), target, strategy))
        .unwrap()
}

fn updated(text: &str) -> UpdateResult {
    UpdateResult::Updated(text.to_string())
}

#[rstest]
#[case("0.34.6", "0.35.0", "0.34.6, 0.35")]
#[case("1.6", "2.1.0", "1.6, 2")]
#[case("0.7, 0.8", "0.9.1", "0.7, 0.8, 0.9")]
fn julia_compat_appends_a_new_entry(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let outcome = process(GrammarId::Julia, requirement, target, UpdateStrategy::BumpVersions);
    assert_eq!(outcome.result, updated(expected));
    assert!(!outcome.satisfied_before);
}

#[rstest]
#[case("^1.10, 2", "2.6.0")]
#[case("1.6", "1.9.3")]
#[case("0.34", "0.34.9")]
fn julia_compat_already_covering_is_unchanged(#[case] requirement: &str, #[case] target: &str) {
    let outcome = process(GrammarId::Julia, requirement, target, UpdateStrategy::BumpVersions);
    assert_eq!(outcome.result, UpdateResult::Unchanged);
}

#[rstest]
#[case("1.72", "1.73.0", "1.73")]
#[case("1.72.0", "1.73.1", "1.73.1")]
#[case("nightly-2023-01-01", "nightly-2023-06-01", "nightly-2023-06-01")]
fn toolchain_channel_tracks_target(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let outcome = process(
        GrammarId::RustToolchain,
        requirement,
        target,
        UpdateStrategy::BumpVersionsIfNecessary,
    );
    assert_eq!(outcome.result, updated(expected));
}

#[rstest]
#[case("beta-2023-01-01", "beta-2023-06-01", "beta-2023-06-01")]
#[case("nightly-2023-01-01", "nightly-2023-06-01", "nightly-2023-06-01")]
fn toolchain_channel_widens_within_its_channel(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let outcome = process(
        GrammarId::RustToolchain,
        requirement,
        target,
        UpdateStrategy::WidenRanges,
    );
    assert_eq!(outcome.result, updated(expected));
}

#[rstest]
#[case("stable", "1.73.0")]
#[case("1.72", "beta")]
#[case("nightly-2023-01-01", "beta-2023-06-01")]
fn toolchain_channel_switch_is_unfixable(#[case] requirement: &str, #[case] target: &str) {
    let outcome = process(
        GrammarId::RustToolchain,
        requirement,
        target,
        UpdateStrategy::BumpVersions,
    );
    assert_eq!(outcome.result, UpdateResult::Unfixable);
    assert!(!outcome.satisfied_before);
}

fn toolchain(raw: &str) -> Version {
    Version::parse(raw, &rust_toolchain::SCHEME).unwrap()
}

#[rstest]
#[case("stable", "beta", Some(Ordering::Greater))]
#[case("beta", "nightly", Some(Ordering::Greater))]
#[case("nightly-2020-12-31", "nightly-2021-01-01", Some(Ordering::Less))]
#[case("stable-2020-12-31", "beta-2021-01-01", Some(Ordering::Greater))]
#[case("stable", "1.72.0", None)]
fn toolchain_channels_order_by_rank_then_date(
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: Option<Ordering>,
) {
    assert_eq!(toolchain(left).compare(&toolchain(right)), expected);
}

#[rstest]
#[case("v1.4.0", "v1.5.2", "v1.5.2")]
#[case("v0.0.0-20230101000000-abcdef123456", "v0.1.0", "v0.1.0")]
fn go_module_version_is_replaced(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let outcome = process(
        GrammarId::GoModules,
        requirement,
        target,
        UpdateStrategy::BumpVersionsIfNecessary,
    );
    assert_eq!(outcome.result, updated(expected));
}

#[rstest]
#[case(UpdateStrategy::BumpVersionsIfNecessary, "^1.2.3", "1.9.0", UpdateResult::Unchanged)]
#[case(UpdateStrategy::BumpVersions, "^1.2.3", "1.9.0", updated("^1.9.0"))]
#[case(UpdateStrategy::BumpVersionsIfNecessary, "~1.2", "1.4.0", updated("~1.4"))]
#[case(UpdateStrategy::WidenRanges, "^1.2.3", "2.0.0", updated("^1.2.3 || ^2.0.0"))]
#[case(UpdateStrategy::WidenRanges, ">=1.0.0 <2.0.0", "2.1.0", updated(">=1.0.0 <3.0.0"))]
#[case(UpdateStrategy::BumpVersionsIfNecessary, "latest", "2.0.0", UpdateResult::Unchanged)]
fn npm_requirements(
    #[case] strategy: UpdateStrategy,
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: UpdateResult,
) {
    assert_eq!(process(GrammarId::Npm, requirement, target, strategy).result, expected);
}

#[rstest]
#[case(UpdateStrategy::BumpVersionsIfNecessary, "0.4", "0.6.2", updated("0.6"))]
#[case(UpdateStrategy::BumpVersionsIfNecessary, "1.2", "1.9.0", UpdateResult::Unchanged)]
#[case(UpdateStrategy::BumpVersions, "=1.2.3", "1.3.0", updated("=1.3.0"))]
#[case(UpdateStrategy::WidenRanges, "1.2", "2.1.0", updated(">=1.2, <3.0"))]
fn cargo_requirements(
    #[case] strategy: UpdateStrategy,
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: UpdateResult,
) {
    assert_eq!(process(GrammarId::Cargo, requirement, target, strategy).result, expected);
}

#[test]
fn disabled_grammar_is_rejected() {
    let config: EngineConfig = serde_json::from_value(serde_json::json!({
        "grammars": { "goModules": { "enabled": false } }
    }))
    .unwrap();
    let err = Engine::from_config(&config)
        .process(&UpdateRequest::new(
            GrammarId::GoModules,
            Some("v1.0.0"),
            "v1.1.0",
            UpdateStrategy::BumpVersions,
        ))
        .unwrap_err();
    assert!(matches!(err, EngineError::GrammarDisabled(GrammarId::GoModules)));
}
