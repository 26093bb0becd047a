use req_bump::{Engine, GrammarId, GrammarRegistry, UpdateRequest, UpdateResult, UpdateStrategy};
use rstest::rstest;

fn run(requirement: &str, target: &str, strategy: UpdateStrategy) -> UpdateResult {
    Engine::new(GrammarRegistry::builtin())
        .process(&UpdateRequest::new(
            GrammarId::Composer,
            Some(requirement),
            target,
            strategy,
        ))
        .unwrap()
        .result
}

fn updated(text: &str) -> UpdateResult {
    UpdateResult::Updated(text.to_string())
}

#[rstest]
#[case("^1.0", "1.5.0")]
#[case("~1.2", "1.5.0")]
#[case("1.*", "1.5.0")]
#[case(">=1.0 <2.0", "1.5.0")]
#[case("^0.1 || ^1.0", "1.5.0")]
#[case("*", "1.5.0")]
fn satisfied_requirement_is_unchanged_when_bumping_if_necessary(
    #[case] requirement: &str,
    #[case] target: &str,
) {
    assert_eq!(
        run(requirement, target, UpdateStrategy::BumpVersionsIfNecessary),
        UpdateResult::Unchanged
    );
}

#[rstest]
#[case("^1.0", "1.5.0", "^1.5")]
#[case("~1.2.1", "1.5.0", "~1.5.0")]
#[case("1.2.*", "1.5.0", "1.5.*")]
#[case(">= 1.2.3", "1.5.0", ">= 1.5.0")]
#[case("  ^1.0  ", "1.5.0", "  ^1.5  ")]
fn bump_versions_rewrites_satisfied_requirements(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        run(requirement, target, UpdateStrategy::BumpVersions),
        updated(expected)
    );
}

#[rstest]
#[case("^0.2.3", "1.5.0", "^1.5.0")]
#[case("1.4.*", "1.5.2", "1.5.*")]
#[case("~1.4", "2.5.3", "~2.5")]
#[case("1.2.3", "1.5.0", "1.5.0")]
#[case("< 1.2.3", "1.5.0", "< 1.5.1")]
#[case("1.2.3 - 1.4.0", "1.5.0", "1.2.3 - 1.6.0")]
#[case("> 1.0.0, < 1.2.0", "1.5.0", "^1.5.0")]
#[case("dev-master || ^0.9.0", "1.5.0", "^1.5.0 || dev-master")]
#[case("1.2.0 as 1.0.0", "1.5.0", "1.5.0 as 1.0.0")]
fn bump_if_necessary_tracks_the_target(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        run(requirement, target, UpdateStrategy::BumpVersionsIfNecessary),
        updated(expected)
    );
}

#[rstest]
#[case("^0.8", "1.5.0", "^0.8 || ^1.0")]
#[case("~2.4.1", "2.5.3", "~2.4.1 || ~2.5.0")]
#[case("~0.4|~1.0", "2.5.3", "~0.4|~1.0|~2.0")]
#[case("0.*", "1.5.0", "0.* || 1.*")]
#[case("> 1.0.0 < 1.2.0", "1.5.0", "> 1.0.0 < 1.6.0")]
#[case(">=1.2.0,<1.4.0-dev", "1.5.0", ">=1.2.0,<1.6.0")]
#[case("1.2.3@dev", "1.5.0", "1.5.0@dev")]
fn widen_ranges_keeps_existing_ranges(
    #[case] requirement: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    assert_eq!(
        run(requirement, target, UpdateStrategy::WidenRanges),
        updated(expected)
    );
}

#[rstest]
#[case("dev-master")]
#[case("dev-feature/foo")]
#[case("mybranch as 1.2.x")]
#[case("1.0.x-dev")]
#[case("@dev")]
fn opaque_requirements_are_left_alone(#[case] requirement: &str) {
    assert_eq!(
        run(requirement, "1.5.0", UpdateStrategy::BumpVersions),
        UpdateResult::Unchanged
    );
}

#[test]
fn lower_bound_above_target_is_unfixable() {
    assert_eq!(
        run("> 2.0.0", "1.5.0", UpdateStrategy::BumpVersions),
        UpdateResult::Unfixable
    );
}

#[test]
fn lockfile_only_never_touches_the_requirement() {
    assert_eq!(
        run("^0.1", "1.5.0", UpdateStrategy::LockfileOnly),
        UpdateResult::Unchanged
    );
}
