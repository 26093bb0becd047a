//! Satisfaction of a requirement by a version
//!
//! A version satisfies a requirement when it satisfies at least one OR-group,
//! and an OR-group when it satisfies every clause in it. Incomparable
//! versions (a channel against a numeric bound) never satisfy.

use tracing::debug;

use crate::requirement::model::{Clause, Requirement};
use crate::version::Version;

/// Whether `version` is allowed by `requirement`
pub fn satisfies(requirement: &Requirement, version: &Version) -> bool {
    if requirement.is_any() {
        return true;
    }
    let satisfied = requirement
        .groups()
        .iter()
        .any(|group| group.satisfied_by(version));
    if !satisfied && has_incomparable_bound(requirement, version) {
        debug!(
            "Version {} is incomparable with a bound of '{}', treated as unsatisfied",
            version.raw(),
            requirement.raw()
        );
    }
    satisfied
}

fn has_incomparable_bound(requirement: &Requirement, version: &Version) -> bool {
    requirement
        .groups()
        .iter()
        .flat_map(|group| group.clauses())
        .filter(|clause| !matches!(clause, Clause::Opaque(_)))
        .flat_map(|clause| clause.atoms())
        .flat_map(|atom| atom.comparators())
        .any(|c| version.compare(&c.version).is_none())
}

impl Requirement {
    /// See [`satisfies`]
    pub fn satisfied_by(&self, version: &Version) -> bool {
        satisfies(self, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::grammar::GrammarId;
    use crate::requirement::grammars;
    use rstest::rstest;

    fn check(id: GrammarId, req: &str, version: &str) -> bool {
        let table = grammars::table(id);
        let req = table.parse_requirement(req).unwrap();
        let version = table.parse_version(version).unwrap();
        satisfies(&req, &version)
    }

    #[rstest]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case(">=1.0.0 <2.0.0", "1.5.0", true)]
    #[case(">=1.0.0 <2.0.0", "2.0.0", false)]
    #[case("^1.0.0 || ^2.0.0", "2.3.0", true)]
    #[case("1.2.x", "1.2.7", true)]
    #[case("1.2.x", "1.3.0", false)]
    #[case("", "9.9.9", true)]
    #[case("latest", "1.0.0", false)]
    fn npm_satisfies_returns_expected(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(check(GrammarId::Npm, req, version), expected);
    }

    #[rstest]
    #[case("stable", "1.72.0", false)]
    #[case("1.72", "stable", false)]
    #[case("nightly", "nightly-2023-01-01", false)]
    #[case("nightly-2023-01-01", "nightly-2023-01-01", true)]
    fn incomparable_versions_never_satisfy(
        #[case] req: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(check(GrammarId::RustToolchain, req, version), expected);
    }
}
