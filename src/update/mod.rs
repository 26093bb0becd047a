//! Requirement updater: rewrite a requirement so that it admits a target version
//!
//! ```text
//!              LockfileOnly ──▶ Unchanged
//!  numeric alias (`1.2.0 as 1.0.0`) ──▶ replace real side
//!     satisfied and not BumpVersions ──▶ Unchanged
//!  BumpVersions (replace mode) ──▶ bump::bump
//!  WidenRanges or append mode  ──▶ widen::widen
//!                                   │
//!            re-parse + satisfies(target)? ──▶ Updated | Unchanged | Unfixable
//! ```
//!
//! # Modules
//!
//! - [`bump`]: Track the target with each bound, keeping operator and precision
//! - [`widen`]: Append a group (or raise an upper bound) to admit the target
//! - [`upper`]: Raise an upper bound past the target

pub mod bump;
pub mod upper;
pub mod widen;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::requirement::grammar::{GrammarTable, UpdateMode};
use crate::requirement::model::{Atom, Clause, OpaqueKind, Operator, Requirement};
use crate::requirement::satisfies;
use crate::version::Version;

/// How a requirement is allowed to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStrategy {
    /// Always rewrite bounds to track the target
    BumpVersions,
    /// Rewrite only when the target is not already allowed
    BumpVersionsIfNecessary,
    /// Keep existing ranges and add one that admits the target
    WidenRanges,
    /// Never touch the requirement text
    LockfileOnly,
}

/// Outcome of one update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "requirement")]
pub enum UpdateResult {
    Unchanged,
    Updated(String),
    /// No rewrite in the original style admits the target
    Unfixable,
}

/// Update `requirement` so that it admits `target`
pub fn update(
    requirement: &Requirement,
    target: &Version,
    strategy: UpdateStrategy,
    table: &GrammarTable,
) -> UpdateResult {
    if strategy == UpdateStrategy::LockfileOnly || requirement.is_any() {
        return UpdateResult::Unchanged;
    }

    // Numeric aliases are rewritten before anything else
    if let Some(rewritten) = update_alias(requirement, target) {
        return finish(requirement, rewritten, target, table);
    }

    if requirement.groups().iter().all(|group| group.is_opaque()) {
        debug!("Requirement '{}' has no numeric part", requirement.raw());
        return UpdateResult::Unchanged;
    }

    let appends = table.update.mode == UpdateMode::Append;
    let satisfied = satisfies(requirement, target);
    if satisfied && (strategy != UpdateStrategy::BumpVersions || appends) {
        return UpdateResult::Unchanged;
    }
    if (appends || strategy == UpdateStrategy::WidenRanges)
        && table.update.major_only_covers
        && major_only_covers(requirement, target)
    {
        debug!(
            "Requirement '{}' covers {} through a major-only bound",
            requirement.raw(),
            target
        );
        return UpdateResult::Unchanged;
    }

    let rewritten = if appends || strategy == UpdateStrategy::WidenRanges {
        widen::widen(requirement, target, table)
    } else {
        bump::bump(requirement, target, table)
    };

    match rewritten {
        Some(text) => finish(requirement, text, target, table),
        None => {
            warn!(
                "No {:?} rewrite of '{}' admits {}",
                strategy,
                requirement.raw(),
                target
            );
            UpdateResult::Unfixable
        }
    }
}

/// Re-parse the rewritten text and make sure it admits the target
fn finish(
    requirement: &Requirement,
    text: String,
    target: &Version,
    table: &GrammarTable,
) -> UpdateResult {
    let reparsed = match table.parse_requirement(&text) {
        Ok(reparsed) => reparsed,
        Err(e) => {
            warn!("Rewritten requirement '{}' does not parse: {}", text, e);
            return UpdateResult::Unfixable;
        }
    };
    if !satisfies(&reparsed, target) {
        warn!(
            "Rewritten requirement '{}' still does not admit {}",
            text, target
        );
        return UpdateResult::Unfixable;
    }
    if text == requirement.raw() {
        return UpdateResult::Unchanged;
    }
    debug!("Updated '{}' to '{}'", requirement.raw(), text);
    UpdateResult::Updated(text)
}

/// Replace the real side of a numeric alias with the target
fn update_alias(requirement: &Requirement, target: &Version) -> Option<String> {
    let mut found = false;
    let text = rewrite_clauses(requirement, |_, clause| match clause {
        Clause::Opaque(opaque) => match opaque.kind() {
            OpaqueKind::Alias {
                joiner,
                alias,
                numeric: true,
                ..
            } => {
                found = true;
                format!("{}{}{}", target.raw(), joiner, alias)
            }
            _ => clause.render(),
        },
        _ => clause.render(),
    });
    found.then_some(text)
}

/// A bare major-only atom (`2`) admits its whole major line.
///
/// Release targets on that line already satisfy `[2.0.0, 3.0.0)`, so in
/// practice this only decides prereleases of the major such as `2.0.0-rc1`.
fn major_only_covers(requirement: &Requirement, target: &Version) -> bool {
    requirement.atoms().into_iter().any(|atom| {
        atom.operator() == Operator::Caret
            && !atom.is_explicit()
            && atom.precision() == 1
            && atom.wildcard_count() == 0
            && !target.is_channel()
            && atom.bound().segment(0) == target.segment(0)
    })
}

/// Render the requirement, passing every clause through `f` along with its
/// index in textual order
pub(crate) fn rewrite_clauses(
    requirement: &Requirement,
    mut f: impl FnMut(usize, &Clause) -> String,
) -> String {
    let mut out = requirement.leading().to_string();
    let mut index = 0;
    for (g, group) in requirement.groups().iter().enumerate() {
        if g > 0 {
            out.push_str(&requirement.or_separators()[g - 1]);
        }
        for (c, clause) in group.clauses().iter().enumerate() {
            if c > 0 {
                out.push_str(&group.separators()[c - 1]);
            }
            out.push_str(&f(index, clause));
            index += 1;
        }
    }
    out.push_str(requirement.trailing());
    out
}

/// Target components truncated to `atom`'s precision, wildcards kept in place
pub(crate) fn truncated_target(atom: &Atom, target: &Version) -> String {
    let segments = target.segments();
    let parts = atom.parts();
    let mut out: Vec<String> = parts
        .iter()
        .zip(segments.iter())
        .map(|(part, segment)| {
            if part.is_wildcard() {
                part.to_string()
            } else {
                segment.to_string()
            }
        })
        .collect();
    if out.is_empty() {
        out.push(target.segment(0).to_string());
    }
    let mut text = out.join(".");
    if parts.len() >= segments.len() && !parts.iter().any(|p| p.is_wildcard()) {
        text.push_str(target.prerelease_text());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::grammar::GrammarId;
    use crate::requirement::grammars;
    use rstest::rstest;

    fn run(id: GrammarId, req: &str, target: &str, strategy: UpdateStrategy) -> UpdateResult {
        let table = grammars::table(id);
        let req = table.parse_requirement(req).unwrap();
        let target = table.parse_version(target).unwrap();
        update(&req, &target, strategy, &table)
    }

    #[rstest]
    #[case(UpdateStrategy::LockfileOnly)]
    #[case(UpdateStrategy::BumpVersions)]
    #[case(UpdateStrategy::WidenRanges)]
    fn blank_requirement_is_unchanged(#[case] strategy: UpdateStrategy) {
        assert_eq!(run(GrammarId::Npm, "", "1.0.0", strategy), UpdateResult::Unchanged);
    }

    #[test]
    fn lockfile_only_never_rewrites() {
        assert_eq!(
            run(GrammarId::Composer, "^0.1", "1.5.0", UpdateStrategy::LockfileOnly),
            UpdateResult::Unchanged
        );
    }

    #[rstest]
    #[case("1.2.0 as 1.0.0", "1.5.0 as 1.0.0")]
    #[case("1.2.0   as 1.0.0", "1.5.0   as 1.0.0")]
    fn numeric_alias_replaces_real_side(#[case] req: &str, #[case] expected: &str) {
        assert_eq!(
            run(GrammarId::Composer, req, "1.5.0", UpdateStrategy::BumpVersionsIfNecessary),
            UpdateResult::Updated(expected.to_string())
        );
    }

    #[test]
    fn branch_alias_is_left_alone() {
        assert_eq!(
            run(GrammarId::Composer, "mybranch as 1.2.x", "1.5.0", UpdateStrategy::BumpVersions),
            UpdateResult::Unchanged
        );
    }

    #[test]
    fn julia_major_only_bound_counts_as_covering() {
        assert_eq!(
            run(GrammarId::Julia, "^1.10, 2", "2.6.0", UpdateStrategy::BumpVersions),
            UpdateResult::Unchanged
        );
    }

    #[rstest]
    #[case(UpdateStrategy::BumpVersions)]
    #[case(UpdateStrategy::WidenRanges)]
    fn julia_major_only_bound_covers_prerelease_of_that_major(#[case] strategy: UpdateStrategy) {
        assert_eq!(
            run(GrammarId::Julia, "^1.10, 2", "2.0.0-rc1", strategy),
            UpdateResult::Unchanged
        );
    }

    #[test]
    fn unsatisfiable_rewrite_is_unfixable() {
        assert_eq!(
            run(GrammarId::Composer, "> 2.0.0", "1.5.0", UpdateStrategy::BumpVersions),
            UpdateResult::Unfixable
        );
    }

    #[test]
    fn update_result_serializes_with_kind_tag() {
        let updated = UpdateResult::Updated("^1.5.0".to_string());
        assert_eq!(
            serde_json::to_value(&updated).unwrap(),
            serde_json::json!({ "kind": "updated", "requirement": "^1.5.0" })
        );
        assert_eq!(
            serde_json::to_value(UpdateResult::Unchanged).unwrap(),
            serde_json::json!({ "kind": "unchanged" })
        );
    }
}
