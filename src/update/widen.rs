//! `WidenRanges`, and `BumpVersions` for grammars that append
//!
//! The operator family is chosen across every atom, in priority
//! caret > tilde > wildcard > range > exact.

use tracing::debug;

use crate::requirement::grammar::{AndSplit, GrammarTable, TildeRule, WidenPrecision};
use crate::requirement::model::{Atom, Clause, Operator, Requirement};
use crate::update::bump::{self, collapse, or_separator};
use crate::update::{rewrite_clauses, upper};
use crate::version::{Version, join_segments};

/// Operator family that drives widening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Caret,
    Tilde,
    Wildcard,
    Range,
    Exact,
}

fn family(atoms: &[&Atom], clauses: &[&Clause]) -> Family {
    let has = |op: Operator| atoms.iter().any(|a| a.operator() == op);
    if has(Operator::Caret) {
        Family::Caret
    } else if has(Operator::Tilde) {
        Family::Tilde
    } else if atoms
        .iter()
        .any(|a| a.operator() == Operator::Wildcard && a.numeric_precision() > 0)
    {
        Family::Wildcard
    } else if clauses.iter().any(|c| is_upper_clause(c)) {
        Family::Range
    } else {
        Family::Exact
    }
}

fn is_upper_clause(clause: &Clause) -> bool {
    match clause {
        Clause::Atom(atom) => atom.operator().is_upper_bound(),
        Clause::Hyphen { .. } => true,
        Clause::Opaque(_) => false,
    }
}

/// Widen `requirement` so it also admits `target`. `None` means no
/// rewrite in the original style exists.
pub fn widen(requirement: &Requirement, target: &Version, table: &GrammarTable) -> Option<String> {
    let clauses: Vec<&Clause> = requirement
        .groups()
        .iter()
        .flat_map(|group| group.clauses())
        .collect();
    let atoms: Vec<&Atom> = requirement
        .groups()
        .iter()
        .filter(|group| !group.is_opaque())
        .flat_map(|group| group.atoms())
        .collect();
    if atoms.is_empty() {
        return None;
    }
    // Channels have no range form, so they move within their channel
    if target.is_channel() || atoms.iter().any(|a| a.bound().is_channel()) {
        return bump::bump(requirement, target, table);
    }

    let family = family(&atoms, &clauses);
    debug!("Widening '{}' as {:?} family", requirement.raw(), family);
    match family {
        Family::Caret => {
            let carets = select(&atoms, |a| a.operator() == Operator::Caret);
            let group = caret_group(&carets, target, table);
            append_or_split(requirement, &carets, group, target, table)
        }
        Family::Tilde => {
            let tildes = select(&atoms, |a| a.operator() == Operator::Tilde);
            let group = tilde_group(&tildes, target, table);
            append_or_split(requirement, &tildes, group, target, table)
        }
        Family::Wildcard => {
            let wildcards = select(&atoms, |a| {
                a.operator() == Operator::Wildcard && a.numeric_precision() > 0
            });
            let group = wildcard_group(&wildcards, target);
            append_or_split(requirement, &wildcards, group, target, table)
        }
        Family::Range => widen_range(requirement, &clauses, target, table),
        Family::Exact => Some(replace_first_bound(requirement, target)),
    }
}

fn select<'a>(atoms: &[&'a Atom], keep: impl Fn(&Atom) -> bool) -> Vec<&'a Atom> {
    atoms.iter().copied().filter(|a| keep(a)).collect()
}

fn caret_group(carets: &[&Atom], target: &Version, table: &GrammarTable) -> String {
    let segments = target.segments();
    let first_non_zero = segments
        .iter()
        .position(|&s| s != 0)
        .unwrap_or(segments.len().saturating_sub(1));
    let minimal = first_non_zero + 1;
    let precision = match table.update.widen_precision {
        WidenPrecision::MatchExisting => carets
            .iter()
            .map(|a| a.precision())
            .min()
            .map_or(minimal, |existing| existing.max(minimal)),
        WidenPrecision::Minimal => minimal,
    };
    let parts: Vec<u64> = segments
        .iter()
        .take(precision)
        .enumerate()
        .map(|(i, &s)| if i <= first_non_zero { s } else { 0 })
        .collect();
    new_group(carets, &join_segments(&parts))
}

/// Target at the minimum tilde precision. Under the second-to-last rule
/// (`~2.0` is `[2.0, 3.0)`) the last component is zeroed.
fn tilde_group(tildes: &[&Atom], target: &Version, table: &GrammarTable) -> String {
    let precision = tildes.iter().map(|a| a.precision()).min().unwrap_or(1);
    let mut parts: Vec<u64> = target.segments().iter().take(precision).copied().collect();
    if table.tilde == TildeRule::SecondToLast && parts.len() > 1 {
        if let Some(last) = parts.last_mut() {
            *last = 0;
        }
    }
    new_group(tildes, &join_segments(&parts))
}

fn wildcard_group(wildcards: &[&Atom], target: &Version) -> String {
    let precision = wildcards
        .iter()
        .map(|a| a.numeric_precision())
        .min()
        .unwrap_or(1);
    let count = wildcards.iter().map(|a| a.wildcard_count()).min().unwrap_or(1);
    let symbol = wildcards
        .last()
        .and_then(|a| a.parts().iter().find(|p| p.is_wildcard()))
        .map_or_else(|| "*".to_string(), |p| p.to_string());
    let mut text = join_segments(&target.segments()[..precision.min(target.segments().len())]);
    for _ in 0..count {
        text.push('.');
        text.push_str(&symbol);
    }
    text
}

/// New group in the style of the last atom of the family
fn new_group(family: &[&Atom], bound: &str) -> String {
    let Some(model) = family.last() else {
        return bound.to_string();
    };
    let mut out = model.op_text().to_string();
    if let Some(v) = model.v_prefix() {
        out.push(v);
    }
    out.push_str(bound);
    out
}

/// Append `group` as a new OR-group, or for grammars without OR groups
/// rewrite the family atom into an explicit lower/upper pair
fn append_or_split(
    requirement: &Requirement,
    family: &[&Atom],
    group: String,
    target: &Version,
    table: &GrammarTable,
) -> Option<String> {
    if table.supports_or() {
        let separator = or_separator(requirement, table);
        return Some(format!(
            "{}{}{}{}{}",
            requirement.leading(),
            requirement.render_body(),
            separator,
            group,
            requirement.trailing()
        ));
    }

    let model = *family.first()?;
    let upper_bound = &model.comparators().last()?.version;
    let raised = upper::raise(upper_bound, target);
    let keep = model.numeric_precision().max(1);
    let lower = match model.numeric_precision() {
        0 => "0".to_string(),
        n => join_segments(&model.bound().segments()[..n.min(model.bound().segments().len())]),
    };
    let and_separator = match table.and_split {
        AndSplit::Comma => ", ",
        _ => " ",
    };
    let split = format!(
        ">={}{}<{}",
        lower,
        and_separator,
        join_segments(&raised[..keep.min(raised.len())])
    );
    let mut replaced = false;
    Some(rewrite_clauses(requirement, |_, clause| match clause {
        Clause::Atom(atom) if !replaced && std::ptr::eq(atom, model) => {
            replaced = true;
            split.clone()
        }
        _ => clause.render(),
    }))
}

fn widen_range(
    requirement: &Requirement,
    clauses: &[&Clause],
    target: &Version,
    table: &GrammarTable,
) -> Option<String> {
    let uppers = clauses.iter().filter(|c| is_upper_clause(c)).count();
    if uppers != 1 {
        if !table.supports_or() {
            return None;
        }
        let separator = or_separator(requirement, table);
        return Some(format!(
            "{}{}{}{}{}",
            requirement.leading(),
            requirement.render_body(),
            separator,
            collapse(target, table),
            requirement.trailing()
        ));
    }
    Some(rewrite_clauses(requirement, |_, clause| match clause {
        Clause::Atom(atom) if atom.operator().is_upper_bound() => upper::raise_atom(atom, target),
        Clause::Hyphen {
            lower,
            joiner,
            upper: bound,
        } => format!("{}{}{}", lower.render(), joiner, upper::raise_atom(bound, target)),
        _ => clause.render(),
    }))
}

/// Replace the first bound with the target text
fn replace_first_bound(requirement: &Requirement, target: &Version) -> String {
    let mut replaced = false;
    rewrite_clauses(requirement, |_, clause| match clause {
        Clause::Atom(atom) if !replaced => {
            replaced = true;
            atom.with_bound_text(target.unprefixed())
        }
        _ => clause.render(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::grammar::GrammarId;
    use crate::requirement::grammars;
    use rstest::rstest;

    fn widened(id: GrammarId, req: &str, target: &str) -> Option<String> {
        let table = grammars::table(id);
        let req = table.parse_requirement(req).unwrap();
        let target = table.parse_version(target).unwrap();
        widen(&req, &target, &table)
    }

    #[rstest]
    #[case("^0.8", "1.5.0", "^0.8 || ^1.0")]
    #[case("^0.8.0", "1.5.0", "^0.8.0 || ^1.0.0")]
    #[case("^0.0.0", "0.0.2", "^0.0.0 || ^0.0.2")]
    #[case("~2.4.1", "2.5.3", "~2.4.1 || ~2.5.0")]
    #[case(" ~2.4.1", "2.5.3", " ~2.4.1 || ~2.5.0")]
    #[case("~0.4|~1.0", "2.5.3", "~0.4|~1.0|~2.0")]
    #[case("0.*.*", "1.5.0", "0.*.* || 1.*.*")]
    #[case("0.*", "1.5.0", "0.* || 1.*")]
    #[case("> 1.0.0 < 1.2.0", "1.5.0", "> 1.0.0 < 1.6.0")]
    #[case("> 1.0.0, < 1.2.0", "1.5.0", "> 1.0.0, < 1.6.0")]
    #[case(">=1.2.0,<1.4.0-dev", "1.5.0", ">=1.2.0,<1.6.0")]
    #[case("> 1.0, < 1.2 || ^2.0.0", "1.5.0", "> 1.0, < 1.2 || ^2.0.0 || ^1.0.0")]
    #[case("< 1.2.3", "1.5.0", "< 1.5.1")]
    #[case("1.2.3 - 1.4.0", "1.5.0", "1.2.3 - 1.6.0")]
    #[case("1.2.3", "1.5.0", "1.5.0")]
    #[case("1.2.3@dev", "1.5.0", "1.5.0@dev")]
    #[case("1.0-beta1", "1.0-beta2", "1.0-beta2")]
    #[case("1", "4.5.0", "4.5.0")]
    #[case("1.1.0.1", "4", "4")]
    fn composer_widen_admits_target(#[case] req: &str, #[case] target: &str, #[case] expected: &str) {
        assert_eq!(
            widened(GrammarId::Composer, req, target).as_deref(),
            Some(expected)
        );
    }

    #[rstest]
    #[case(GrammarId::Julia, "0.34.6", "0.35.0", "0.34.6, 0.35")]
    #[case(GrammarId::Julia, "1.6", "2.1.0", "1.6, 2")]
    #[case(GrammarId::Npm, "^1.2.3", "2.0.0", "^1.2.3 || ^2.0.0")]
    #[case(GrammarId::Npm, "1.x", "2.3.0", "1.x || 2.x")]
    #[case(GrammarId::Npm, "~1.2", "1.5.0", "~1.2 || ~1.5")]
    #[case(GrammarId::Npm, "~1.2.3", "1.5.2", "~1.2.3 || ~1.5.2")]
    #[case(GrammarId::Npm, "~1", "3.1.0", "~1 || ~3")]
    #[case(GrammarId::Julia, "~1.2", "1.5.0", "~1.2, ~1.5")]
    #[case(GrammarId::Julia, "~0.0.3", "0.0.5", "~0.0.3, ~0.0.5")]
    #[case(GrammarId::RustToolchain, "beta-2023-01-01", "beta-2023-06-01", "beta-2023-06-01")]
    #[case(GrammarId::RustToolchain, "stable-2023-01-01", "stable-2023-02-01", "stable-2023-02-01")]
    #[case(GrammarId::Cargo, "1.2", "2.1.0", ">=1.2, <3.0")]
    #[case(GrammarId::Cargo, "~0.4.1", "0.6.0", ">=0.4.1, <0.7.0")]
    fn other_grammars_widen_in_their_own_style(
        #[case] id: GrammarId,
        #[case] req: &str,
        #[case] target: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(widened(id, req, target).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("stable", "beta")]
    #[case("1.72.0", "nightly-2023-06-01")]
    #[case("nightly-2023-01-01", "1.73.0")]
    fn toolchain_channel_switch_has_no_widening(#[case] req: &str, #[case] target: &str) {
        assert_eq!(widened(GrammarId::RustToolchain, req, target), None);
    }

    #[test]
    fn opaque_only_requirement_has_no_widening() {
        assert_eq!(widened(GrammarId::Composer, "dev-master", "1.5.0"), None);
    }
}
