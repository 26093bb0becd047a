//! Expansion of operator/bound pairs into primitive comparators
//!
//! ```text
//!  ^1.2.3  ──▶ >=1.2.3, <2.0.0
//!  ~1.2.3  ──▶ >=1.2.3, <1.3.0      (tilde rule of the grammar)
//!  1.4.*   ──▶ >=1.4.0, <1.5.0
//!  *       ──▶ (unconstrained)
//!  1.72    ──▶ >=1.72.0, <1.73.0    (prefix grammars only)
//! ```

use crate::requirement::grammar::{GrammarTable, TildeRule};
use crate::requirement::model::{Cmp, Comparator, Operator};
use crate::version::{Version, VersionScheme};

/// Minimum number of components rendered for computed bounds
const MIN_WIDTH: usize = 3;

/// Expand an atom. `given` is the numeric prefix as written (wildcards excluded).
pub(crate) fn expand(
    operator: Operator,
    given: &[u64],
    bound: &Version,
    table: &GrammarTable,
) -> Vec<Comparator> {
    let scheme = &table.scheme;
    if bound.is_channel() {
        return vec![Comparator::new(Cmp::Eq, bound.clone())];
    }
    match operator {
        Operator::Wildcard => {
            if given.is_empty() {
                return Vec::new();
            }
            prefix_range(given, scheme)
        }
        Operator::Exact => {
            if table.partial_exact_is_prefix && given.len() < MIN_WIDTH && !bound.is_prerelease()
            {
                prefix_range(given, scheme)
            } else {
                vec![Comparator::new(Cmp::Eq, bound.clone())]
            }
        }
        Operator::Greater => vec![Comparator::new(Cmp::Gt, bound.clone())],
        Operator::GreaterOrEqual => vec![Comparator::new(Cmp::Gte, bound.clone())],
        Operator::Less => vec![Comparator::new(Cmp::Lt, bound.clone())],
        Operator::LessOrEqual => vec![Comparator::new(Cmp::Lte, bound.clone())],
        Operator::Caret => {
            let index = caret_index(given, table.caret_narrow_pre_1);
            bounded(given, index, bound, scheme)
        }
        Operator::Tilde => {
            let index = tilde_index(given, table.tilde);
            bounded(given, index, bound, scheme)
        }
    }
}

/// Upper bound of `A - B`: inclusive when `B` is complete, otherwise
/// exclusive at the next unit of its last component
pub(crate) fn hyphen_upper(given: &[u64], bound: &Version, scheme: &VersionScheme) -> Comparator {
    if given.len() >= MIN_WIDTH || bound.is_prerelease() {
        Comparator::new(Cmp::Lte, bound.clone())
    } else {
        Comparator::new(Cmp::Lt, bump(given, given.len() - 1, scheme))
    }
}

/// Component incremented by `^`
pub(crate) fn caret_index(given: &[u64], narrow_pre_1: bool) -> usize {
    if !narrow_pre_1 {
        return 0;
    }
    given
        .iter()
        .position(|&s| s != 0)
        .unwrap_or(given.len().saturating_sub(1))
}

/// Component incremented by `~`
pub(crate) fn tilde_index(given: &[u64], rule: TildeRule) -> usize {
    let n = given.len();
    match rule {
        TildeRule::Minor => usize::from(n >= 2),
        TildeRule::SecondToLast => n.saturating_sub(2),
        TildeRule::JuliaMinor => {
            if n == 3 && given[0] == 0 && given[1] == 0 {
                2
            } else {
                usize::from(n >= 2)
            }
        }
    }
}

/// Increment component `index` and zero everything after it
pub(crate) fn bump(given: &[u64], index: usize, scheme: &VersionScheme) -> Version {
    let mut segments = padded(given, index + 1);
    segments[index] = segments[index].saturating_add(1);
    for s in segments.iter_mut().skip(index + 1) {
        *s = 0;
    }
    Version::from_segments(&segments, scheme)
}

fn padded(given: &[u64], at_least: usize) -> Vec<u64> {
    let mut segments = given.to_vec();
    let width = MIN_WIDTH.max(at_least).max(given.len());
    segments.resize(width, 0);
    segments
}

fn prefix_range(given: &[u64], scheme: &VersionScheme) -> Vec<Comparator> {
    vec![
        Comparator::new(Cmp::Gte, Version::from_segments(&padded(given, 0), scheme)),
        Comparator::new(Cmp::Lt, bump(given, given.len() - 1, scheme)),
    ]
}

fn bounded(given: &[u64], index: usize, bound: &Version, scheme: &VersionScheme) -> Vec<Comparator> {
    let lower = if bound.is_prerelease() || bound.build().is_some() {
        bound.clone()
    } else {
        Version::from_segments(&padded(given, 0), scheme)
    };
    vec![
        Comparator::new(Cmp::Gte, lower),
        Comparator::new(Cmp::Lt, bump(given, index, scheme)),
    ]
}
