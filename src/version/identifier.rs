//! Dot-separated version identifiers and their ordering policies

use std::cmp::Ordering;
use std::fmt;

/// A single prerelease identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Identifier {
    /// Classify a raw identifier. All-digit identifiers that overflow `u64`
    /// are kept as alphanumeric so parsing never fails on them.
    pub fn new(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<u64>() {
                return Identifier::Numeric(n);
            }
        }
        Identifier::Alpha(raw.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::Alpha(s) => write!(f, "{s}"),
        }
    }
}

/// How prerelease identifiers are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierOrder {
    /// Semver precedence: numeric before alphanumeric, alphanumeric compared
    /// lexically, a release sorts after all of its prereleases
    NumericFirst,
    /// Composer stability precedence:
    /// `dev < alpha < beta < RC < release < patch`
    Stability,
}

/// Rank of a release without any prerelease identifiers
const RELEASE_RANK: u8 = 4;

/// Stability rank of a Composer suffix word, `None` for unknown words
fn stability_rank(word: &str) -> Option<u8> {
    match word.to_ascii_lowercase().as_str() {
        "dev" => Some(0),
        "alpha" | "a" => Some(1),
        "beta" | "b" => Some(2),
        "rc" => Some(3),
        "patch" | "pl" | "p" => Some(5),
        _ => None,
    }
}

impl IdentifierOrder {
    /// Compare two prerelease lists (empty means "release")
    pub fn compare_prerelease(self, a: &[Identifier], b: &[Identifier]) -> Ordering {
        match self {
            IdentifierOrder::NumericFirst => match (a.is_empty(), b.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => compare_lists(self, a, b),
            },
            IdentifierOrder::Stability => {
                let (rank_a, rest_a) = split_stability(a);
                let (rank_b, rest_b) = split_stability(b);
                rank_a
                    .cmp(&rank_b)
                    .then_with(|| compare_lists(self, rest_a, rest_b))
            }
        }
    }

    fn compare_identifiers(self, a: &Identifier, b: &Identifier) -> Ordering {
        match (a, b) {
            (Identifier::Numeric(x), Identifier::Numeric(y)) => x.cmp(y),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(x), Identifier::Alpha(y)) => match self {
                IdentifierOrder::NumericFirst => x.cmp(y),
                IdentifierOrder::Stability => match (stability_rank(x), stability_rank(y)) {
                    (Some(rx), Some(ry)) => rx.cmp(&ry),
                    _ => x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()),
                },
            },
        }
    }
}

/// Split a Composer prerelease into its leading stability rank and the rest.
/// Lists that do not start with a known stability word rank as a release.
fn split_stability(ids: &[Identifier]) -> (u8, &[Identifier]) {
    match ids.first() {
        None => (RELEASE_RANK, ids),
        Some(Identifier::Alpha(word)) => match stability_rank(word) {
            Some(rank) => (rank, &ids[1..]),
            None => (RELEASE_RANK, ids),
        },
        Some(Identifier::Numeric(_)) => (RELEASE_RANK, ids),
    }
}

fn compare_lists(order: IdentifierOrder, a: &[Identifier], b: &[Identifier]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match order.compare_identifiers(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}
