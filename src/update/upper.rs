//! Raising an upper bound so that it admits a version

use crate::requirement::model::Atom;
use crate::version::{Version, join_segments};

/// Segments of a new upper bound above `permitted`, shaped like `old`.
///
/// The last non-zero component of `old` becomes `permitted`'s component plus
/// one, the components before it are copied from `permitted` and the ones
/// after it are zeroed: `1.2.3` with `1.5.0` gives `1.5.1`, `1.4.0` gives
/// `1.6.0`. Prerelease suffixes on `old` are dropped.
pub fn raise(old: &Version, permitted: &Version) -> Vec<u64> {
    let segments = old.release().segments().to_vec();
    let index = segments
        .iter()
        .enumerate()
        .map(|(i, &s)| if s == 0 { 0 } else { i })
        .max()
        .unwrap_or(0);
    segments
        .iter()
        .enumerate()
        .map(|(i, _)| match i.cmp(&index) {
            std::cmp::Ordering::Less => permitted.segment(i),
            std::cmp::Ordering::Equal => permitted.segment(i).saturating_add(1),
            std::cmp::Ordering::Greater => 0,
        })
        .collect()
}

/// Render `atom` with its bound raised above `permitted`
pub fn raise_atom(atom: &Atom, permitted: &Version) -> String {
    atom.with_bound_text(&join_segments(&raise(atom.bound(), permitted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::grammars::composer::SCHEME;
    use rstest::rstest;

    fn v(raw: &str) -> Version {
        Version::parse(raw, &SCHEME).unwrap()
    }

    #[rstest]
    #[case("1.2.3", "1.5.0", "1.5.1")]
    #[case("1.4.0", "1.5.0", "1.6.0")]
    #[case("1.2.0", "1.5.0", "1.6.0")]
    #[case("1.4.0-dev", "1.5.0", "1.6.0")]
    #[case("2", "3.1.0", "4")]
    #[case("0.0.0", "0.4.0", "1.0.0")]
    fn raise_bumps_last_non_zero_component(
        #[case] old: &str,
        #[case] permitted: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(join_segments(&raise(&v(old), &v(permitted))), expected);
    }
}
