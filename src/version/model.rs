//! Canonical, ordered representation of a single version value

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::VersionError;
use crate::version::channel::{Channel, ChannelTable};
use crate::version::identifier::{Identifier, IdentifierOrder};

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([vV])?(\d+(?:\.\d+)*)(.*)$").unwrap());
static STRICT_PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*$").unwrap());
static LOOSE_PRERELEASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[.\-_]?([A-Za-z]+(?:[.\-_]?\d+)*(?:[.\-_][0-9A-Za-z]+)*)$").unwrap());
static LOOSE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+|\d+").unwrap());
static BUILD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*$").unwrap());

/// Version-level rules of one grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionScheme {
    /// How prerelease identifiers are ordered
    pub order: IdentifierOrder,
    /// Whether a leading `v` is accepted (and retained for rendering)
    pub allow_v_prefix: bool,
    /// Accept Composer-style suffixes (`1.0beta2`, `1.4.0-dev`, `1.0RC1`)
    pub loose_prerelease: bool,
    /// Whether prerelease identifiers are accepted at all
    pub allow_prerelease: bool,
    /// Channel family for toolchain-style versions
    pub channels: Option<ChannelTable>,
}

impl VersionScheme {
    /// Plain semver with optional `v`, used by npm, Go and friends
    pub const fn semver() -> Self {
        Self {
            order: IdentifierOrder::NumericFirst,
            allow_v_prefix: true,
            loose_prerelease: false,
            allow_prerelease: true,
            channels: None,
        }
    }
}

/// A parsed version. Either a numeric version (`segments` non-empty) or a
/// channel version (`channel` set), never both.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    v_prefix: bool,
    segments: Vec<u64>,
    prerelease: Vec<Identifier>,
    prerelease_text: String,
    build: Option<String>,
    channel: Option<Channel>,
    order: IdentifierOrder,
}

impl Version {
    /// Parse a raw version string under the given scheme
    pub fn parse(raw: &str, scheme: &VersionScheme) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Missing);
        }

        if let Some(table) = scheme.channels {
            if let Some(channel) = table.parse(trimmed)? {
                return Ok(Self {
                    raw: trimmed.to_string(),
                    v_prefix: false,
                    segments: Vec::new(),
                    prerelease: Vec::new(),
                    prerelease_text: String::new(),
                    build: None,
                    channel: Some(channel),
                    order: scheme.order,
                });
            }
        }

        let caps = NUMERIC_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::malformed(trimmed))?;
        let v_prefix = caps.get(1).is_some();
        if v_prefix && !scheme.allow_v_prefix {
            return Err(VersionError::malformed(trimmed));
        }

        let segments = caps[2]
            .split('.')
            .map(|s| s.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::malformed(trimmed))?;

        let rest = &caps[3];
        let (pre, build) = match rest.split_once('+') {
            Some((pre, build)) => (pre, Some(build)),
            None => (rest, None),
        };
        if let Some(build) = build {
            if !BUILD_RE.is_match(build) {
                return Err(VersionError::malformed(trimmed));
            }
        }

        let prerelease = if pre.is_empty() {
            Vec::new()
        } else if !scheme.allow_prerelease {
            return Err(VersionError::malformed(trimmed));
        } else if let Some(ids) = pre.strip_prefix('-').filter(|p| STRICT_PRERELEASE_RE.is_match(p)) {
            if scheme.loose_prerelease {
                split_loose(ids)
            } else {
                ids.split('.').map(Identifier::new).collect()
            }
        } else if scheme.loose_prerelease && LOOSE_PRERELEASE_RE.is_match(pre) {
            split_loose(pre)
        } else {
            return Err(VersionError::malformed(trimmed));
        };

        Ok(Self {
            raw: trimmed.to_string(),
            v_prefix,
            segments,
            prerelease,
            prerelease_text: pre.to_string(),
            build: build.map(str::to_string),
            channel: None,
            order: scheme.order,
        })
    }

    /// Build a plain release version from numeric segments
    pub fn from_segments(segments: &[u64], scheme: &VersionScheme) -> Self {
        let segments = if segments.is_empty() {
            vec![0]
        } else {
            segments.to_vec()
        };
        Self {
            raw: join_segments(&segments),
            v_prefix: false,
            segments,
            prerelease: Vec::new(),
            prerelease_text: String::new(),
            build: None,
            channel: None,
            order: scheme.order,
        }
    }

    /// The text the version was parsed from (trimmed)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text without a leading `v`
    pub fn unprefixed(&self) -> &str {
        if self.v_prefix { &self.raw[1..] } else { &self.raw }
    }

    pub fn has_v_prefix(&self) -> bool {
        self.v_prefix
    }

    /// Numeric core components, empty for channel versions
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Component at `index`, zero past the end
    pub fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }

    pub fn prerelease(&self) -> &[Identifier] {
        &self.prerelease
    }

    /// Prerelease text as written, including its leading separator
    pub fn prerelease_text(&self) -> &str {
        &self.prerelease_text
    }

    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn is_channel(&self) -> bool {
        self.channel.is_some()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// The same version without prerelease and build metadata
    pub fn release(&self) -> Self {
        if self.is_channel() {
            return self.clone();
        }
        Self {
            raw: join_segments(&self.segments),
            v_prefix: false,
            segments: self.segments.clone(),
            prerelease: Vec::new(),
            prerelease_text: String::new(),
            build: None,
            channel: None,
            order: self.order,
        }
    }

    /// Total order where defined. `None` when a channel version meets a
    /// numeric one, or two versions of different channel families meet.
    pub fn compare(&self, other: &Version) -> Option<Ordering> {
        match (&self.channel, &other.channel) {
            (None, None) => Some(self.compare_numeric(other)),
            (Some(a), Some(b)) => a.compare(b),
            _ => None,
        }
    }

    /// Like [`Version::compare`] but reports the incomparable case as an error
    pub fn try_compare(&self, other: &Version) -> Result<Ordering, VersionError> {
        self.compare(other)
            .ok_or_else(|| VersionError::incomparable(self.raw(), other.raw()))
    }

    fn compare_numeric(&self, other: &Version) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            match self.segment(i).cmp(&other.segment(i)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.order
            .compare_prerelease(&self.prerelease, &other.prerelease)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Join numeric segments with dots
pub fn join_segments(segments: &[u64]) -> String {
    segments
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a Composer suffix like `beta2` or `RC.1` into identifiers
fn split_loose(pre: &str) -> Vec<Identifier> {
    LOOSE_TOKEN_RE
        .find_iter(pre)
        .map(|m| Identifier::new(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::channel::TOOLCHAIN_CHANNELS;
    use rstest::rstest;

    const SEMVER: VersionScheme = VersionScheme::semver();

    const COMPOSER: VersionScheme = VersionScheme {
        order: IdentifierOrder::Stability,
        allow_v_prefix: true,
        loose_prerelease: true,
        allow_prerelease: true,
        channels: None,
    };

    const TOOLCHAIN: VersionScheme = VersionScheme {
        order: IdentifierOrder::NumericFirst,
        allow_v_prefix: false,
        loose_prerelease: false,
        allow_prerelease: false,
        channels: Some(TOOLCHAIN_CHANNELS),
    };

    fn semver(raw: &str) -> Version {
        Version::parse(raw, &SEMVER).unwrap()
    }

    #[rstest]
    #[case("1.5", "1.5.0", Ordering::Equal)]
    #[case("1.2.3", "1.10.0", Ordering::Less)]
    #[case("v2.0.0", "2.0.0", Ordering::Equal)]
    #[case("1.0.0-alpha", "1.0.0", Ordering::Less)]
    #[case("1.0.0-alpha.1", "1.0.0-alpha.beta", Ordering::Less)]
    #[case("1.0.0+build.1", "1.0.0+build.2", Ordering::Equal)]
    #[case("v2.0.0+incompatible", "v3.0.0+incompatible", Ordering::Less)]
    #[case("v0.0.0-20210101000000-abc123", "v0.0.0-20210201000000-def456", Ordering::Less)]
    #[case("1.0.0.1", "1.0.0", Ordering::Greater)]
    fn semver_compare_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(semver(a).compare(&semver(b)), Some(expected));
    }

    #[rstest]
    #[case("1.0-beta1", "1.0-beta2", Ordering::Less)]
    #[case("0.2.3beta", "0.2.3", Ordering::Less)]
    #[case("1.4.0-dev", "1.4.0-alpha1", Ordering::Less)]
    #[case("1.0.0-RC1", "1.0.0", Ordering::Less)]
    #[case("1.0.0-pl1", "1.0.0", Ordering::Greater)]
    fn composer_compare_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        let a = Version::parse(a, &COMPOSER).unwrap();
        let b = Version::parse(b, &COMPOSER).unwrap();
        assert_eq!(a.compare(&b), Some(expected));
    }

    #[test]
    fn channel_versions_order_by_rank_then_date() {
        let parse = |raw| Version::parse(raw, &TOOLCHAIN).unwrap();
        assert!(parse("stable") > parse("beta"));
        assert!(parse("beta") > parse("nightly"));
        assert!(parse("nightly-2020-12-31") < parse("nightly-2021-01-01"));
        assert!(parse("stable-2020-12-31") > parse("beta-2021-01-01"));
    }

    #[test]
    fn channel_and_numeric_versions_are_incomparable() {
        let stable = Version::parse("stable", &TOOLCHAIN).unwrap();
        let numeric = Version::parse("1.72.0", &TOOLCHAIN).unwrap();
        assert_eq!(stable.compare(&numeric), None);
        assert_ne!(stable, numeric);
        assert_eq!(
            stable.try_compare(&numeric),
            Err(VersionError::incomparable("stable", "1.72.0"))
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn parse_empty_is_missing(#[case] raw: &str) {
        assert_eq!(Version::parse(raw, &SEMVER), Err(VersionError::Missing));
    }

    #[rstest]
    #[case("abc")]
    #[case("1.2.3beta")]
    #[case("1..2")]
    #[case("1.2.3-")]
    #[case("1.2.3+")]
    fn parse_semver_rejects_malformed(#[case] raw: &str) {
        assert_eq!(Version::parse(raw, &SEMVER), Err(VersionError::malformed(raw)));
    }

    #[test]
    fn parse_toolchain_rejects_prerelease_and_prefix() {
        assert!(Version::parse("1.72.0-beta", &TOOLCHAIN).is_err());
        assert!(Version::parse("v1.72.0", &TOOLCHAIN).is_err());
    }

    #[test]
    fn parse_keeps_decoration_for_rendering() {
        let v = semver("v2.0.0+incompatible");
        assert!(v.has_v_prefix());
        assert_eq!(v.build(), Some("incompatible"));
        assert_eq!(v.unprefixed(), "2.0.0+incompatible");
        assert_eq!(v.to_string(), "v2.0.0+incompatible");
        assert_eq!(v.release().to_string(), "2.0.0");
    }

    #[test]
    fn from_segments_builds_release() {
        let v = Version::from_segments(&[1, 5], &SEMVER);
        assert_eq!(v.raw(), "1.5");
        assert_eq!(v, semver("1.5.0"));
        assert_eq!(v.segment(7), 0);
    }
}
