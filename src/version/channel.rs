//! Ranked release channels (`stable`, `beta`, `nightly-2023-10-01`, ...)

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use crate::error::VersionError;

/// Fixed rank table for one channel family. Higher rank is "more stable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTable {
    ranks: &'static [(&'static str, u8)],
}

/// Rust toolchain channels
pub const TOOLCHAIN_CHANNELS: ChannelTable = ChannelTable {
    ranks: &[("stable", 3), ("beta", 2), ("nightly", 1)],
};

impl ChannelTable {
    pub const fn new(ranks: &'static [(&'static str, u8)]) -> Self {
        Self { ranks }
    }

    /// Rank of a channel name, `None` when the name is not in the table
    pub fn rank(&self, name: &str) -> Option<u8> {
        self.ranks
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, rank)| *rank)
    }

    /// Parse `name` or `name-YYYY-MM-DD`.
    ///
    /// Returns `Ok(None)` when the text does not name a channel of this
    /// table and an error when it does but the date part is not a date.
    pub fn parse(&self, raw: &str) -> Result<Option<Channel>, VersionError> {
        let (name, date) = match raw.split_once('-') {
            Some((name, date)) => (name, Some(date)),
            None => (raw, None),
        };
        let Some(rank) = self.rank(name) else {
            return Ok(None);
        };
        let date = date
            .map(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| VersionError::malformed(raw))?;
        Ok(Some(Channel {
            name: name.to_string(),
            rank,
            date,
        }))
    }
}

/// A channel version, optionally pinned to a date
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    name: String,
    rank: u8,
    date: Option<NaiveDate>,
}

impl Channel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_dated(&self) -> bool {
        self.date.is_some()
    }

    /// Channel rank dominates the date. Within one channel two dated
    /// versions compare by date; a dated and an undated version of the
    /// same channel are incomparable.
    pub fn compare(&self, other: &Channel) -> Option<Ordering> {
        match self.rank.cmp(&other.rank) {
            Ordering::Equal => match (self.date, other.date) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                (None, None) => Some(Ordering::Equal),
                _ => None,
            },
            other => Some(other),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}-{}", self.name, date.format("%Y-%m-%d")),
            None => write!(f, "{}", self.name),
        }
    }
}
