//! Version layer: parsing and ordering of single version values
//!
//! A [`Version`] is either a numeric version (`1.2.3`, `v2.0.0+incompatible`,
//! `1.0-beta2`) or a channel version (`stable`, `nightly-2023-10-01`). How a
//! string is read is decided by the [`VersionScheme`] of the grammar in use.
//!
//! # Ordering
//!
//! ```text
//!  numeric ──▶ segments (zero padded) ──▶ prerelease (IdentifierOrder)
//!  channel ──▶ channel rank ──▶ date
//!  numeric vs channel ──▶ incomparable (None)
//! ```
//!
//! # Modules
//!
//! - [`model`]: The `Version` type and its scheme
//! - [`identifier`]: Prerelease identifiers and ordering policies
//! - [`channel`]: Ranked channel tables

pub mod channel;
pub mod identifier;
pub mod model;

pub use channel::{Channel, ChannelTable, TOOLCHAIN_CHANNELS};
pub use identifier::{Identifier, IdentifierOrder};
pub use model::{Version, VersionScheme, join_segments};
