//! Version requirement parsing, satisfaction and rewriting for npm, Cargo,
//! Composer, Go modules, Julia and Rust toolchain files.
//!
//! ```text
//!  UpdateRequest ──▶ Engine ──▶ GrammarTable ──▶ Requirement + Version
//!                                                    │
//!                            satisfies ◀─────────────┤
//!                                                    ▼
//!  UpdateOutcome ◀─────────────────────────── update::update
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod requirement;
pub mod update;
pub mod version;

pub use config::EngineConfig;
pub use engine::{Engine, UpdateOutcome, UpdateRequest};
pub use error::{EngineError, LoggingError, RequirementError, VersionError};
pub use requirement::{GrammarId, GrammarRegistry, GrammarTable, Requirement, satisfies};
pub use update::{UpdateResult, UpdateStrategy, update};
pub use version::{Version, VersionScheme};
