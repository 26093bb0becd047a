//! Error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: a single version string could not be used
//! - RequirementError: a requirement string could not be parsed
//! - EngineError: errors surfaced by [`crate::engine::Engine`]
//! - LoggingError: the tracing subscriber could not be installed

use thiserror::Error;

use crate::requirement::GrammarId;

/// Errors raised while parsing or comparing a single version
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Nil or empty input where a concrete version was required
    #[error("missing version")]
    Missing,

    /// The string is not a version in the selected grammar
    #[error("malformed version '{raw}'")]
    Malformed { raw: String },

    /// Comparison attempted across unrelated version families
    #[error("cannot compare '{left}' with '{right}'")]
    IncomparableChannels { left: String, right: String },
}

/// Errors raised while parsing a requirement string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    /// An atom (or the separators between atoms) could not be parsed
    #[error("bad requirement '{raw}': {reason}")]
    Bad { raw: String, reason: String },
}

/// Errors surfaced by the engine to its immediate caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The grammar was disabled in the configuration
    #[error("grammar '{0}' is not enabled")]
    GrammarDisabled(GrammarId),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Requirement(#[from] RequirementError),
}

/// Errors related to logging setup
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The configured filter directive is invalid
    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    /// A global subscriber was already installed
    #[error("failed to install tracing subscriber: {message}")]
    Install { message: String },
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(raw: impl Into<String>) -> Self {
        VersionError::Malformed { raw: raw.into() }
    }

    /// Creates a new IncomparableChannels error
    pub fn incomparable(left: impl Into<String>, right: impl Into<String>) -> Self {
        VersionError::IncomparableChannels {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl RequirementError {
    /// Creates a new Bad error
    pub fn bad(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        RequirementError::Bad {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
