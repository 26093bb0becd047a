//! Per-ecosystem grammar parameters and the registry that maps ids to them

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GrammarsConfig;
use crate::error::{RequirementError, VersionError};
use crate::requirement::grammars;
use crate::requirement::model::{Operator, Requirement};
use crate::requirement::parser;
use crate::version::{Version, VersionScheme};

/// Supported constraint grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarId {
    /// npm / yarn / pnpm (package.json)
    Npm,
    /// Cargo (Cargo.toml)
    Cargo,
    /// Composer (composer.json)
    Composer,
    /// Go modules (go.mod)
    GoModules,
    /// Julia (Project.toml `[compat]`)
    Julia,
    /// rust-toolchain(.toml)
    RustToolchain,
}

impl GrammarId {
    pub const ALL: [GrammarId; 6] = [
        GrammarId::Npm,
        GrammarId::Cargo,
        GrammarId::Composer,
        GrammarId::GoModules,
        GrammarId::Julia,
        GrammarId::RustToolchain,
    ];

    /// Returns the string representation of the grammar id
    pub fn as_str(&self) -> &'static str {
        match self {
            GrammarId::Npm => "npm",
            GrammarId::Cargo => "cargo",
            GrammarId::Composer => "composer",
            GrammarId::GoModules => "go_modules",
            GrammarId::Julia => "julia",
            GrammarId::RustToolchain => "rust_toolchain",
        }
    }
}

impl fmt::Display for GrammarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GrammarId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrammarId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or(())
    }
}

/// How OR-groups are separated
#[derive(Debug, Clone, Copy)]
pub enum OrSplit {
    /// Only one group is allowed
    None,
    /// Groups are separated by matches of the pattern
    Pattern(&'static LazyLock<Regex>),
    /// `,` separates groups, except between two comparison specs where it
    /// joins them into one AND group (Julia)
    CommaUnion,
}

/// How atoms inside one OR-group are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndSplit {
    /// A group is a single atom
    Single,
    Whitespace,
    Comma,
    CommaOrWhitespace,
}

/// Which component `~` increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TildeRule {
    /// The minor component when given, else the major (npm, Cargo)
    Minor,
    /// The second-to-last given component (Composer)
    SecondToLast,
    /// Like `Minor`, but `~0.0.x` increments the patch
    JuliaMinor,
}

/// Where wildcard components may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardPolicy {
    /// No wildcards at all
    Forbidden,
    /// Only a bare `*`
    BareOnly,
    /// Trailing components (`1.2.*`, `1.x.x`, `*`)
    Trailing,
}

/// Non-numeric forms accepted as opaque requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpaquePolicy {
    /// Prefix marking a branch (`dev-`)
    pub branch_prefix: Option<&'static str>,
    /// Accept `real as alias`
    pub aliases: bool,
    /// Accept `@flag` suffixes and bare flags
    pub stability_flags: bool,
    /// Accept bare words such as dist-tags
    pub tags: bool,
}

/// Whether rewriting replaces bounds or appends groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Replace,
    Append,
}

/// Precision of an appended caret group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidenPrecision {
    /// At least the precision of the existing caret atoms
    MatchExisting,
    /// Just enough components to reach the first non-zero one
    Minimal,
}

/// Update parameters of one grammar
#[derive(Debug, Clone, Copy)]
pub struct UpdateRules {
    pub mode: UpdateMode,
    pub widen_precision: WidenPrecision,
    /// Operator used when several bounds collapse into one
    pub collapse_operator: &'static str,
    /// OR separator used when the original has none
    pub default_or_separator: Option<&'static str>,
    /// A bare major-only atom counts as covering its whole major line
    pub major_only_covers: bool,
}

/// Every per-ecosystem parameter of the shared parse/render/update algorithm
#[derive(Debug, Clone)]
pub struct GrammarTable {
    pub id: GrammarId,
    pub scheme: VersionScheme,
    pub or_split: OrSplit,
    pub and_split: AndSplit,
    /// Operator spellings, longest first
    pub operators: &'static [(&'static str, Operator)],
    /// Operator of a bound written without one
    pub bare_operator: Operator,
    /// A partial exact version (`1.72`, `=1.2`) matches every version it prefixes
    pub partial_exact_is_prefix: bool,
    pub hyphen_ranges: bool,
    pub wildcard_chars: &'static [char],
    pub wildcards: WildcardPolicy,
    pub tilde: TildeRule,
    /// `^0.x` ranges stop before the next non-zero component
    pub caret_narrow_pre_1: bool,
    pub opaque: OpaquePolicy,
    pub update: UpdateRules,
}

impl GrammarTable {
    /// Parse a requirement string under this grammar
    pub fn parse_requirement(&self, raw: &str) -> Result<Requirement, RequirementError> {
        parser::parse(raw, self)
    }

    /// Parse a single version under this grammar's scheme
    pub fn parse_version(&self, raw: &str) -> Result<Version, VersionError> {
        Version::parse(raw, &self.scheme)
    }

    /// Whether the grammar can express more than one OR-group
    pub fn supports_or(&self) -> bool {
        !matches!(self.or_split, OrSplit::None)
    }
}

/// Explicit `GrammarId -> GrammarTable` map, built once and handed to callers
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    tables: IndexMap<GrammarId, GrammarTable>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every shipped grammar
    pub fn builtin() -> Self {
        Self::from_config(&GrammarsConfig::default())
    }

    /// Registry with the grammars enabled in the configuration
    pub fn from_config(config: &GrammarsConfig) -> Self {
        let mut registry = Self::new();
        for id in GrammarId::ALL {
            if config.is_enabled(id) {
                registry.register(grammars::table(id));
            } else {
                debug!("Grammar {} disabled by configuration", id);
            }
        }
        registry
    }

    /// Add or replace a grammar table
    pub fn register(&mut self, table: GrammarTable) {
        self.tables.insert(table.id, table);
    }

    pub fn get(&self, id: GrammarId) -> Option<&GrammarTable> {
        self.tables.get(&id)
    }

    pub fn contains(&self, id: GrammarId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = GrammarId> + '_ {
        self.tables.keys().copied()
    }
}
