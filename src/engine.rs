//! Library contract: one update request in, one outcome out
//!
//! The engine owns a [`GrammarRegistry`] and does no I/O. Locating the
//! requirement inside a manifest and writing it back is the caller's job.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::requirement::{GrammarId, GrammarRegistry, satisfies};
use crate::update::{UpdateResult, UpdateStrategy, update};

/// Input record for one update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    /// Requirement text as found in the manifest; `None` is unconstrained
    #[serde(default)]
    pub raw_requirement: Option<String>,
    pub target_version: String,
    pub strategy: UpdateStrategy,
    pub grammar: GrammarId,
}

impl UpdateRequest {
    pub fn new(
        grammar: GrammarId,
        raw_requirement: Option<&str>,
        target_version: &str,
        strategy: UpdateStrategy,
    ) -> Self {
        Self {
            raw_requirement: raw_requirement.map(str::to_string),
            target_version: target_version.to_string(),
            strategy,
            grammar,
        }
    }
}

/// Output record for one update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub result: UpdateResult,
    /// Whether the original requirement already admitted the target
    pub satisfied_before: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: GrammarRegistry,
}

impl Engine {
    pub fn new(registry: GrammarRegistry) -> Self {
        Self { registry }
    }

    /// Engine with the grammars enabled in `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(GrammarRegistry::from_config(&config.grammars))
    }

    pub fn registry(&self) -> &GrammarRegistry {
        &self.registry
    }

    /// Parse the request under its grammar and compute the update.
    ///
    /// Parse failures of either the requirement or the target are returned
    /// as errors. `Unfixable` is an ordinary outcome.
    pub fn process(&self, request: &UpdateRequest) -> Result<UpdateOutcome, EngineError> {
        let table = self
            .registry
            .get(request.grammar)
            .ok_or(EngineError::GrammarDisabled(request.grammar))?;

        let raw = request.raw_requirement.as_deref().unwrap_or("");
        let requirement = table.parse_requirement(raw)?;
        let target = table.parse_version(&request.target_version)?;

        let satisfied_before = satisfies(&requirement, &target);
        let result = update(&requirement, &target, request.strategy, table);
        debug!(
            "{} '{}' -> {:?} for {} ({:?})",
            request.grammar, raw, result, target, request.strategy
        );
        Ok(UpdateOutcome {
            result,
            satisfied_before,
        })
    }
}
