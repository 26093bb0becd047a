use serde::Deserialize;

use crate::requirement::GrammarId;

/// Default log level when neither the configuration nor the environment sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "REQ_BUMP_LOG";

/// Engine configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub grammars: GrammarsConfig,
    pub logging: LoggingConfig,
}

/// Grammar-specific configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GrammarsConfig {
    pub npm: GrammarConfig,
    pub cargo: GrammarConfig,
    pub composer: GrammarConfig,
    #[serde(rename = "goModules")]
    pub go_modules: GrammarConfig,
    pub julia: GrammarConfig,
    #[serde(rename = "rustToolchain")]
    pub rust_toolchain: GrammarConfig,
}

impl GrammarsConfig {
    pub fn get(&self, id: GrammarId) -> &GrammarConfig {
        match id {
            GrammarId::Npm => &self.npm,
            GrammarId::Cargo => &self.cargo,
            GrammarId::Composer => &self.composer,
            GrammarId::GoModules => &self.go_modules,
            GrammarId::Julia => &self.julia,
            GrammarId::RustToolchain => &self.rust_toolchain,
        }
    }

    pub fn is_enabled(&self, id: GrammarId) -> bool {
        self.get(id).enabled
    }
}

/// Individual grammar configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrammarConfig {
    pub enabled: bool,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `req_bump::update=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
        }
    }
}
