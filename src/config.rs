//! Configuration System
//!
//! Per-bundle title settings plus engine, label and logging sections. Files are
//! layered with the `config` crate: merge-policy defaults, then the global file,
//! then workspace files, then `AUTOTITLE_*` environment variables.
//!
//! ```toml
//! [bundles.node.article]
//! status = 1
//! pattern = "[node:author] on [node:created]"
//!
//! [labels.bundles.node]
//! article = "Article"
//! ```

use crate::error::TitleError;
use crate::evaluator::EvaluationFailurePolicy;
use crate::label::ConfiguredLabels;
use crate::logging::LoggingConfig;
use crate::status::TitleStatus;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Title settings of one (entity type, bundle) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleConfig {
    /// Activation policy (0 disabled, 1 enabled, 2 optional)
    #[serde(default)]
    pub status: TitleStatus,

    /// Literal text mixed with tokens
    #[serde(default)]
    pub pattern: String,

    /// Treat the expanded pattern as code. See [`crate::evaluator`].
    #[serde(default, alias = "php")]
    pub dynamic_code: bool,
}

impl BundleConfig {
    pub fn new(status: TitleStatus, pattern: impl Into<String>) -> Self {
        Self {
            status,
            pattern: pattern.into(),
            dynamic_code: false,
        }
    }

    pub fn with_dynamic_code(mut self, enabled: bool) -> Self {
        self.dynamic_code = enabled;
        self
    }

    /// Pattern with surrounding whitespace removed; `None` when blank.
    pub fn effective_pattern(&self) -> Option<&str> {
        let trimmed = self.pattern.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Source of bundle settings. `Ok(None)` means "not configured" and is treated
/// as [`TitleStatus::Disabled`].
pub trait ConfigProvider: Send + Sync {
    fn get(&self, entity_type: &str, bundle: &str) -> Result<Option<BundleConfig>, TitleError>;
}

/// Bundle settings from the configuration file: entity type → bundle → settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ConfiguredBundles(pub HashMap<String, HashMap<String, BundleConfig>>);

impl ConfiguredBundles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_type: &str, bundle: &str, config: BundleConfig) {
        self.0
            .entry(entity_type.to_string())
            .or_default()
            .insert(bundle.to_string(), config);
    }

    pub fn with(mut self, entity_type: &str, bundle: &str, config: BundleConfig) -> Self {
        self.insert(entity_type, bundle, config);
        self
    }

    /// All configured pairs, sorted by entity type then bundle.
    pub fn entries(&self) -> Vec<(&str, &str, &BundleConfig)> {
        let mut entries: Vec<_> = self
            .0
            .iter()
            .flat_map(|(entity_type, bundles)| {
                bundles
                    .iter()
                    .map(move |(bundle, config)| (entity_type.as_str(), bundle.as_str(), config))
            })
            .collect();
        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        entries
    }
}

impl ConfigProvider for ConfiguredBundles {
    fn get(&self, entity_type: &str, bundle: &str) -> Result<Option<BundleConfig>, TitleError> {
        Ok(self
            .0
            .get(entity_type)
            .and_then(|bundles| bundles.get(bundle))
            .cloned())
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineSettings {
    /// Permit bundles to enable dynamic code. Off unless the host grants it.
    /// Checked by [`AutoTitleConfig::validate`], which the CLI runs on load.
    #[serde(default)]
    pub allow_dynamic_code: bool,

    /// Handling of evaluator failures
    #[serde(default)]
    pub evaluation_failure: EvaluationFailurePolicy,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoTitleConfig {
    #[serde(default)]
    pub bundles: ConfiguredBundles,

    #[serde(default)]
    pub labels: ConfiguredLabels,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Bundle(String, String),
    Engine(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Bundle(key, msg) => write!(f, "Bundle '{}': {}", key, msg),
            ValidationError::Engine(msg) => write!(f, "Engine: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AutoTitleConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (entity_type, bundle, config) in self.bundles.entries() {
            let key = format!("{}.{}", entity_type, bundle);
            if entity_type.trim().is_empty() || bundle.trim().is_empty() {
                errors.push(ValidationError::Bundle(
                    key.clone(),
                    "entity type and bundle must not be empty".to_string(),
                ));
            }
            if config.dynamic_code && !self.engine.allow_dynamic_code {
                errors.push(ValidationError::Bundle(
                    key.clone(),
                    "dynamic_code is set but engine.allow_dynamic_code is false".to_string(),
                ));
            }
            if config.dynamic_code && config.effective_pattern().is_none() {
                errors.push(ValidationError::Bundle(
                    key,
                    "dynamic_code has no effect without a pattern".to_string(),
                ));
            }
        }

        if let Err(e) = crate::logging::validate_logging_config(&self.logging) {
            errors.push(ValidationError::Engine(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and return the configuration, folding all validation errors
    /// into one [`TitleError::ConfigError`].
    pub fn validated(self) -> Result<Self, TitleError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
            TitleError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Loads [`AutoTitleConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace
    /// files, environment.
    pub fn load(workspace_root: &Path) -> Result<AutoTitleConfig, TitleError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        let config = builder.add_source(env_source()).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a single file, still honoring environment overrides.
    pub fn load_from_file(path: &Path) -> Result<AutoTitleConfig, TitleError> {
        if !path.exists() {
            return Err(TitleError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let config = merge::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .add_source(env_source())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Path of the global configuration file, when a home directory is known.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_config_path()
    }

    /// Parse configuration from a TOML string without other sources.
    pub fn from_toml_str(contents: &str) -> Result<AutoTitleConfig, TitleError> {
        let config = Config::builder()
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("AUTOTITLE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
