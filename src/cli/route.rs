//! CLI route: single route table and run context.

use crate::bulk::{FailurePolicy, RegenerateTitles};
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_bulk_report_text, format_preview_text, format_status_text, PreviewRow, StatusRow,
};
use crate::config::{AutoTitleConfig, ConfigLoader};
use crate::engine::TitleGenerator;
use crate::error::TitleError;
use crate::guard::ProcessingContext;
use crate::record::{EntityRecord, TitleRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: loaded configuration and the engine built from it.
pub struct RunContext {
    config: AutoTitleConfig,
    engine: TitleGenerator,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    /// The loaded configuration must pass validation.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, TitleError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::from_config(config.validated()?))
    }

    pub fn from_config(config: AutoTitleConfig) -> Self {
        let engine = TitleGenerator::from_config(&config);
        Self { config, engine }
    }

    pub fn config(&self) -> &AutoTitleConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, TitleError> {
        match command {
            Commands::Status {
                entity_type,
                bundle,
                format,
            } => self.handle_status(entity_type.as_deref(), bundle.as_deref(), format),
            Commands::Preview { records, format } => self.handle_preview(records, format),
            Commands::Regenerate {
                records,
                write,
                fail_fast,
                format,
            } => self.handle_regenerate(records, *write, *fail_fast, format),
            Commands::Config { command } => self.handle_config(command),
        }
    }

    fn handle_status(
        &self,
        entity_type: Option<&str>,
        bundle: Option<&str>,
        format: &str,
    ) -> Result<String, TitleError> {
        let rows: Vec<StatusRow> = match (entity_type, bundle) {
            (Some(entity_type), Some(bundle)) => {
                let config = self.engine.bundle_config(entity_type, bundle)?;
                vec![StatusRow {
                    entity_type: entity_type.to_string(),
                    bundle: bundle.to_string(),
                    status: config.status,
                    pattern: config.pattern.clone(),
                    dynamic_code: config.dynamic_code,
                }]
            }
            _ => self
                .config
                .bundles
                .entries()
                .into_iter()
                .filter(|(et, _, _)| entity_type.map_or(true, |wanted| wanted == *et))
                .map(|(et, b, config)| StatusRow {
                    entity_type: et.to_string(),
                    bundle: b.to_string(),
                    status: config.status,
                    pattern: config.pattern.clone(),
                    dynamic_code: config.dynamic_code,
                })
                .collect(),
        };

        match format {
            "json" => Ok(serde_json::to_string_pretty(&rows)?),
            _ => Ok(format_status_text(&rows)),
        }
    }

    fn handle_preview(&self, path: &Path, format: &str) -> Result<String, TitleError> {
        let records = load_records(path)?;
        let ctx = ProcessingContext::new();

        let mut rows = Vec::with_capacity(records.len());
        for record in &records {
            let needed = self.engine.needs_generation(&ctx, record)?;
            let (generated, error) = match self.engine.preview(record) {
                Ok(generated) => (Some(generated.title), None),
                Err(err) => (None, Some(err.to_string())),
            };
            rows.push(PreviewRow {
                key: record.record_key().to_string(),
                current: record.title().to_string(),
                needed,
                generated,
                error,
            });
        }

        match format {
            "json" => Ok(serde_json::to_string_pretty(&rows)?),
            _ => Ok(format_preview_text(&rows)),
        }
    }

    fn handle_regenerate(
        &self,
        path: &Path,
        write: bool,
        fail_fast: bool,
        format: &str,
    ) -> Result<String, TitleError> {
        let mut records = load_records(path)?;
        let policy = if fail_fast {
            FailurePolicy::FailImmediately
        } else {
            FailurePolicy::Continue
        };

        let mut changed = 0usize;
        let mut saver = |record: &EntityRecord| -> Result<(), TitleError> {
            debug!(key = %record.record_key(), title = record.title(), "Record marked for save");
            changed += 1;
            Ok(())
        };

        let mut ctx = ProcessingContext::new();
        let report = RegenerateTitles::new(&self.engine)
            .with_failure_policy(policy)
            .execute(&mut ctx, records.iter_mut(), &mut saver)?;

        let written = write && changed > 0;
        if written {
            save_records(path, &records)?;
            info!(path = %path.display(), changed, "Wrote regenerated titles");
        }

        match format {
            "json" => Ok(serde_json::to_string_pretty(&report)?),
            _ => Ok(format_bulk_report_text(&report, written)),
        }
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String, TitleError> {
        match command {
            ConfigCommands::Validate => {
                self.config.clone().validated()?;
                Ok(format!(
                    "Configuration is valid ({} bundle(s) configured)",
                    self.config.bundles.entries().len()
                ))
            }
            ConfigCommands::Show => toml::to_string_pretty(&self.config)
                .map_err(|e| TitleError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }
}

fn load_records(path: &Path) -> Result<Vec<EntityRecord>, TitleError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write records atomically: temp file then rename.
fn save_records(path: &Path, records: &[EntityRecord]) -> Result<(), TitleError> {
    let serialized = serde_json::to_string_pretty(records)?;
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, serialized)?;
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        TitleError::IoError(e)
    })
}
