//! Title Generation Engine
//!
//! Orchestrates a single title: status check, pattern expansion or fallback,
//! optional dynamic evaluation, sanitization, truncation, and application to
//! the record.

use crate::cache::BundleConfigCache;
use crate::config::{AutoTitleConfig, BundleConfig, ConfigProvider};
use crate::error::TitleError;
use crate::evaluator::{DisabledEvaluator, EvaluationFailurePolicy, Evaluator};
use crate::guard::ProcessingContext;
use crate::label::{BundleLabelResolver, ConfiguredLabels};
use crate::record::TitleRecord;
use crate::sanitize::sanitize_title;
use crate::status::TitleStatus;
use crate::token::{FieldTokenResolver, ReplaceOptions, TokenContext, TokenResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Token options used for title patterns: raw values, unresolved tokens removed.
const PATTERN_OPTIONS: ReplaceOptions = ReplaceOptions {
    sanitize: false,
    clear_unresolved: true,
};

/// Where a generated title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleSource {
    /// Token-expanded pattern
    Pattern,
    /// Output of the dynamic evaluator
    Evaluated,
    /// Bundle label, with the id when the record has one
    Fallback,
}

/// A title produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTitle {
    pub title: String,
    pub source: TitleSource,
    /// The sanitized text exceeded the maximum length and was cut.
    pub truncated: bool,
}

/// The title generation engine.
///
/// Shareable across threads; per-pass state lives in [`ProcessingContext`].
pub struct TitleGenerator {
    configs: BundleConfigCache,
    tokens: Arc<dyn TokenResolver>,
    labels: Arc<dyn BundleLabelResolver>,
    evaluator: Arc<dyn Evaluator>,
    evaluation_failure: EvaluationFailurePolicy,
}

impl TitleGenerator {
    pub fn builder(config: Arc<dyn ConfigProvider>) -> TitleGeneratorBuilder {
        TitleGeneratorBuilder::new(config)
    }

    /// Engine over a loaded configuration with the built-in token resolver and
    /// no evaluator. Does not validate; pass a config from
    /// [`AutoTitleConfig::validated`].
    pub fn from_config(config: &AutoTitleConfig) -> Self {
        Self::builder(Arc::new(config.bundles.clone()))
            .labels(Arc::new(config.labels.clone()))
            .evaluation_failure(config.engine.evaluation_failure)
            .build()
    }

    /// Current status of a bundle. Unconfigured bundles are disabled.
    pub fn status(&self, entity_type: &str, bundle: &str) -> Result<TitleStatus, TitleError> {
        Ok(self.configs.get(entity_type, bundle)?.status)
    }

    /// Settings the engine uses for a bundle.
    pub fn bundle_config(
        &self,
        entity_type: &str,
        bundle: &str,
    ) -> Result<Arc<BundleConfig>, TitleError> {
        self.configs.get(entity_type, bundle)
    }

    /// The record's bundle always receives a generated title.
    pub fn has_auto_title<R: TitleRecord>(&self, record: &R) -> Result<bool, TitleError> {
        Ok(self.status(record.entity_type(), record.bundle())? == TitleStatus::Enabled)
    }

    /// The record's bundle generates a title only when none is given.
    pub fn has_optional_auto_title<R: TitleRecord>(&self, record: &R) -> Result<bool, TitleError> {
        Ok(self.status(record.entity_type(), record.bundle())? == TitleStatus::Optional)
    }

    /// Whether `generate` should run for this record in this pass.
    pub fn needs_generation<R: TitleRecord>(
        &self,
        ctx: &ProcessingContext,
        record: &R,
    ) -> Result<bool, TitleError> {
        if ctx.is_record_applied(record) {
            return Ok(false);
        }
        let status = self.status(record.entity_type(), record.bundle())?;
        let needed = status.requires_title(record.title());
        debug!(
            entity_type = record.entity_type(),
            bundle = record.bundle(),
            status = %status,
            needed,
            "Checked title generation"
        );
        Ok(needed)
    }

    /// Generate the title, assign it to the record and mark the record applied.
    ///
    /// Does not consult the status; callers ask [`needs_generation`](Self::needs_generation)
    /// first. On error the record and the context are left unchanged.
    pub fn generate<R: TitleRecord>(
        &self,
        ctx: &mut ProcessingContext,
        record: &mut R,
    ) -> Result<GeneratedTitle, TitleError> {
        let generated = self.preview(record)?;
        self.apply(ctx, record, &generated);
        Ok(generated)
    }

    /// Assign an already computed title and mark the record applied.
    pub fn apply<R: TitleRecord>(
        &self,
        ctx: &mut ProcessingContext,
        record: &mut R,
        generated: &GeneratedTitle,
    ) {
        record.set_title(&generated.title);
        ctx.mark_record_applied(&*record);
        info!(
            entity_type = record.entity_type(),
            bundle = record.bundle(),
            key = %record.record_key(),
            source = ?generated.source,
            truncated = generated.truncated,
            "Applied automatic title"
        );
    }

    /// Pre-save hook: generate when needed, otherwise leave the record alone.
    pub fn process<R: TitleRecord>(
        &self,
        ctx: &mut ProcessingContext,
        record: &mut R,
    ) -> Result<Option<GeneratedTitle>, TitleError> {
        if !self.needs_generation(ctx, record)? {
            return Ok(None);
        }
        self.generate(ctx, record).map(Some)
    }

    /// Compute the title the record would receive, without side effects.
    pub fn preview<R: TitleRecord>(&self, record: &R) -> Result<GeneratedTitle, TitleError> {
        if !record.has_title_attribute() {
            return Err(TitleError::UnsupportedEntity {
                entity_type: record.entity_type().to_string(),
            });
        }

        let config = self.configs.get(record.entity_type(), record.bundle())?;
        let (raw, source) = match config.effective_pattern() {
            Some(pattern) => self.expand_pattern(pattern, config.dynamic_code, record)?,
            None => (self.fallback_title(record), TitleSource::Fallback),
        };

        let (title, truncated) = sanitize_title(&raw);
        Ok(GeneratedTitle {
            title,
            source,
            truncated,
        })
    }

    /// Drop cached settings of one bundle.
    pub fn invalidate_config(&self, entity_type: &str, bundle: &str) {
        self.configs.invalidate(entity_type, bundle);
    }

    pub fn invalidate_all_config(&self) {
        self.configs.invalidate_all();
    }

    fn expand_pattern<R: TitleRecord>(
        &self,
        pattern: &str,
        dynamic_code: bool,
        record: &R,
    ) -> Result<(String, TitleSource), TitleError> {
        let context = TokenContext::new().with(record.entity_type(), record as &dyn TitleRecord);
        let expanded = self.tokens.replace(pattern, &context, PATTERN_OPTIONS)?;
        if !dynamic_code {
            return Ok((expanded, TitleSource::Pattern));
        }

        match self.evaluator.run(&expanded, record) {
            Ok(output) => Ok((output, TitleSource::Evaluated)),
            Err(source) => match self.evaluation_failure {
                EvaluationFailurePolicy::Propagate => Err(TitleError::DynamicEvaluation {
                    entity_type: record.entity_type().to_string(),
                    bundle: record.bundle().to_string(),
                    source,
                }),
                EvaluationFailurePolicy::KeepExpanded => {
                    warn!(
                        entity_type = record.entity_type(),
                        bundle = record.bundle(),
                        error = %source,
                        "Dynamic evaluation failed, using expanded pattern"
                    );
                    Ok((expanded, TitleSource::Pattern))
                }
            },
        }
    }

    /// Bundle label, followed by the id when the record has a non-empty,
    /// non-zero one.
    fn fallback_title<R: TitleRecord>(&self, record: &R) -> String {
        let label = self.labels.label(record.entity_type(), record.bundle());
        match record.id() {
            Some(id) if !id.as_str().is_empty() && id.as_str() != "0" => {
                format!("{} {}", label, id)
            }
            _ => label,
        }
    }
}

impl std::fmt::Debug for TitleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleGenerator")
            .field("configs", &self.configs)
            .field("evaluation_failure", &self.evaluation_failure)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TitleGenerator`].
pub struct TitleGeneratorBuilder {
    config: Arc<dyn ConfigProvider>,
    tokens: Arc<dyn TokenResolver>,
    labels: Arc<dyn BundleLabelResolver>,
    evaluator: Arc<dyn Evaluator>,
    evaluation_failure: EvaluationFailurePolicy,
}

impl TitleGeneratorBuilder {
    fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            config,
            tokens: Arc::new(FieldTokenResolver::new()),
            labels: Arc::new(ConfiguredLabels::default()),
            evaluator: Arc::new(DisabledEvaluator),
            evaluation_failure: EvaluationFailurePolicy::default(),
        }
    }

    pub fn tokens(mut self, tokens: Arc<dyn TokenResolver>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn labels(mut self, labels: Arc<dyn BundleLabelResolver>) -> Self {
        self.labels = labels;
        self
    }

    /// Wire in code evaluation. See the trust boundary notes in [`crate::evaluator`].
    pub fn evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn evaluation_failure(mut self, policy: EvaluationFailurePolicy) -> Self {
        self.evaluation_failure = policy;
        self
    }

    pub fn build(self) -> TitleGenerator {
        TitleGenerator {
            configs: BundleConfigCache::new(self.config),
            tokens: self.tokens,
            labels: self.labels,
            evaluator: self.evaluator,
            evaluation_failure: self.evaluation_failure,
        }
    }
}
