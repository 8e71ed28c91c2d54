//! Bulk Title Regeneration
//!
//! The "regenerate titles" action: for each selected record, check access, ask
//! the engine whether a title is needed, generate it, and persist the record
//! only when its title actually changed. A record is marked applied only after
//! a successful save; when the save fails its previous title is restored.

use crate::engine::TitleGenerator;
use crate::error::TitleError;
use crate::guard::ProcessingContext;
use crate::record::TitleRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Per-record update permission, checked before anything else.
pub trait UpdateAccess {
    fn can_update(&self, record: &dyn TitleRecord) -> bool;
}

/// Grants update access to every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl UpdateAccess for AllowAll {
    fn can_update(&self, _record: &dyn TitleRecord) -> bool {
        true
    }
}

/// Persists a record whose title changed.
pub trait RecordSaver<R> {
    fn save(&mut self, record: &R) -> Result<(), TitleError>;
}

impl<R, F> RecordSaver<R> for F
where
    F: FnMut(&R) -> Result<(), TitleError>,
{
    fn save(&mut self, record: &R) -> Result<(), TitleError> {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and move on to the next record.
    #[default]
    Continue,
    /// Stop at the first failure and return its error.
    FailImmediately,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Title changed and the record was saved.
    Updated { previous: String, title: String },
    /// A title was generated but equals the previous one; nothing saved.
    Unchanged { title: String },
    /// The bundle's status does not call for a title, or it was already applied.
    Skipped,
    /// The caller may not update this record.
    Denied,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    pub key: String,
    pub entity_type: String,
    pub bundle: String,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub denied: usize,
    pub failed: usize,
    pub results: Vec<RecordResult>,
}

impl BulkReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            total: 0,
            updated: 0,
            unchanged: 0,
            skipped: 0,
            denied: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    fn push<R: TitleRecord>(&mut self, record: &R, outcome: RecordOutcome) {
        self.total += 1;
        match &outcome {
            RecordOutcome::Updated { .. } => self.updated += 1,
            RecordOutcome::Unchanged { .. } => self.unchanged += 1,
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::Denied => self.denied += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
        self.results.push(RecordResult {
            key: record.record_key().to_string(),
            entity_type: record.entity_type().to_string(),
            bundle: record.bundle().to_string(),
            outcome,
        });
    }
}

/// Bulk "regenerate titles" action.
pub struct RegenerateTitles<'e> {
    engine: &'e TitleGenerator,
    access: &'e dyn UpdateAccess,
    failure_policy: FailurePolicy,
}

impl<'e> RegenerateTitles<'e> {
    pub fn new(engine: &'e TitleGenerator) -> Self {
        Self {
            engine,
            access: &AllowAll,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_access(mut self, access: &'e dyn UpdateAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Run the action over `records` within one processing pass.
    pub fn execute<'r, R, I, S>(
        &self,
        ctx: &mut ProcessingContext,
        records: I,
        saver: &mut S,
    ) -> Result<BulkReport, TitleError>
    where
        R: TitleRecord + 'r,
        I: IntoIterator<Item = &'r mut R>,
        S: RecordSaver<R>,
    {
        let mut report = BulkReport::new();

        for record in records {
            if !self.access.can_update(&*record) {
                debug!(key = %record.record_key(), "Update access denied");
                report.push(&*record, RecordOutcome::Denied);
                continue;
            }

            match self.regenerate_one(ctx, record, saver) {
                Ok(outcome) => report.push(&*record, outcome),
                Err(err) => {
                    warn!(key = %record.record_key(), error = %err, "Title regeneration failed");
                    if self.failure_policy == FailurePolicy::FailImmediately {
                        return Err(err);
                    }
                    report.push(
                        &*record,
                        RecordOutcome::Failed {
                            message: err.to_string(),
                        },
                    );
                }
            }
        }

        report.finished_at = Utc::now();
        info!(
            total = report.total,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            denied = report.denied,
            failed = report.failed,
            "Bulk title regeneration completed"
        );
        Ok(report)
    }

    fn regenerate_one<R, S>(
        &self,
        ctx: &mut ProcessingContext,
        record: &mut R,
        saver: &mut S,
    ) -> Result<RecordOutcome, TitleError>
    where
        R: TitleRecord,
        S: RecordSaver<R>,
    {
        if !self.engine.needs_generation(ctx, record)? {
            return Ok(RecordOutcome::Skipped);
        }

        let previous = record.title().to_string();
        let generated = self.engine.preview(record)?;
        if generated.title == previous {
            self.engine.apply(ctx, record, &generated);
            return Ok(RecordOutcome::Unchanged {
                title: generated.title,
            });
        }

        record.set_title(&generated.title);
        if let Err(err) = saver.save(record) {
            record.set_title(&previous);
            return Err(err);
        }
        self.engine.apply(ctx, record, &generated);
        Ok(RecordOutcome::Updated {
            previous,
            title: generated.title,
        })
    }
}
