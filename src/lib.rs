//! Autotitle: Automatic Record Titles
//!
//! Generates titles for content records from per-bundle token patterns. Each
//! bundle (a subtype of an entity type) carries a [`TitleStatus`]; enabled
//! bundles always get a generated title, optional ones only when the title was
//! left empty. Patterns are expanded through a [`TokenResolver`], optionally
//! post-processed by an [`Evaluator`], sanitized and truncated to
//! [`MAX_TITLE_LENGTH`] characters.

pub mod bulk;
pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod label;
pub mod logging;
pub mod record;
pub mod sanitize;
pub mod status;
pub mod token;

pub use bulk::{BulkReport, FailurePolicy, RecordOutcome, RegenerateTitles, UpdateAccess};
pub use config::{AutoTitleConfig, BundleConfig, ConfigLoader, ConfigProvider, ConfiguredBundles};
pub use engine::{GeneratedTitle, TitleGenerator, TitleSource};
pub use error::{EvaluationError, TitleError};
pub use evaluator::{DisabledEvaluator, EvaluationFailurePolicy, Evaluator, FnEvaluator};
pub use guard::ProcessingContext;
pub use record::{EntityRecord, RecordId, RecordKey, TitleRecord};
pub use sanitize::MAX_TITLE_LENGTH;
pub use status::TitleStatus;
pub use token::{FieldTokenResolver, ReplaceOptions, TokenContext, TokenResolver};
