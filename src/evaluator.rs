//! Dynamic Code Evaluation
//!
//! Bundles may opt in to treating their token-expanded pattern as code. The
//! engine hands that text to an injected [`Evaluator`] together with the record
//! and uses the captured output as the candidate title.
//!
//! # Trust boundary
//!
//! Anyone able to edit a bundle pattern and switch `dynamic_code` on can run
//! arbitrary code inside the host process. Hosts must gate that setting behind
//! their most privileged configuration permission. The engine never assumes a
//! concrete execution primitive; the default is [`DisabledEvaluator`].

use crate::error::EvaluationError;
use crate::record::TitleRecord;
use std::fmt;

/// Runs code with a record in scope and returns its captured output.
pub trait Evaluator: Send + Sync {
    fn run(&self, code: &str, record: &dyn TitleRecord) -> Result<String, EvaluationError>;
}

/// Refuses every evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEvaluator;

impl Evaluator for DisabledEvaluator {
    fn run(&self, _code: &str, _record: &dyn TitleRecord) -> Result<String, EvaluationError> {
        Err(EvaluationError::Disabled)
    }
}

/// Evaluator backed by a closure, for hosts that embed their own interpreter.
pub struct FnEvaluator<F>
where
    F: Fn(&str, &dyn TitleRecord) -> Result<String, EvaluationError> + Send + Sync,
{
    func: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&str, &dyn TitleRecord) -> Result<String, EvaluationError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&str, &dyn TitleRecord) -> Result<String, EvaluationError> + Send + Sync,
{
    fn run(&self, code: &str, record: &dyn TitleRecord) -> Result<String, EvaluationError> {
        (self.func)(code, record)
    }
}

impl<F> fmt::Debug for FnEvaluator<F>
where
    F: Fn(&str, &dyn TitleRecord) -> Result<String, EvaluationError> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEvaluator").finish_non_exhaustive()
    }
}

/// What the engine does when evaluation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationFailurePolicy {
    /// Return the error from `generate`; the record is left untouched.
    #[default]
    Propagate,
    /// Log a warning and continue with the token-expanded text.
    KeepExpanded,
}
