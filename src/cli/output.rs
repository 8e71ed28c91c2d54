//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::TitleError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &TitleError) -> String {
    match e {
        TitleError::DynamicEvaluation { .. } => format!(
            "{}\nThe CLI does not wire a code evaluator; disable dynamic_code for this bundle \
             or set engine.evaluation_failure = \"keep_expanded\".",
            e
        ),
        _ => e.to_string(),
    }
}
