//! Presentation: text and JSON formatters for CLI results.

use crate::bulk::{BulkReport, RecordOutcome};
use crate::status::TitleStatus;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::{Deserialize, Serialize};

/// One row of `autotitle status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRow {
    pub entity_type: String,
    pub bundle: String,
    pub status: TitleStatus,
    pub pattern: String,
    pub dynamic_code: bool,
}

/// One row of `autotitle preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRow {
    pub key: String,
    pub current: String,
    pub needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn format_status_text(rows: &[StatusRow]) -> String {
    if rows.is_empty() {
        return "No bundles configured.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Entity type", "Bundle", "Status", "Pattern", "Dynamic"]);
    for row in rows {
        let pattern = if row.pattern.trim().is_empty() {
            "(fallback)".to_string()
        } else {
            row.pattern.clone()
        };
        table.add_row(vec![
            row.entity_type.clone(),
            row.bundle.clone(),
            row.status.to_string(),
            pattern,
            if row.dynamic_code { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_preview_text(rows: &[PreviewRow]) -> String {
    if rows.is_empty() {
        return "No records.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Record", "Current", "Needed", "Generated"]);
    for row in rows {
        let generated = match (&row.generated, &row.error) {
            (_, Some(err)) => format!("error: {}", err),
            (Some(title), None) => title.clone(),
            (None, None) => "-".to_string(),
        };
        table.add_row(vec![
            row.key.clone(),
            row.current.clone(),
            if row.needed { "yes" } else { "no" }.to_string(),
            generated,
        ]);
    }
    table.to_string()
}

pub fn format_bulk_report_text(report: &BulkReport, written: bool) -> String {
    let mut out = String::new();
    if !report.results.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Record", "Outcome", "Title"]);
        for result in &report.results {
            let (outcome, detail) = match &result.outcome {
                RecordOutcome::Updated { previous, title } => {
                    ("updated", format!("{:?} -> {:?}", previous, title))
                }
                RecordOutcome::Unchanged { title } => ("unchanged", format!("{:?}", title)),
                RecordOutcome::Skipped => ("skipped", String::new()),
                RecordOutcome::Denied => ("denied", String::new()),
                RecordOutcome::Failed { message } => ("failed", message.clone()),
            };
            table.add_row(vec![result.key.clone(), outcome.to_string(), detail]);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    out.push_str(&format!(
        "Processed {} record(s): {} updated, {} unchanged, {} skipped, {} denied, {} failed",
        report.total,
        report.updated,
        report.unchanged,
        report.skipped,
        report.denied,
        report.failed
    ));
    if written {
        out.push_str("\nRecords file updated.");
    }
    out
}
