use std::collections::HashSet;

use serde::Serialize;

use crate::domain::RecipientRecord;
use crate::suppression::{SuppressionKind, SuppressionLists};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOutcome {
    Accepted,
    Invalid,
    Duplicate,
    Suppressed(SuppressionKind),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub record: RecipientRecord,
    pub outcome: LineOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub suppressed: usize,
}

/// Full per-line detail of one hygiene run. Every dropped recipient appears
/// here with its outcome; nothing is swallowed into a silent success.
#[derive(Debug, Clone, Serialize)]
pub struct HygieneReport {
    pub entries: Vec<ReportEntry>,
}

impl HygieneReport {
    pub fn summary(&self) -> ListSummary {
        let mut summary = ListSummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.outcome {
                LineOutcome::Accepted => summary.valid += 1,
                LineOutcome::Invalid => summary.invalid += 1,
                LineOutcome::Duplicate => summary.duplicates += 1,
                LineOutcome::Suppressed(_) => summary.suppressed += 1,
            }
        }
        summary
    }
}

/// Survivors of validate → dedupe → suppress, plus the annotated report.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedList {
    pub recipients: Vec<RecipientRecord>,
    pub report: HygieneReport,
}

/// One record per non-empty line, in input order.
pub fn validate_lines(raw: &str) -> Vec<RecipientRecord> {
    raw.lines().filter_map(RecipientRecord::parse_line).collect()
}

/// Drops repeats of a lower-cased address, keeping the first occurrence.
/// A duplicate is redundant, not an error, so nothing is reported here.
/// Idempotent: the output contains no duplicates to drop on a second run.
pub fn dedupe(records: Vec<RecipientRecord>) -> Vec<RecipientRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.normalized_email()))
        .collect()
}

/// The whole hygiene pass. Stage order is validate → dedupe → suppress;
/// suppression drops an address regardless of its validity status.
#[tracing::instrument(skip_all)]
pub fn clean(raw: &str, suppression: &SuppressionLists) -> CleanedList {
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    let mut entries = Vec::new();

    for record in validate_lines(raw) {
        let outcome = if !seen.insert(record.normalized_email()) {
            LineOutcome::Duplicate
        } else if let Some(kind) = suppression.lookup(&record.email) {
            LineOutcome::Suppressed(kind)
        } else if !record.valid {
            LineOutcome::Invalid
        } else {
            recipients.push(record.clone());
            LineOutcome::Accepted
        };
        entries.push(ReportEntry { record, outcome });
    }

    let report = HygieneReport { entries };
    let summary = report.summary();
    tracing::info!(
        total = summary.total,
        valid = summary.valid,
        invalid = summary.invalid,
        duplicates = summary.duplicates,
        suppressed = summary.suppressed,
        "Recipient list cleaned"
    );

    CleanedList { recipients, report }
}
