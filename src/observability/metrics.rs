//! Prometheus metrics for the import pipeline
//!
//! Figures are recorded once per stage with batch totals, never per row.
//! Without an installed recorder every call is a no-op.

use anyhow::{anyhow, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::fmt;
use tracing::info;

/// Every metric name the importer emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingestion
    IngestRowsRead,
    IngestFailures,

    // Validation
    ValidateRecordsValid,
    ValidateRecordsInvalid,
    ValidateRecordsDuplicate,
    ValidateBatchSize,

    // Import outcome
    ImportBatchesCommitted,
    ImportBatchesBlocked,
    ImportRemainingAmount,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "case_import_ingest_rows_read_total",
            MetricName::IngestFailures => "case_import_ingest_failures_total",
            MetricName::ValidateRecordsValid => "case_import_validate_records_valid_total",
            MetricName::ValidateRecordsInvalid => "case_import_validate_records_invalid_total",
            MetricName::ValidateRecordsDuplicate => "case_import_validate_records_duplicate_total",
            MetricName::ValidateBatchSize => "case_import_validate_batch_size",
            MetricName::ImportBatchesCommitted => "case_import_batches_committed_total",
            MetricName::ImportBatchesBlocked => "case_import_batches_blocked_total",
            MetricName::ImportRemainingAmount => "case_import_remaining_amount",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            IngestRowsRead,
            IngestFailures,
            ValidateRecordsValid,
            ValidateRecordsInvalid,
            ValidateRecordsDuplicate,
            ValidateBatchSize,
            ImportBatchesCommitted,
            ImportBatchesBlocked,
            ImportRemainingAmount,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init() -> Result<()> {
    if HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow!("Failed to install Prometheus recorder: {}", e))?;
    let _ = HANDLE.set(handle);
    info!("Metrics recorder installed");
    Ok(())
}

/// Current metrics in Prometheus text format, if the recorder is installed
pub fn render() -> Option<String> {
    HANDLE.get().map(|handle| handle.render())
}

// ============================================================================
// Ingestion
// ============================================================================

pub mod ingest {
    use super::MetricName;

    /// Data rows decoded from one file
    pub fn rows_read(count: usize) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(count as u64);
    }

    /// File could not be turned into rows
    pub fn failure(kind: &str) {
        ::metrics::counter!(MetricName::IngestFailures.as_str(), "kind" => kind.to_string()).increment(1);
    }
}

// ============================================================================
// Validation
// ============================================================================

pub mod validate {
    use super::MetricName;

    /// Verdict totals for one validated batch
    pub fn batch_validated(valid: usize, invalid: usize, duplicates: usize) {
        ::metrics::counter!(MetricName::ValidateRecordsValid.as_str()).increment(valid as u64);
        ::metrics::counter!(MetricName::ValidateRecordsInvalid.as_str()).increment(invalid as u64);
        ::metrics::counter!(MetricName::ValidateRecordsDuplicate.as_str()).increment(duplicates as u64);
        ::metrics::histogram!(MetricName::ValidateBatchSize.as_str()).record((valid + invalid) as f64);
    }
}

// ============================================================================
// Import outcome
// ============================================================================

pub mod import {
    use super::MetricName;

    pub fn batch_committed(total_amount: f64) {
        ::metrics::counter!(MetricName::ImportBatchesCommitted.as_str()).increment(1);
        ::metrics::histogram!(MetricName::ImportRemainingAmount.as_str()).record(total_amount);
    }

    pub fn batch_blocked() {
        ::metrics::counter!(MetricName::ImportBatchesBlocked.as_str()).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique_and_prefixed() {
        let names: Vec<&str> = MetricName::all_metrics().map(|m| m.as_str()).collect();
        let unique: HashSet<&str> = names.iter().copied().collect();

        assert_eq!(names.len(), unique.len());
        assert!(names.iter().all(|n| n.starts_with("case_import_")));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        ingest::rows_read(3);
        validate::batch_validated(2, 1, 1);
        import::batch_blocked();
    }
}
