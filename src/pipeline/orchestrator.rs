use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, info, instrument};

use crate::domain::{CellValue, ImportRecord, ImportStatistics, NormalizedRecord, RawRow};
use crate::pipeline::processing::aggregate;
use crate::pipeline::processing::dedup::BatchDeduplicator;
use crate::pipeline::processing::normalize::{DefaultNormalizer, Normalizer};
use crate::pipeline::processing::validate::{DefaultValidator, ValidationConfig};

/// Lifecycle of one batch, as reported in the stage logs. A batch moves
/// forward exactly once through each stage; there is no resume. Only a
/// summarized batch ever leaves `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Unparsed,
    Validated,
    Summarized,
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchStage::Unparsed => "unparsed",
            BatchStage::Validated => "validated",
            BatchStage::Summarized => "summarized",
        };
        write!(f, "{}", name)
    }
}

/// Result of running one batch through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// SHA-256 over the raw rows; identical input gives an identical id
    pub batch_id: String,
    /// Every row, valid or not, in input order
    pub records: Vec<ImportRecord>,
    pub statistics: ImportStatistics,
}

impl ImportOutcome {
    /// Records cleared for case-package creation
    pub fn accepted(&self) -> impl Iterator<Item = &ImportRecord> {
        self.records.iter().filter(|r| r.is_valid())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &ImportRecord> {
        self.records.iter().filter(|r| !r.is_valid())
    }

    pub fn can_commit(&self) -> bool {
        self.statistics.can_commit()
    }
}

/// Records that went through validation but have not been summarized yet
struct ValidatedBatch {
    batch_id: String,
    records: Vec<ImportRecord>,
}

impl ValidatedBatch {
    fn summarize(self) -> ImportOutcome {
        let statistics = aggregate::summarize(&self.records);
        ImportOutcome {
            batch_id: self.batch_id,
            records: self.records,
            statistics,
        }
    }
}

/// Sequences normalize → validate/dedup → summarize over one batch.
///
/// Holds no batch state between runs: every call builds its own
/// deduplicator, so one pipeline can serve many batches.
pub struct ImportPipeline {
    normalizer: Box<dyn Normalizer + Send + Sync>,
    validator: DefaultValidator,
}

impl ImportPipeline {
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            normalizer: Box::new(DefaultNormalizer::new()),
            validator: DefaultValidator::with_config(config),
        }
    }

    pub fn with_components(
        normalizer: Box<dyn Normalizer + Send + Sync>,
        validator: DefaultValidator,
    ) -> Self {
        Self {
            normalizer,
            validator,
        }
    }

    /// Run the whole batch. Row-level failures end up on the records;
    /// nothing here can fail.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn run(&self, rows: &[RawRow]) -> ImportOutcome {
        let batch_id = batch_fingerprint(rows);
        info!(batch_id = %batch_id, stage = %BatchStage::Unparsed, "Starting import batch");

        let normalized = self.normalize_rows(rows);
        let validated = self.validate_records(batch_id, normalized);
        info!(
            stage = %BatchStage::Validated,
            records = validated.records.len(),
            "Batch validated"
        );

        let outcome = validated.summarize();
        info!(
            stage = %BatchStage::Summarized,
            total = outcome.statistics.total_rows,
            valid = outcome.statistics.valid_rows,
            invalid = outcome.statistics.invalid_rows,
            duplicates = outcome.statistics.duplicate_rows,
            "Batch summarized"
        );
        outcome
    }

    fn normalize_rows(&self, rows: &[RawRow]) -> Vec<NormalizedRecord> {
        rows.iter().map(|row| self.normalizer.normalize(row)).collect()
    }

    /// Single ordered pass: uniqueness state must accumulate row by row.
    fn validate_records(&self, batch_id: String, records: Vec<NormalizedRecord>) -> ValidatedBatch {
        let mut dedup = BatchDeduplicator::new();
        let records = records
            .into_iter()
            .map(|record| {
                let annotated = self.validator.validate(record, &mut dedup);
                if !annotated.is_valid() {
                    debug!(
                        row = annotated.row_index(),
                        errors = ?annotated.error_messages(),
                        "Row rejected"
                    );
                }
                annotated
            })
            .collect();
        debug!(
            contracts = dedup.contracts_seen(),
            id_numbers = dedup.id_numbers_seen(),
            "Distinct batch keys"
        );
        ValidatedBatch { batch_id, records }
    }
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Content hash of a batch of raw rows, hex encoded
pub fn batch_fingerprint(rows: &[RawRow]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        hasher.update((row.row_index as u64).to_le_bytes());
        for (label, value) in &row.cells {
            hasher.update(label.as_bytes());
            hasher.update([0x1f]);
            match value {
                CellValue::Number(n) => {
                    hasher.update([b'n']);
                    hasher.update(n.to_bits().to_le_bytes());
                }
                CellValue::Text(s) => {
                    hasher.update([b's']);
                    hasher.update(s.as_bytes());
                }
                CellValue::Empty => hasher.update([b'e']),
            }
            hasher.update([0x1e]);
        }
        hasher.update([0x0a]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, name: &str, id: &str, contract: &str, loan: f64, remaining: f64) -> RawRow {
        RawRow::new(
            index,
            vec![
                ("customer name*".to_string(), CellValue::from(name)),
                ("id number*".to_string(), CellValue::from(id)),
                ("loan contract no.*".to_string(), CellValue::from(contract)),
                ("loan amount*".to_string(), CellValue::Number(loan)),
                ("remaining balance*".to_string(), CellValue::Number(remaining)),
                ("overdue days*".to_string(), CellValue::Number(15.0)),
            ],
        )
    }

    #[test]
    fn test_run_preserves_order_and_row_numbers() {
        let pipeline = ImportPipeline::new();
        let rows = vec![
            row(2, "A", "110101199003071234", "C1", 1000.0, 500.0),
            row(3, "B", "44030419851231002X", "C2", 1000.0, 500.0),
            row(5, "C", "320102197702284568", "C3", 1000.0, 500.0),
        ];

        let outcome = pipeline.run(&rows);
        let indices: Vec<usize> = outcome.records.iter().map(|r| r.row_index()).collect();
        assert_eq!(indices, vec![2, 3, 5]);
        assert_eq!(outcome.accepted().count(), 3);
        assert_eq!(outcome.rejected().count(), 0);
    }

    #[test]
    fn test_empty_input_gives_empty_outcome() {
        let outcome = ImportPipeline::new().run(&[]);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.statistics, ImportStatistics::default());
        assert!(!outcome.can_commit());
    }

    #[test]
    fn test_each_run_starts_with_fresh_uniqueness_state() {
        let pipeline = ImportPipeline::new();
        let rows = vec![row(2, "A", "110101199003071234", "C1", 1000.0, 500.0)];

        let first = pipeline.run(&rows);
        let second = pipeline.run(&rows);
        assert!(first.records[0].is_valid());
        assert!(second.records[0].is_valid());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = vec![row(2, "A", "110101199003071234", "C1", 1000.0, 500.0)];
        let b = vec![row(2, "A", "110101199003071234", "C1", 1000.0, 501.0)];

        assert_eq!(batch_fingerprint(&a), batch_fingerprint(&a.clone()));
        assert_ne!(batch_fingerprint(&a), batch_fingerprint(&b));
        assert_eq!(batch_fingerprint(&[]).len(), 64);
    }
}
