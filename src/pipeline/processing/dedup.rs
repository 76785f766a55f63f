use std::collections::HashMap;

use crate::domain::{ErrorCode, Field, NormalizedRecord, RecordError};

/// Batch-scoped uniqueness tracker for contract numbers and national IDs.
///
/// Construct one per batch and feed records in row order. The first row
/// carrying a key claims it; every later row with the same key is flagged.
/// Blank keys are not tracked, missing values are the validator's concern.
#[derive(Debug, Default)]
pub struct BatchDeduplicator {
    /// contract number -> row index of first occurrence
    seen_contracts: HashMap<String, usize>,
    /// national ID -> row index of first occurrence
    seen_id_numbers: HashMap<String, usize>,
}

impl BatchDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the record's keys against everything seen so far and claim
    /// the unseen ones. Already-claimed keys are left untouched.
    pub fn observe(&mut self, record: &NormalizedRecord) -> Vec<RecordError> {
        let mut errors = Vec::new();

        if let Some(contract_no) = record.contract_no.as_deref() {
            if let Some(first_row) = claim(&mut self.seen_contracts, contract_no, record.row_index) {
                errors.push(RecordError::new(
                    ErrorCode::DuplicateContract,
                    Field::ContractNo,
                    format!(
                        "duplicate contract number {} (first seen at row {})",
                        contract_no, first_row
                    ),
                ));
            }
        }

        if let Some(id_number) = record.id_number.as_deref() {
            let key = id_number_key(id_number);
            if let Some(first_row) = claim(&mut self.seen_id_numbers, &key, record.row_index) {
                errors.push(RecordError::new(
                    ErrorCode::DuplicateIdNumber,
                    Field::IdNumber,
                    format!(
                        "duplicate national ID {} (first seen at row {})",
                        id_number, first_row
                    ),
                ));
            }
        }

        errors
    }

    pub fn contracts_seen(&self) -> usize {
        self.seen_contracts.len()
    }

    pub fn id_numbers_seen(&self) -> usize {
        self.seen_id_numbers.len()
    }
}

/// National IDs compare with the check character case-folded: `x` and `X`
/// are the same ID.
fn id_number_key(id_number: &str) -> String {
    id_number.to_ascii_uppercase()
}

/// Returns the first row that claimed `key`, or records `row` as the owner.
fn claim(seen: &mut HashMap<String, usize>, key: &str, row: usize) -> Option<usize> {
    match seen.get(key) {
        Some(first_row) => Some(*first_row),
        None => {
            seen.insert(key.to_string(), row);
            None
        }
    }
}
