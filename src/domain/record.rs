use serde::{Deserialize, Serialize};
use std::fmt;

use super::Field;

/// Emergency contact triple; any part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
}

impl EmergencyContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.relationship.is_none()
    }
}

/// A row mapped onto the fixed record schema, before validation.
///
/// Optional text fields are `None` when no accepted column carried a
/// non-blank value. Numeric fields fall back to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Spreadsheet row number (header is row 1)
    pub row_index: usize,
    pub debtor_name: Option<String>,
    pub id_number: Option<String>,
    pub phone: Option<String>,
    pub contract_no: Option<String>,
    pub loan_amount: f64,
    pub remaining_amount: f64,
    pub overdue_days: i64,
    pub product_line: Option<String>,
    pub loan_date: Option<String>,
    pub due_date: Option<String>,
    pub funder: Option<String>,
    /// At most two entries, blank contacts are dropped
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl NormalizedRecord {
    pub fn empty(row_index: usize) -> Self {
        Self {
            row_index,
            debtor_name: None,
            id_number: None,
            phone: None,
            contract_no: None,
            loan_amount: 0.0,
            remaining_amount: 0.0,
            overdue_days: 0,
            product_line: None,
            loan_date: None,
            due_date: None,
            funder: None,
            emergency_contacts: Vec::new(),
        }
    }
}

/// Machine-readable category of a row-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidFormat,
    CrossField,
    DuplicateContract,
    DuplicateIdNumber,
}

impl ErrorCode {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ErrorCode::DuplicateContract | ErrorCode::DuplicateIdNumber)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::CrossField => "cross_field",
            ErrorCode::DuplicateContract => "duplicate_contract",
            ErrorCode::DuplicateIdNumber => "duplicate_id_number",
        }
    }
}

/// One violated rule on one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    pub code: ErrorCode,
    pub field: Field,
    pub message: String,
}

impl RecordError {
    pub fn new(code: ErrorCode, field: Field, message: impl Into<String>) -> Self {
        Self {
            code,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A normalized record with its validation verdict.
///
/// The verdict is fixed at construction: `is_valid` is true exactly when
/// `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(flatten)]
    record: NormalizedRecord,
    is_valid: bool,
    errors: Vec<RecordError>,
}

impl ImportRecord {
    pub fn annotate(record: NormalizedRecord, errors: Vec<RecordError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            record,
            errors,
        }
    }

    pub fn record(&self) -> &NormalizedRecord {
        &self.record
    }

    pub fn row_index(&self) -> usize {
        self.record.row_index
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn is_duplicate(&self) -> bool {
        self.errors.iter().any(|e| e.code.is_duplicate())
    }

    pub fn into_record(self) -> NormalizedRecord {
        self.record
    }
}
