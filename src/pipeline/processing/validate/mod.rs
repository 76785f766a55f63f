pub mod rules;

use serde::Deserialize;

use crate::domain::{ErrorCode, Field, ImportRecord, NormalizedRecord, RecordError};
use crate::pipeline::processing::dedup::BatchDeduplicator;

pub const MSG_NAME_REQUIRED: &str = "debtor name is required";
pub const MSG_ID_REQUIRED: &str = "national ID is required";
pub const MSG_CONTRACT_REQUIRED: &str = "contract number is required";
pub const MSG_LOAN_AMOUNT_POSITIVE: &str = "loan amount must be greater than 0";
pub const MSG_REMAINING_POSITIVE: &str = "remaining balance must be greater than 0";
pub const MSG_OVERDUE_NEGATIVE: &str = "overdue days must not be negative";
pub const MSG_ID_FORMAT: &str = "national ID format is invalid";
pub const MSG_ID_CHECKSUM: &str = "national ID check digit or birth date is invalid";
pub const MSG_PHONE_FORMAT: &str = "phone number format is invalid";
pub const MSG_REMAINING_EXCEEDS_LOAN: &str = "remaining balance must not exceed loan amount";

/// Configuration for record validation rules
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Also verify the ID check character and that the birth date exists
    pub verify_id_checksum: bool,
}

/// Row-local business rules
pub trait Validator {
    /// All row-local violations in rule order: presence, format, cross-field.
    fn check(&self, record: &NormalizedRecord) -> Vec<RecordError>;
}

/// Default rule set for debt records
pub struct DefaultValidator {
    pub config: ValidationConfig,
}

impl DefaultValidator {
    pub fn new() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Run every rule, then the batch uniqueness checks, and fix the verdict.
    pub fn validate(&self, record: NormalizedRecord, dedup: &mut BatchDeduplicator) -> ImportRecord {
        let mut errors = self.check(&record);
        errors.extend(dedup.observe(&record));
        ImportRecord::annotate(record, errors)
    }

    fn check_presence(&self, record: &NormalizedRecord, errors: &mut Vec<RecordError>) {
        if record.debtor_name.is_none() {
            errors.push(RecordError::new(ErrorCode::MissingField, Field::DebtorName, MSG_NAME_REQUIRED));
        }
        if record.id_number.is_none() {
            errors.push(RecordError::new(ErrorCode::MissingField, Field::IdNumber, MSG_ID_REQUIRED));
        }
        if record.contract_no.is_none() {
            errors.push(RecordError::new(ErrorCode::MissingField, Field::ContractNo, MSG_CONTRACT_REQUIRED));
        }
        if record.loan_amount <= 0.0 {
            errors.push(RecordError::new(ErrorCode::InvalidValue, Field::LoanAmount, MSG_LOAN_AMOUNT_POSITIVE));
        }
        if record.remaining_amount <= 0.0 {
            errors.push(RecordError::new(
                ErrorCode::InvalidValue,
                Field::RemainingAmount,
                MSG_REMAINING_POSITIVE,
            ));
        }
        if record.overdue_days < 0 {
            errors.push(RecordError::new(ErrorCode::InvalidValue, Field::OverdueDays, MSG_OVERDUE_NEGATIVE));
        }
    }

    fn check_format(&self, record: &NormalizedRecord, errors: &mut Vec<RecordError>) {
        if let Some(id) = record.id_number.as_deref() {
            if !rules::is_valid_id_number_format(id) {
                errors.push(RecordError::new(ErrorCode::InvalidFormat, Field::IdNumber, MSG_ID_FORMAT));
            } else if self.config.verify_id_checksum && !rules::passes_id_checksum(id) {
                errors.push(RecordError::new(ErrorCode::InvalidFormat, Field::IdNumber, MSG_ID_CHECKSUM));
            }
        }
        if let Some(phone) = record.phone.as_deref() {
            if !rules::is_valid_mobile(phone) {
                errors.push(RecordError::new(ErrorCode::InvalidFormat, Field::Phone, MSG_PHONE_FORMAT));
            }
        }
    }

    fn check_cross_field(&self, record: &NormalizedRecord, errors: &mut Vec<RecordError>) {
        if record.remaining_amount > record.loan_amount {
            errors.push(RecordError::new(
                ErrorCode::CrossField,
                Field::RemainingAmount,
                MSG_REMAINING_EXCEEDS_LOAN,
            ));
        }
    }
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for DefaultValidator {
    fn check(&self, record: &NormalizedRecord) -> Vec<RecordError> {
        let mut errors = Vec::new();
        self.check_presence(record, &mut errors);
        self.check_format(record, &mut errors);
        self.check_cross_field(record, &mut errors);
        errors
    }
}
