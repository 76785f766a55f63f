pub mod registry;

use crate::domain::{EmergencyContact, Field, NormalizedRecord, RawRow};

pub use registry::{normalize_label, AliasRegistry};

/// Trait for mapping decoded spreadsheet rows onto the record schema
pub trait Normalizer {
    /// Produce exactly one record per row. Missing fields are left at their
    /// zero value; reporting them is the validator's job.
    fn normalize(&self, row: &RawRow) -> NormalizedRecord;
}

/// Alias-table driven normalizer
pub struct DefaultNormalizer {
    pub registry: AliasRegistry,
}

impl DefaultNormalizer {
    pub fn new() -> Self {
        Self {
            registry: AliasRegistry::new(),
        }
    }

    pub fn with_registry(registry: AliasRegistry) -> Self {
        Self { registry }
    }

    fn text(&self, field: Field, row: &RawRow) -> Option<String> {
        self.registry.resolve(field, row).and_then(|v| v.as_text())
    }

    fn number(&self, field: Field, row: &RawRow) -> f64 {
        self.registry
            .resolve(field, row)
            .map(|v| v.as_number())
            .unwrap_or(0.0)
    }

    fn contact(&self, name: Field, phone: Field, relationship: Field, row: &RawRow) -> EmergencyContact {
        EmergencyContact {
            name: self.text(name, row),
            phone: self.text(phone, row),
            relationship: self.text(relationship, row),
        }
    }
}

impl Default for DefaultNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, row: &RawRow) -> NormalizedRecord {
        let emergency_contacts = [
            self.contact(Field::Contact1Name, Field::Contact1Phone, Field::Contact1Relation, row),
            self.contact(Field::Contact2Name, Field::Contact2Phone, Field::Contact2Relation, row),
        ]
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect();

        NormalizedRecord {
            row_index: row.row_index,
            debtor_name: self.text(Field::DebtorName, row),
            id_number: self.text(Field::IdNumber, row),
            phone: self.text(Field::Phone, row),
            contract_no: self.text(Field::ContractNo, row),
            loan_amount: self.number(Field::LoanAmount, row),
            remaining_amount: self.number(Field::RemainingAmount, row),
            overdue_days: self.number(Field::OverdueDays, row).trunc() as i64,
            product_line: self.text(Field::ProductLine, row),
            loan_date: self.text(Field::LoanDate, row),
            due_date: self.text(Field::DueDate, row),
            funder: self.text(Field::Funder, row),
            emergency_contacts,
        }
    }
}
