use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical fields of an imported debt record, in template column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DebtorName,
    IdNumber,
    Phone,
    ContractNo,
    LoanAmount,
    RemainingAmount,
    OverdueDays,
    ProductLine,
    LoanDate,
    DueDate,
    Funder,
    Contact1Name,
    Contact1Phone,
    Contact1Relation,
    Contact2Name,
    Contact2Phone,
    Contact2Relation,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::DebtorName,
        Field::IdNumber,
        Field::Phone,
        Field::ContractNo,
        Field::LoanAmount,
        Field::RemainingAmount,
        Field::OverdueDays,
        Field::ProductLine,
        Field::LoanDate,
        Field::DueDate,
        Field::Funder,
        Field::Contact1Name,
        Field::Contact1Phone,
        Field::Contact1Relation,
        Field::Contact2Name,
        Field::Contact2Phone,
        Field::Contact2Relation,
    ];

    /// Stable machine name, used in reports and metrics labels.
    pub fn key(&self) -> &'static str {
        match self {
            Field::DebtorName => "debtor_name",
            Field::IdNumber => "id_number",
            Field::Phone => "phone",
            Field::ContractNo => "contract_no",
            Field::LoanAmount => "loan_amount",
            Field::RemainingAmount => "remaining_amount",
            Field::OverdueDays => "overdue_days",
            Field::ProductLine => "product_line",
            Field::LoanDate => "loan_date",
            Field::DueDate => "due_date",
            Field::Funder => "funder",
            Field::Contact1Name => "contact1_name",
            Field::Contact1Phone => "contact1_phone",
            Field::Contact1Relation => "contact1_relation",
            Field::Contact2Name => "contact2_name",
            Field::Contact2Phone => "contact2_phone",
            Field::Contact2Relation => "contact2_relation",
        }
    }

    /// Fields the template marks with `*`.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Field::DebtorName
                | Field::IdNumber
                | Field::ContractNo
                | Field::LoanAmount
                | Field::RemainingAmount
                | Field::OverdueDays
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
