use crate::domain::{CellValue, Field, RawRow};

/// Accepted header spellings per field, most preferred first. The first
/// entry of each list is the canonical template header.
const ALIAS_TABLE: &[(Field, &[&str])] = &[
    (Field::DebtorName, &["customer name*", "customer name", "name"]),
    (Field::IdNumber, &["id number*", "id number", "national id"]),
    (Field::Phone, &["phone", "mobile", "phone number"]),
    (Field::ContractNo, &["loan contract no.*", "loan contract no.", "contract no."]),
    (Field::LoanAmount, &["loan amount*", "loan amount"]),
    (Field::RemainingAmount, &["remaining balance*", "remaining balance", "remaining amount"]),
    (Field::OverdueDays, &["overdue days*", "overdue days"]),
    (Field::ProductLine, &["product line", "product"]),
    (Field::LoanDate, &["loan date"]),
    (Field::DueDate, &["due date"]),
    (Field::Funder, &["funding party", "funder"]),
    (Field::Contact1Name, &["emergency contact 1 name", "contact 1 name"]),
    (Field::Contact1Phone, &["emergency contact 1 phone", "contact 1 phone"]),
    (Field::Contact1Relation, &["emergency contact 1 relationship", "contact 1 relationship"]),
    (Field::Contact2Name, &["emergency contact 2 name", "contact 2 name"]),
    (Field::Contact2Phone, &["emergency contact 2 phone", "contact 2 phone"]),
    (Field::Contact2Relation, &["emergency contact 2 relationship", "contact 2 relationship"]),
];

/// Canonical comparison form of a header label: trimmed, lower-cased,
/// inner whitespace collapsed.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Ordered header aliases for every field
#[derive(Debug, Clone)]
pub struct AliasRegistry {
    entries: Vec<(Field, Vec<String>)>,
}

impl AliasRegistry {
    /// Create a registry holding the built-in alias table
    pub fn new() -> Self {
        let entries = ALIAS_TABLE
            .iter()
            .map(|(field, aliases)| {
                (*field, aliases.iter().map(|a| normalize_label(a)).collect())
            })
            .collect();
        Self { entries }
    }

    /// Append an extra spelling for a field. It is consulted after the
    /// built-in ones, so it never changes the canonical header.
    pub fn register(&mut self, field: Field, alias: &str) {
        let alias = normalize_label(alias);
        if let Some((_, aliases)) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
    }

    pub fn aliases(&self, field: Field) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    pub fn canonical_header(&self, field: Field) -> Option<&str> {
        self.aliases(field).first().map(|s| s.as_str())
    }

    /// Template header line, one canonical header per field in table order
    pub fn template_headers(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|(_, aliases)| aliases.first().map(|s| s.as_str()))
            .collect()
    }

    /// First non-blank cell among the field's aliases, in alias order.
    pub fn resolve<'r>(&self, field: Field, row: &'r RawRow) -> Option<&'r CellValue> {
        self.aliases(field).iter().find_map(|alias| {
            row.cells
                .iter()
                .find(|(header, value)| normalize_label(header) == *alias && !value.is_blank())
                .map(|(_, value)| value)
        })
    }

    /// Field a header label maps to, if any.
    pub fn field_for_header(&self, header: &str) -> Option<Field> {
        let label = normalize_label(header);
        self.entries
            .iter()
            .find(|(_, aliases)| aliases.contains(&label))
            .map(|(field, _)| *field)
    }
}

impl Default for AliasRegistry {
    fn default() -> Self {
        Self::new()
    }
}
