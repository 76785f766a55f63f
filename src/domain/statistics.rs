use serde::{Deserialize, Serialize};

/// Summary over one completed batch. Monetary and overdue figures cover
/// valid records only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStatistics {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    /// Rows carrying at least one duplicate-key error (subset of invalid)
    pub duplicate_rows: usize,
    pub total_amount: f64,
    pub avg_amount: f64,
    pub max_overdue_days: i64,
    pub min_overdue_days: i64,
}

impl ImportStatistics {
    /// Downstream commit needs at least one accepted record.
    pub fn can_commit(&self) -> bool {
        self.valid_rows > 0
    }

    /// Share of valid rows as a percentage
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.valid_rows as f64 / self.total_rows as f64 * 100.0
    }
}
