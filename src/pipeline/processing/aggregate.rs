use crate::domain::{ImportRecord, ImportStatistics};

/// Derive batch statistics from the final annotated record list.
///
/// Pure: the same list always yields the same statistics, so a stored
/// summary can be checked by recomputing it.
pub fn summarize(records: &[ImportRecord]) -> ImportStatistics {
    let total_rows = records.len();
    let valid: Vec<&ImportRecord> = records.iter().filter(|r| r.is_valid()).collect();
    let valid_rows = valid.len();
    let duplicate_rows = records.iter().filter(|r| r.is_duplicate()).count();

    let total_amount: f64 = valid.iter().map(|r| r.record().remaining_amount).sum();
    let avg_amount = if valid_rows == 0 {
        0.0
    } else {
        total_amount / valid_rows as f64
    };

    let overdue = valid.iter().map(|r| r.record().overdue_days);
    let max_overdue_days = overdue.clone().max().unwrap_or(0);
    let min_overdue_days = overdue.min().unwrap_or(0);

    ImportStatistics {
        total_rows,
        valid_rows,
        invalid_rows: total_rows - valid_rows,
        duplicate_rows,
        total_amount,
        avg_amount,
        max_overdue_days,
        min_overdue_days,
    }
}
