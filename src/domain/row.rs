use serde::{Deserialize, Serialize};

/// Spreadsheet row number of the header line.
pub const HEADER_ROW: usize = 1;
/// Spreadsheet row number of the first data line.
pub const FIRST_DATA_ROW: usize = HEADER_ROW + 1;

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Trimmed text form of the cell, `None` when blank.
    ///
    /// Whole numbers render without a fractional part so that phone numbers
    /// and IDs typed into numeric cells survive the round trip.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) if !n.is_finite() => None,
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => Some(format!("{:.0}", n)),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Empty => None,
        }
    }

    /// Tolerant numeric reading: thousands separators are ignored and
    /// anything unparsable reads as `0`.
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) if n.is_finite() => *n,
            CellValue::Number(_) => 0.0,
            CellValue::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                match cleaned.parse::<f64>() {
                    Ok(n) if n.is_finite() => n,
                    _ => 0.0,
                }
            }
            CellValue::Empty => 0.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

/// One decoded data row: header label → cell, in column order, plus the
/// row number a user sees in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_index: usize,
    pub cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(row_index: usize, cells: Vec<(String, CellValue)>) -> Self {
        Self { row_index, cells }
    }

    /// Number consecutive data rows starting at the first data row.
    pub fn sequence<I>(rows: I) -> Vec<RawRow>
    where
        I: IntoIterator<Item = Vec<(String, CellValue)>>,
    {
        rows.into_iter()
            .enumerate()
            .map(|(position, cells)| RawRow::new(FIRST_DATA_ROW + position, cells))
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_cells_render_without_fraction() {
        assert_eq!(CellValue::Number(13800138000.0).as_text().as_deref(), Some("13800138000"));
        assert_eq!(CellValue::Number(12.5).as_text().as_deref(), Some("12.5"));
        assert_eq!(CellValue::Text("  ".to_string()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
    }

    #[test]
    fn test_tolerant_number_parse() {
        assert_eq!(CellValue::from("1,500.25").as_number(), 1500.25);
        assert_eq!(CellValue::from(" 42 ").as_number(), 42.0);
        assert_eq!(CellValue::from("abc").as_number(), 0.0);
        assert_eq!(CellValue::from("").as_number(), 0.0);
        assert_eq!(CellValue::Number(f64::NAN).as_number(), 0.0);
        assert_eq!(CellValue::from("inf").as_number(), 0.0);
    }

    #[test]
    fn test_sequence_starts_after_header() {
        let rows = RawRow::sequence(vec![
            vec![("name".to_string(), CellValue::from("A"))],
            vec![("name".to_string(), CellValue::from("B"))],
        ]);
        assert_eq!(rows[0].row_index, 2);
        assert_eq!(rows[1].row_index, 3);
    }

    #[test]
    fn test_blank_row_detection() {
        let row = RawRow::new(
            5,
            vec![
                ("name".to_string(), CellValue::Empty),
                ("phone".to_string(), CellValue::from("   ")),
            ],
        );
        assert!(row.is_blank());
    }
}
