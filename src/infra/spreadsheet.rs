use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::app::ports::RowSource;
use crate::constants::{CSV_EXTENSIONS, WORKBOOK_EXTENSIONS};
use crate::domain::{CellValue, RawRow, HEADER_ROW};
use crate::error::{ImportError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode CSV bytes. The first record is the header; each data row keeps
/// the row number a spreadsheet app shows for it, blank rows included.
pub fn decode_csv(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRow>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|s| s.to_string()).collect(),
        None => return Err(ImportError::Ingestion("header row is missing".to_string())),
    };
    check_header(&header)?;

    // One record is one sheet row, even when a quoted cell spans lines
    let mut rows = Vec::new();
    let mut row_index = HEADER_ROW;
    for record in records {
        let record = record?;
        row_index += 1;
        let cells: Vec<CellValue> = record.iter().map(CellValue::from).collect();
        push_row(&mut rows, &header, row_index, cells);
    }
    Ok(rows)
}

/// Decode one worksheet of an XLSX/XLS/ODS workbook
pub fn decode_workbook(path: &Path, sheet_index: usize) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(sheet_index)
        .ok_or_else(|| ImportError::Ingestion(format!("worksheet {} not found", sheet_index)))??;

    // Ranges skip leading empty rows; keep sheet numbering absolute
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(HEADER_ROW);
    let mut sheet_rows = range.rows();

    let header: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| cell_value(cell).as_text().unwrap_or_default())
            .collect(),
        None => return Err(ImportError::Ingestion("header row is missing".to_string())),
    };
    check_header(&header)?;

    let mut rows = Vec::new();
    for (offset, cells) in sheet_rows.enumerate() {
        let row_index = first_row + offset + 1;
        push_row(&mut rows, &header, row_index, cells.iter().map(cell_value).collect());
    }
    Ok(rows)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(datetime.date().format("%Y-%m-%d").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        _ => CellValue::Empty,
    }
}

fn check_header(header: &[String]) -> Result<()> {
    if header.iter().all(|label| label.trim().is_empty()) {
        return Err(ImportError::Ingestion("header row is missing".to_string()));
    }
    Ok(())
}

/// Pair cells with header labels. Cells past the header are dropped and
/// short rows are padded with blanks. Fully blank rows are skipped.
fn push_row(rows: &mut Vec<RawRow>, header: &[String], row_index: usize, cells: Vec<CellValue>) {
    let mut cells = cells.into_iter();
    let paired: Vec<(String, CellValue)> = header
        .iter()
        .map(|label| (label.clone(), cells.next().unwrap_or(CellValue::Empty)))
        .collect();

    let row = RawRow::new(row_index, paired);
    if row.is_blank() {
        debug!(row = row_index, "Skipping blank row");
        return;
    }
    rows.push(row);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Csv,
    Workbook,
}

impl SpreadsheetFormat {
    /// Format chosen by file extension, case-insensitively
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if CSV_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SpreadsheetFormat::Csv)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Ok(SpreadsheetFormat::Workbook)
        } else {
            Err(ImportError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// File-backed row source dispatching on the file extension
pub struct SpreadsheetSource {
    path: PathBuf,
    sheet_index: usize,
    csv_delimiter: u8,
}

impl SpreadsheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet_index: 0,
            csv_delimiter: b',',
        }
    }

    pub fn with_sheet_index(mut self, sheet_index: usize) -> Self {
        self.sheet_index = sheet_index;
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }
}

#[async_trait]
impl RowSource for SpreadsheetSource {
    async fn read_rows(&self) -> Result<Vec<RawRow>> {
        let format = SpreadsheetFormat::detect(&self.path)?;
        let rows = match format {
            SpreadsheetFormat::Csv => {
                let bytes = tokio::fs::read(&self.path).await?;
                decode_csv(&bytes, self.csv_delimiter)?
            }
            SpreadsheetFormat::Workbook => {
                let path = self.path.clone();
                let sheet_index = self.sheet_index;
                tokio::task::spawn_blocking(move || decode_workbook(&path, sheet_index))
                    .await
                    .map_err(|e| ImportError::Ingestion(format!("workbook reader task failed: {}", e)))??
            }
        };
        info!(path = %self.path.display(), ?format, rows = rows.len(), "Spreadsheet decoded");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
