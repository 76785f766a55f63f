// Core import types. Pure data: no I/O, no clocks, no randomness.

mod field;
mod record;
mod row;
mod statistics;

pub use field::Field;
pub use record::{EmergencyContact, ErrorCode, ImportRecord, NormalizedRecord, RecordError};
pub use row::{CellValue, RawRow, FIRST_DATA_ROW, HEADER_ROW};
pub use statistics::ImportStatistics;
