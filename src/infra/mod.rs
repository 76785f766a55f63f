pub mod case_package_adapter;
pub mod report_output_adapter;
pub mod spreadsheet;
pub mod template;

pub use case_package_adapter::NdjsonCasePackageAdapter;
pub use report_output_adapter::JsonReportOutputAdapter;
pub use spreadsheet::{decode_csv, decode_workbook, SpreadsheetFormat, SpreadsheetSource};
pub use template::{template_file_name, write_template};
