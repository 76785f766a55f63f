/// Shared constants for the import tooling

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "case_import.toml";

/// Version of the header template; bump whenever the alias table's
/// canonical headers change.
pub const TEMPLATE_VERSION: &str = "v1";

pub const TEMPLATE_FILE_PREFIX: &str = "case_import_template";
pub const REPORT_FILE_NAME: &str = "import_report.json";
pub const PACKAGE_FILE_NAME: &str = "case_package.ndjson";
pub const PACKAGE_STATS_FILE_NAME: &str = "case_package_stats.json";

/// Spreadsheet formats handed to the workbook decoder
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
pub const CSV_EXTENSIONS: &[&str] = &["csv", "txt"];
