use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV decoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook decoding failed: {0}")]
    Workbook(String),

    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Spreadsheet contains no data rows")]
    EmptyBatch,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {message}")]
    Output { message: String },
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Workbook(err.to_string())
    }
}

impl ImportError {
    /// True for failures that mean the input could not be turned into rows at all.
    pub fn is_ingestion_failure(&self) -> bool {
        matches!(
            self,
            ImportError::Csv(_)
                | ImportError::Workbook(_)
                | ImportError::Ingestion(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::EmptyBatch
        )
    }

    /// Short label used on failure metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Io(_) => "io",
            ImportError::Json(_) => "json",
            ImportError::Toml(_) => "toml",
            ImportError::Csv(_) => "csv",
            ImportError::Workbook(_) => "workbook",
            ImportError::Ingestion(_) => "ingestion",
            ImportError::UnsupportedFormat(_) => "unsupported_format",
            ImportError::EmptyBatch => "empty_batch",
            ImportError::Config(_) => "config",
            ImportError::Output { .. } => "output",
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
