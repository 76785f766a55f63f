use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::ReportOutputPort;
use crate::domain::{ImportRecord, ImportStatistics};
use crate::error::ImportError;
use crate::pipeline::ImportOutcome;

/// Report document handed to the review UI
#[derive(Debug, Serialize)]
struct ImportReport<'a> {
    batch_id: &'a str,
    generated_at: String,
    statistics: &'a ImportStatistics,
    records: &'a [ImportRecord],
}

/// Writes the annotated batch as one pretty-printed JSON document
pub struct JsonReportOutputAdapter {
    file_path: PathBuf,
}

impl JsonReportOutputAdapter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl ReportOutputPort for JsonReportOutputAdapter {
    async fn write_report(&self, outcome: &ImportOutcome) -> anyhow::Result<()> {
        if let Some(dir) = self.file_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let report = ImportReport {
            batch_id: &outcome.batch_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            statistics: &outcome.statistics,
            records: &outcome.records,
        };
        let body = serde_json::to_vec_pretty(&report).map_err(ImportError::from)?;
        tokio::fs::write(&self.file_path, body).await.map_err(|e| ImportError::Output {
            message: format!("cannot write {}: {}", self.file_path.display(), e),
        })?;

        info!(path = %self.file_path.display(), records = outcome.records.len(), "Import report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ImportPipeline;

    #[tokio::test]
    async fn test_report_contains_statistics_and_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = JsonReportOutputAdapter::new(dir.path().join("nested").join("report.json"));
        let outcome = ImportPipeline::new().run(&[]);

        adapter.write_report(&outcome).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(adapter.file_path()).unwrap()).unwrap();
        assert_eq!(written["batch_id"], outcome.batch_id.as_str());
        assert!(written.get("stage").is_none());
        assert!(written.get("generated_at").is_some());
        assert_eq!(written["statistics"]["total_rows"], 0);
        assert!(written["records"].as_array().unwrap().is_empty());
    }
}
