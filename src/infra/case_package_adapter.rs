use async_trait::async_trait;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::CasePackagePort;
use crate::domain::{ImportStatistics, NormalizedRecord};

#[derive(Debug, Serialize)]
struct PackageLine<'a> {
    batch_id: &'a str,
    #[serde(flatten)]
    record: &'a NormalizedRecord,
}

#[derive(Debug, Serialize)]
struct PackageStats<'a> {
    batch_id: &'a str,
    committed_at: String,
    records: usize,
    statistics: &'a ImportStatistics,
}

/// File-based case package: one accepted record per NDJSON line, with the
/// batch statistics in a JSON sidecar next to it.
pub struct NdjsonCasePackageAdapter {
    file_path: PathBuf,
    stats_path: PathBuf,
}

impl NdjsonCasePackageAdapter {
    pub fn new(file_path: impl Into<PathBuf>, stats_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            stats_path: stats_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    fn write_records(&self, batch_id: &str, records: &[NormalizedRecord]) -> anyhow::Result<()> {
        if let Some(dir) = self.file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut writer = BufWriter::new(std::fs::File::create(&self.file_path)?);
        for record in records {
            let line = serde_json::to_string(&PackageLine { batch_id, record })?;
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_stats(&self, batch_id: &str, records: usize, statistics: &ImportStatistics) -> anyhow::Result<()> {
        if let Some(dir) = self.stats_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let stats = PackageStats {
            batch_id,
            committed_at: chrono::Utc::now().to_rfc3339(),
            records,
            statistics,
        };
        std::fs::write(&self.stats_path, serde_json::to_vec_pretty(&stats)?)?;
        Ok(())
    }
}

/// Remove a file, treating an already-missing one as removed
fn remove_if_present(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl CasePackagePort for NdjsonCasePackageAdapter {
    async fn commit(
        &self,
        batch_id: &str,
        records: &[NormalizedRecord],
        statistics: &ImportStatistics,
    ) -> anyhow::Result<()> {
        self.write_records(batch_id, records)?;
        self.write_stats(batch_id, records.len(), statistics)?;
        info!(
            path = %self.file_path.display(),
            batch_id,
            records = records.len(),
            "Case package written"
        );
        Ok(())
    }

    async fn discard(&self) -> anyhow::Result<()> {
        let removed_package = remove_if_present(&self.file_path)?;
        let removed_stats = remove_if_present(&self.stats_path)?;
        if removed_package || removed_stats {
            info!(path = %self.file_path.display(), "Stale case package removed");
        }
        Ok(())
    }
}
