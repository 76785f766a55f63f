use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::app::ports::{CasePackagePort, ReportOutputPort, RowSource};
use crate::domain::NormalizedRecord;
use crate::error::ImportError;
use crate::observability::metrics;
use crate::pipeline::{ImportOutcome, ImportPipeline};

/// Whether the accepted records were handed downstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CommitStatus {
    Committed { records: usize },
    /// No valid rows; nothing was sent downstream
    Blocked,
}

#[derive(Debug, Clone)]
pub struct ImportRun {
    pub outcome: ImportOutcome,
    pub commit: CommitStatus,
}

/// Use case wiring one file through decode → pipeline → report → commit
pub struct ImportUseCase {
    source: Box<dyn RowSource>,
    pipeline: ImportPipeline,
    report_output: Box<dyn ReportOutputPort>,
    case_package: Box<dyn CasePackagePort>,
    reject_empty_batch: bool,
}

impl ImportUseCase {
    pub fn new(
        source: Box<dyn RowSource>,
        pipeline: ImportPipeline,
        report_output: Box<dyn ReportOutputPort>,
        case_package: Box<dyn CasePackagePort>,
    ) -> Self {
        Self {
            source,
            pipeline,
            report_output,
            case_package,
            reject_empty_batch: false,
        }
    }

    /// Use case with the default pipeline
    pub fn with_default_pipeline(
        source: Box<dyn RowSource>,
        report_output: Box<dyn ReportOutputPort>,
        case_package: Box<dyn CasePackagePort>,
    ) -> Self {
        Self::new(source, ImportPipeline::new(), report_output, case_package)
    }

    pub fn reject_empty_batch(mut self, reject: bool) -> Self {
        self.reject_empty_batch = reject;
        self
    }

    #[instrument(skip_all, fields(source = %self.source.describe()))]
    pub async fn execute(&self) -> Result<ImportRun> {
        let rows = match self.source.read_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                metrics::ingest::failure(e.kind());
                return Err(e).context(format!("Failed to read {}", self.source.describe()));
            }
        };
        metrics::ingest::rows_read(rows.len());

        if rows.is_empty() {
            if self.reject_empty_batch {
                metrics::ingest::failure(ImportError::EmptyBatch.kind());
                return Err(ImportError::EmptyBatch.into());
            }
            warn!("Spreadsheet has no data rows; producing an empty result");
        }

        let outcome = self.pipeline.run(&rows);
        let stats = &outcome.statistics;
        metrics::validate::batch_validated(stats.valid_rows, stats.invalid_rows, stats.duplicate_rows);

        self.report_output
            .write_report(&outcome)
            .await
            .context("Failed to write import report")?;

        let commit = self.commit(&outcome).await?;
        Ok(ImportRun { outcome, commit })
    }

    async fn commit(&self, outcome: &ImportOutcome) -> Result<CommitStatus> {
        if !outcome.can_commit() {
            warn!(
                batch_id = %outcome.batch_id,
                total = outcome.statistics.total_rows,
                "No valid records; commit blocked"
            );
            metrics::import::batch_blocked();
            self.case_package
                .discard()
                .await
                .context("Failed to discard stale case package")?;
            return Ok(CommitStatus::Blocked);
        }

        let accepted: Vec<NormalizedRecord> = outcome.accepted().map(|r| r.record().clone()).collect();
        self.case_package
            .commit(&outcome.batch_id, &accepted, &outcome.statistics)
            .await
            .context("Failed to create case package")?;

        metrics::import::batch_committed(outcome.statistics.total_amount);
        info!(
            batch_id = %outcome.batch_id,
            records = accepted.len(),
            "Accepted records committed"
        );
        Ok(CommitStatus::Committed {
            records: accepted.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CellValue, ImportStatistics, RawRow};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockRowSource {
        rows: Option<Vec<RawRow>>,
    }

    #[async_trait]
    impl RowSource for MockRowSource {
        async fn read_rows(&self) -> crate::error::Result<Vec<RawRow>> {
            match &self.rows {
                Some(rows) => Ok(rows.clone()),
                None => Err(ImportError::Ingestion("header row is missing".to_string())),
            }
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }

    struct MockReportOutput {
        pub reports: Arc<Mutex<Vec<ImportOutcome>>>,
    }

    impl MockReportOutput {
        fn new() -> Self {
            Self {
                reports: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ReportOutputPort for MockReportOutput {
        async fn write_report(&self, outcome: &ImportOutcome) -> Result<()> {
            self.reports.lock().await.push(outcome.clone());
            Ok(())
        }
    }

    struct MockCasePackage {
        pub commits: Arc<Mutex<Vec<(String, Vec<NormalizedRecord>, ImportStatistics)>>>,
        pub discards: Arc<Mutex<usize>>,
    }

    impl MockCasePackage {
        fn new() -> Self {
            Self {
                commits: Arc::new(Mutex::new(Vec::new())),
                discards: Arc::new(Mutex::new(0)),
            }
        }
    }

    #[async_trait]
    impl CasePackagePort for MockCasePackage {
        async fn commit(
            &self,
            batch_id: &str,
            records: &[NormalizedRecord],
            statistics: &ImportStatistics,
        ) -> Result<()> {
            self.commits
                .lock()
                .await
                .push((batch_id.to_string(), records.to_vec(), statistics.clone()));
            Ok(())
        }

        async fn discard(&self) -> Result<()> {
            *self.discards.lock().await += 1;
            Ok(())
        }
    }

    fn row(index: usize, id: &str, contract: &str, loan: f64, remaining: f64) -> RawRow {
        RawRow::new(
            index,
            vec![
                ("customer name*".to_string(), CellValue::from("Li Si")),
                ("id number*".to_string(), CellValue::from(id)),
                ("loan contract no.*".to_string(), CellValue::from(contract)),
                ("loan amount*".to_string(), CellValue::Number(loan)),
                ("remaining balance*".to_string(), CellValue::Number(remaining)),
                ("overdue days*".to_string(), CellValue::Number(45.0)),
            ],
        )
    }

    fn use_case(rows: Option<Vec<RawRow>>) -> (ImportUseCase, MockHandles) {
        let report = MockReportOutput::new();
        let package = MockCasePackage::new();
        let handles = MockHandles {
            reports: report.reports.clone(),
            commits: package.commits.clone(),
            discards: package.discards.clone(),
        };
        let use_case = ImportUseCase::with_default_pipeline(
            Box::new(MockRowSource { rows }),
            Box::new(report),
            Box::new(package),
        );
        (use_case, handles)
    }

    struct MockHandles {
        reports: Arc<Mutex<Vec<ImportOutcome>>>,
        commits: Arc<Mutex<Vec<(String, Vec<NormalizedRecord>, ImportStatistics)>>>,
        discards: Arc<Mutex<usize>>,
    }

    #[tokio::test]
    async fn test_valid_rows_are_reported_and_committed() {
        let rows = vec![
            row(2, "110101199003071234", "C1", 50000.0, 45000.0),
            row(3, "44030419851231002X", "C2", 20000.0, 30000.0),
        ];
        let (use_case, handles) = use_case(Some(rows));

        let run = use_case.execute().await.unwrap();
        assert_eq!(run.commit, CommitStatus::Committed { records: 1 });

        let reports = handles.reports.lock().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].records.len(), 2);

        let commits = handles.commits.lock().await;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].0, run.outcome.batch_id);
        assert_eq!(commits[0].1.len(), 1);
        assert_eq!(commits[0].1[0].contract_no.as_deref(), Some("C1"));
        assert_eq!(commits[0].2.valid_rows, 1);
        assert_eq!(*handles.discards.lock().await, 0);
    }

    #[tokio::test]
    async fn test_commit_blocked_without_valid_rows() {
        let rows = vec![row(2, "bad-id", "C1", 1000.0, 500.0)];
        let (use_case, handles) = use_case(Some(rows));

        let run = use_case.execute().await.unwrap();
        assert_eq!(run.commit, CommitStatus::Blocked);
        assert_eq!(handles.reports.lock().await.len(), 1);
        assert!(handles.commits.lock().await.is_empty());
        assert_eq!(*handles.discards.lock().await, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_is_allowed_by_default() {
        let (use_case, handles) = use_case(Some(Vec::new()));

        let run = use_case.execute().await.unwrap();
        assert!(run.outcome.records.is_empty());
        assert_eq!(run.outcome.statistics, ImportStatistics::default());
        assert_eq!(run.commit, CommitStatus::Blocked);
        assert!(handles.commits.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_can_be_rejected() {
        let (use_case, handles) = use_case(Some(Vec::new()));
        let use_case = use_case.reject_empty_batch(true);

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ImportError>(), Some(ImportError::EmptyBatch)));
        assert!(handles.reports.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_ingestion_failure_produces_no_records() {
        let (use_case, handles) = use_case(None);

        let err = use_case.execute().await.unwrap_err();
        let import_err = err.downcast_ref::<ImportError>().unwrap();
        assert!(import_err.is_ingestion_failure());
        assert!(handles.reports.lock().await.is_empty());
        assert!(handles.commits.lock().await.is_empty());
    }
}
