use async_trait::async_trait;

use crate::domain::{ImportStatistics, NormalizedRecord, RawRow};
use crate::pipeline::ImportOutcome;

/// Supplies the data rows of one spreadsheet, header already mapped onto
/// each row and sheet row numbers preserved.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn read_rows(&self) -> crate::error::Result<Vec<RawRow>>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Receives the full annotated record list for display
#[async_trait]
pub trait ReportOutputPort: Send + Sync {
    async fn write_report(&self, outcome: &ImportOutcome) -> anyhow::Result<()>;
}

/// Downstream case-package creation. Only ever called with accepted records.
#[async_trait]
pub trait CasePackagePort: Send + Sync {
    async fn commit(
        &self,
        batch_id: &str,
        records: &[NormalizedRecord],
        statistics: &ImportStatistics,
    ) -> anyhow::Result<()>;

    /// Drop whatever an earlier batch left downstream, so a blocked run
    /// never sits next to a stale package.
    async fn discard(&self) -> anyhow::Result<()>;
}
