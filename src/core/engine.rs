use crate::core::Pipeline;
use crate::domain::model::SyncSummary;
use crate::utils::error::Result;

/// What a run produced. `destination` is `None` for dry runs.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub summary: SyncSummary,
    pub destination: Option<String>,
}

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
    dry_run: bool,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<SyncReport> {
        tracing::info!("Starting staff reconciliation");

        // Extract
        let rosters = self.pipeline.extract().await?;

        // Transform
        let plan = self.pipeline.transform(rosters).await?;
        let summary = plan.summary.clone();

        if self.dry_run {
            tracing::info!(
                "🔍 Dry run: {} changes computed, nothing written",
                summary.total_changes()
            );
            return Ok(SyncReport {
                summary,
                destination: None,
            });
        }

        // Load
        let destination = self.pipeline.load(plan).await?;
        tracing::info!("📁 Wrote {} changes to {}", summary.total_changes(), destination);

        Ok(SyncReport {
            summary,
            destination: Some(destination),
        })
    }
}
