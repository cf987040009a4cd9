use crate::adapters::roster_csv::{parse_roster, render_plan, RosterKind};
use crate::core::reconciler::reconcile;
use crate::core::{ConfigProvider, Pipeline, RosterPair, Storage, SyncPlan};
use crate::domain::model::LoadedRoster;
use crate::utils::error::Result;
use std::path::Path;

/// Reads both roster exports, reconciles them and writes the import file.
pub struct StaffSyncPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> StaffSyncPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    async fn load_roster(&self, path: &Path, kind: RosterKind) -> Result<LoadedRoster> {
        tracing::debug!("Reading {} roster from {}", kind.label(), path.display());
        let data = self.storage.read_file(path).await?;
        let loaded = parse_roster(&data, kind, self.config.key_column())?;
        tracing::info!(
            "📥 Loaded {} {} rows from {}",
            loaded.rows_read,
            kind.label(),
            path.display()
        );
        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for StaffSyncPipeline<S, C> {
    async fn extract(&self) -> Result<RosterPair> {
        let authoritative = self
            .load_roster(self.config.authoritative_file(), RosterKind::Authoritative)
            .await?;
        let target = self
            .load_roster(self.config.target_file(), RosterKind::Target)
            .await?;

        Ok(RosterPair {
            authoritative,
            target,
        })
    }

    async fn transform(&self, rosters: RosterPair) -> Result<SyncPlan> {
        reconcile(&rosters, self.config.rules())
    }

    async fn load(&self, plan: SyncPlan) -> Result<String> {
        // 先完整產生輸出，失敗時不留下部分檔案
        let data = render_plan(&plan, self.config.key_column())?;
        let output = self.config.output();

        tracing::debug!("Writing {} rows ({} bytes) to {}", plan.changes.len(), data.len(), output);
        self.storage.write_file(output, &data).await?;

        Ok(output.to_string())
    }
}
