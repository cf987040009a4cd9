use crate::domain::model::{MatchRules, OutputTarget, RosterPair, SyncPlan};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        target: &OutputTarget,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn authoritative_file(&self) -> &Path;
    fn target_file(&self) -> &Path;
    fn output(&self) -> &OutputTarget;
    fn key_column(&self) -> &str;
    fn rules(&self) -> &MatchRules;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RosterPair>;
    async fn transform(&self, rosters: RosterPair) -> Result<SyncPlan>;
    async fn load(&self, plan: SyncPlan) -> Result<String>;
}
