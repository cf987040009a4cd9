pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::{toml_config::SyncConfig, RunConfig};
pub use core::{engine::SyncEngine, pipeline::StaffSyncPipeline, reconciler::reconcile};
pub use domain::model::{ChangeKind, MatchRules, StaffRecord, StaffRoster, SyncPlan, SyncSummary};
pub use utils::error::{Result, SyncError};
