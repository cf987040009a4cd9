pub mod engine;
pub mod pipeline;
pub mod reconciler;

pub use crate::domain::model::{RosterPair, SyncPlan};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
