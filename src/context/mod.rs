//! Execution context and its derivation for sub-queries

mod derive;
mod execution;
mod scalar;
mod settings;

pub use derive::derive_context;
pub use execution::{ClusterInfo, ExecutionContext, SessionInfo, SharedState};
pub use scalar::{SpecialScalar, SHARD_COUNT, SHARD_NUM};
pub use settings::Settings;
