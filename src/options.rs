//! Per-query options for SELECT analysis

use std::fmt;

use serde::{Deserialize, Serialize};

/// How far a query is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryProcessingStage {
    /// Only read columns from storage
    FetchColumns,
    /// Everything that can run on a shard before merging
    WithMergeableState,
    /// Final result
    #[default]
    Complete,
}

impl QueryProcessingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryProcessingStage::FetchColumns => "FetchColumns",
            QueryProcessingStage::WithMergeableState => "WithMergeableState",
            QueryProcessingStage::Complete => "Complete",
        }
    }
}

impl fmt::Display for QueryProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable configuration of one SELECT compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectQueryOptions {
    /// Shard number exposed as `_shard_num`
    #[serde(default)]
    pub shard_num: Option<u32>,
    /// Shard count exposed as `_shard_count`
    #[serde(default)]
    pub shard_count: Option<u32>,
    /// Only the result header is needed
    #[serde(default)]
    pub only_analyze: bool,
    /// Run only the mandatory normalization pass
    #[serde(default)]
    pub ignore_ast_optimizations: bool,
    /// Never attach the quota
    #[serde(default)]
    pub ignore_quota: bool,
    #[serde(default)]
    pub to_stage: QueryProcessingStage,
}

impl SelectQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: QueryProcessingStage) -> Self {
        self.to_stage = stage;
        self
    }

    pub fn analyze(mut self, only_analyze: bool) -> Self {
        self.only_analyze = only_analyze;
        self
    }

    pub fn ignore_ast_optimizations(mut self, value: bool) -> Self {
        self.ignore_ast_optimizations = value;
        self
    }

    pub fn ignore_quota(mut self, value: bool) -> Self {
        self.ignore_quota = value;
        self
    }

    /// Sets both shard identity values
    pub fn set_shard_info(mut self, shard_num: u32, shard_count: u32) -> Self {
        self.shard_num = Some(shard_num);
        self.shard_count = Some(shard_count);
        self
    }

    /// True when the quota must be attached to the executed pipeline
    pub fn attaches_quota(&self) -> bool {
        !self.ignore_quota && self.to_stage == QueryProcessingStage::Complete
    }
}
