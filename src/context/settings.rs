//! Query settings carried by an execution context

use serde::{Deserialize, Serialize};

/// Settings copied into every derived context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Parallel streams used when reading from storage
    pub max_threads: usize,
    /// Rows per block handed between processors
    pub max_block_size: u64,
    /// Master switch for logical plan rewrites during pipeline build
    pub query_plan_enable_optimizations: bool,
    /// Merge adjacent `Expression` steps
    pub query_plan_merge_expressions: bool,
    /// Move `Limit` below `Expression` steps
    pub query_plan_push_down_limit: bool,
    /// Rewrites applied per build before optimization stops
    pub query_plan_max_optimizations_to_apply: usize,
    /// Default row ceiling applied to every plan
    pub max_rows_to_read: Option<u64>,
    /// Default byte ceiling applied to every plan
    pub max_bytes_to_read: Option<u64>,
    /// Default wall clock ceiling, in milliseconds
    pub max_execution_time_ms: Option<u64>,
    /// When false only failures are logged
    pub log_queries: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_threads: 4,
            max_block_size: 65409,
            query_plan_enable_optimizations: true,
            query_plan_merge_expressions: true,
            query_plan_push_down_limit: true,
            query_plan_max_optimizations_to_apply: 10000,
            max_rows_to_read: None,
            max_bytes_to_read: None,
            max_execution_time_ms: None,
            log_queries: true,
        }
    }
}
