//! Pipeline build settings derived from the execution context

use crate::context::ExecutionContext;

/// Logical rewrites applied before lowering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPlanOptimizationSettings {
    pub optimize_plan: bool,
    pub merge_expressions: bool,
    pub push_down_limit: bool,
    /// Rewrites stop silently once this many were applied
    pub max_optimizations_to_apply: usize,
}

impl QueryPlanOptimizationSettings {
    pub fn from_context(context: &ExecutionContext) -> Self {
        let settings = context.settings();
        Self {
            optimize_plan: settings.query_plan_enable_optimizations,
            merge_expressions: settings.query_plan_merge_expressions,
            push_down_limit: settings.query_plan_push_down_limit,
            max_optimizations_to_apply: settings.query_plan_max_optimizations_to_apply,
        }
    }
}

/// Physical shape of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildQueryPipelineSettings {
    pub max_threads: usize,
    pub max_block_size: u64,
}

impl BuildQueryPipelineSettings {
    pub fn from_context(context: &ExecutionContext) -> Self {
        let settings = context.settings();
        Self {
            max_threads: settings.max_threads.max(1),
            max_block_size: settings.max_block_size,
        }
    }
}
