//! Result handle of an executed SELECT

use std::sync::Arc;

use crate::pipeline::QueryPipeline;
use crate::quota::Quota;

/// Pipeline ready for the runtime, with the quota it is charged to
#[derive(Debug)]
pub struct QueryResult {
    pipeline: QueryPipeline,
}

impl QueryResult {
    pub(crate) fn new(pipeline: QueryPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> QueryPipeline {
        self.pipeline
    }

    pub fn quota(&self) -> Option<&Arc<Quota>> {
        self.pipeline.quota()
    }

    pub fn has_quota(&self) -> bool {
        self.pipeline.quota().is_some()
    }
}
