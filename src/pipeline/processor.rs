//! Physical pipeline

use std::fmt::Write as _;
use std::sync::Arc;

use uuid::Uuid;

use crate::plan::StorageLimits;
use crate::quota::Quota;
use crate::types::Block;

/// One physical operator, replicated over `streams` parallel streams
#[derive(Debug, Clone, PartialEq)]
pub struct Processor {
    pub name: &'static str,
    pub description: String,
    pub streams: usize,
    /// Ceilings checked by sources
    pub limits: Vec<StorageLimits>,
}

impl Processor {
    pub fn new(name: &'static str, description: impl Into<String>, streams: usize) -> Self {
        Self {
            name,
            description: description.into(),
            streams,
            limits: Vec::new(),
        }
    }

    /// True for processors that start a stream (storage reads, constant and null sources)
    pub fn is_source(&self) -> bool {
        matches!(self.name, "ReadFromStorage" | "SourceFromSingleChunk" | "NullSource")
    }
}

/// Executable pipeline lowered from a logical plan.
///
/// Processors are stored sources first. A fresh pipeline is produced by
/// every build call.
#[derive(Debug)]
pub struct QueryPipeline {
    plan_id: Uuid,
    processors: Vec<Processor>,
    header: Block,
    num_threads: usize,
    max_block_size: u64,
    quota: Option<Arc<Quota>>,
}

impl QueryPipeline {
    pub(crate) fn new(
        plan_id: Uuid,
        processors: Vec<Processor>,
        header: Block,
        num_threads: usize,
        max_block_size: u64,
    ) -> Self {
        Self {
            plan_id,
            processors,
            header,
            num_threads,
            max_block_size,
            quota: None,
        }
    }

    /// Plan this pipeline was lowered from
    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    /// Processors, sources first
    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    /// Header of the final output stream
    pub fn header(&self) -> &Block {
        &self.header
    }

    /// Threads the runtime may use to drive the pipeline
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Rows per block produced by sources
    pub fn max_block_size(&self) -> u64 {
        self.max_block_size
    }

    /// Attaches `quota`, charging it one query
    pub fn set_quota(&mut self, quota: Arc<Quota>) {
        quota.register_query();
        self.quota = Some(quota);
    }

    /// Attached quota; `None` for partial stages and ignored quotas
    pub fn quota(&self) -> Option<&Arc<Quota>> {
        self.quota.as_ref()
    }

    /// Processors from output to sources, with stream counts
    pub fn explain(&self) -> String {
        let mut out = String::new();
        for processor in self.processors.iter().rev() {
            let _ = write!(out, "{}", processor.name);
            if !processor.description.is_empty() {
                let _ = write!(out, " ({})", processor.description);
            }
            let _ = write!(out, " x {}", processor.streams);
            if !processor.limits.is_empty() {
                let _ = write!(out, " [limits: {}]", processor.limits.len());
            }
            out.push('\n');
        }
        out
    }
}
