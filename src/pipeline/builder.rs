//! Logical plan to physical pipeline
//!
//! - Sources are replicated over `max_threads` streams and carry every
//!   storage limit of the plan
//! - An analysis-only plan reads from `NullSource` instead of storage
//! - `Limit` and `Distinct` first resize their input to one stream
//! - `Union` concatenates the inputs and resizes down to `max_threads`

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::plan::{PlanNode, PlanStep, QueryPlan, StorageLimits};

use super::optimize::optimize_plan;
use super::processor::{Processor, QueryPipeline};
use super::settings::{BuildQueryPipelineSettings, QueryPlanOptimizationSettings};

/// Lowers a built logical plan. Never memoized: every call returns a new
/// pipeline.
pub trait PipelineBuilder: Send + Sync {
    fn build(
        &self,
        plan: &QueryPlan,
        optimization: &QueryPlanOptimizationSettings,
        build: &BuildQueryPipelineSettings,
    ) -> AnalyzerResult<QueryPipeline>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPipelineBuilder;

impl PipelineBuilder for DefaultPipelineBuilder {
    fn build(
        &self,
        plan: &QueryPlan,
        optimization: &QueryPlanOptimizationSettings,
        build: &BuildQueryPipelineSettings,
    ) -> AnalyzerResult<QueryPipeline> {
        // Rewrites stay local to this build; the logical plan is untouched
        let mut optimized = plan.clone();
        optimize_plan(&mut optimized, optimization);

        let root = optimized
            .root()
            .ok_or_else(|| AnalyzerError::pipeline("Query plan is empty"))?;

        let mut lowering = Lowering {
            settings: build,
            limits: plan.storage_limits(),
            only_analyze: plan.only_analyze(),
            processors: Vec::new(),
        };
        lowering.lower(root);

        Ok(QueryPipeline::new(
            plan.id(),
            lowering.processors,
            plan.header(),
            build.max_threads,
            build.max_block_size,
        ))
    }
}

struct Lowering<'a> {
    settings: &'a BuildQueryPipelineSettings,
    limits: &'a [StorageLimits],
    only_analyze: bool,
    processors: Vec<Processor>,
}

impl Lowering<'_> {
    /// Appends the processors of `node` and returns its output stream count
    fn lower(&mut self, node: &PlanNode) -> usize {
        let inputs: Vec<usize> = node.children.iter().map(|child| self.lower(child)).collect();
        let input = inputs.iter().sum::<usize>().max(1);

        match &node.step {
            PlanStep::ReadFromStorage { .. } => self.source("ReadFromStorage", node, self.settings.max_threads),
            PlanStep::ReadOne { .. } => self.source("SourceFromSingleChunk", node, 1),
            PlanStep::Filter { .. } => self.transform("FilterTransform", node, input),
            PlanStep::Expression { .. } => self.transform("ExpressionTransform", node, input),
            PlanStep::Limit { .. } => {
                self.resize(input, 1);
                self.transform("LimitTransform", node, 1)
            }
            PlanStep::Distinct { .. } => {
                self.resize(input, 1);
                self.transform("DistinctTransform", node, 1)
            }
            PlanStep::Union { .. } => {
                let target = input.min(self.settings.max_threads);
                self.resize(input, target);
                target
            }
        }
    }

    fn source(&mut self, name: &'static str, node: &PlanNode, streams: usize) -> usize {
        let name = if self.only_analyze { "NullSource" } else { name };
        let mut processor = Processor::new(name, node.step.detail(), streams);
        processor.limits = self.limits.to_vec();
        self.processors.push(processor);
        streams
    }

    fn transform(&mut self, name: &'static str, node: &PlanNode, streams: usize) -> usize {
        self.processors
            .push(Processor::new(name, node.step.detail(), streams));
        streams
    }

    fn resize(&mut self, from: usize, to: usize) {
        if from != to {
            self.processors
                .push(Processor::new("Resize", format!("{} -> {}", from, to), to));
        }
    }
}
