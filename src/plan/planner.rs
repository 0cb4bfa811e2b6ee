//! Lazy, memoized plan construction
//!
//! State machine:
//!
//! ```text
//! NotBuilt --build_query_plan_if_needed--> Built --extract_query_plan--> Extracted
//! ```
//!
//! `Extracted` is terminal. Storage limits added while `NotBuilt` are
//! held back and applied when the plan is built.

use std::mem;

use crate::context::ExecutionContext;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::observability::Event;
use crate::options::SelectQueryOptions;
use crate::query_tree::QueryTree;

use super::lowering::build_plan;
use super::query_plan::{QueryPlan, StorageLimits};

/// Planner view of the query options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfiguration {
    /// Recorded in the plan for the pipeline builder
    pub only_analyze: bool,
}

impl From<&SelectQueryOptions> for PlannerConfiguration {
    fn from(options: &SelectQueryOptions) -> Self {
        Self {
            only_analyze: options.only_analyze,
        }
    }
}

#[derive(Debug)]
enum PlanState {
    NotBuilt,
    Built(QueryPlan),
    Extracted,
}

/// Owns the analyzed query tree and the plan derived from it
#[derive(Debug)]
pub struct Planner {
    query_tree: QueryTree,
    options: SelectQueryOptions,
    configuration: PlannerConfiguration,
    context: ExecutionContext,
    state: PlanState,
    pending_limits: Vec<StorageLimits>,
}

impl Planner {
    /// Does not build the plan
    pub fn new(
        query_tree: QueryTree,
        options: SelectQueryOptions,
        configuration: PlannerConfiguration,
        context: ExecutionContext,
    ) -> Self {
        Self {
            query_tree,
            options,
            configuration,
            context,
            state: PlanState::NotBuilt,
            pending_limits: Vec::new(),
        }
    }

    pub fn query_tree(&self) -> &QueryTree {
        &self.query_tree
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, PlanState::Built(_))
    }

    /// Builds the plan on first call; later calls are no-ops
    pub fn build_query_plan_if_needed(&mut self) -> AnalyzerResult<()> {
        match self.state {
            PlanState::Built(_) => return Ok(()),
            PlanState::Extracted => return Err(AnalyzerError::PlanAlreadyExtracted),
            PlanState::NotBuilt => {}
        }

        let mut plan = build_plan(&self.query_tree, self.options.to_stage);
        plan.set_only_analyze(self.configuration.only_analyze);

        if let Some(limits) = StorageLimits::from_settings(self.context.settings()) {
            plan.add_storage_limits(limits);
        }
        for limits in self.pending_limits.drain(..) {
            plan.add_storage_limits(limits);
        }

        self.context.metrics().increment_plans_built();
        let plan_id = plan.id().to_string();
        let steps = plan.step_count().to_string();
        self.context.log_event(
            Event::PlanBuilt,
            &[
                ("plan_id", &plan_id),
                ("steps", &steps),
                ("stage", self.options.to_stage.as_str()),
            ],
        );

        self.state = PlanState::Built(plan);
        Ok(())
    }

    /// Requires a built plan
    pub fn query_plan(&self) -> AnalyzerResult<&QueryPlan> {
        match &self.state {
            PlanState::Built(plan) => Ok(plan),
            PlanState::NotBuilt => Err(AnalyzerError::PlanNotBuilt),
            PlanState::Extracted => Err(AnalyzerError::PlanAlreadyExtracted),
        }
    }

    /// Moves the plan out; the planner cannot hand out a plan afterwards
    pub fn extract_query_plan(&mut self) -> AnalyzerResult<QueryPlan> {
        match mem::replace(&mut self.state, PlanState::Extracted) {
            PlanState::Built(plan) => {
                self.context.metrics().increment_plans_extracted();
                let plan_id = plan.id().to_string();
                self.context
                    .log_event(Event::PlanExtracted, &[("plan_id", &plan_id)]);
                Ok(plan)
            }
            PlanState::NotBuilt => {
                self.state = PlanState::NotBuilt;
                Err(AnalyzerError::PlanNotBuilt)
            }
            PlanState::Extracted => Err(AnalyzerError::PlanAlreadyExtracted),
        }
    }

    /// Applies `limits` to the plan whether or not it is built yet
    pub fn add_storage_limits(&mut self, limits: Vec<StorageLimits>) -> AnalyzerResult<()> {
        let count = limits.len().to_string();
        match &mut self.state {
            PlanState::NotBuilt => self.pending_limits.extend(limits),
            PlanState::Built(plan) => {
                for limit in limits {
                    plan.add_storage_limits(limit);
                }
            }
            PlanState::Extracted => return Err(AnalyzerError::PlanAlreadyExtracted),
        }
        self.context
            .log_event(Event::StorageLimitsAdded, &[("count", &count)]);
        Ok(())
    }
}
