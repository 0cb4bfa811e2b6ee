//! SELECT interpreter
//!
//! Construction from a syntax tree:
//! 1. Validate the top level node (a subquery is unwrapped)
//! 2. Derive the query context from the caller's context and options
//! 3. Build the query tree
//! 4. Run the pass catalog (only the mandatory pass when AST
//!    optimizations are ignored)
//! 5. Hand the tree to a planner
//!
//! Construction from a query tree skips 1, 3 and 4.
//!
//! The plan is built lazily by the first operation that needs it and
//! reused afterwards. Every pipeline build lowers that plan afresh.

use std::sync::Arc;

use crate::analyzer::normalize_and_validate;
use crate::ast::SyntaxTree;
use crate::context::{derive_context, ExecutionContext};
use crate::error::AnalyzerResult;
use crate::observability::{Event, ObservationScope};
use crate::options::SelectQueryOptions;
use crate::passes::MANDATORY_PASS_COUNT;
use crate::pipeline::{
    BuildQueryPipelineSettings, PipelineBuilder, QueryPipeline, QueryPlanOptimizationSettings,
};
use crate::plan::{Planner, PlannerConfiguration, QueryPlan, StorageLimits};
use crate::query_tree::QueryTree;
use crate::types::Block;

use super::components::AnalyzerComponents;
use super::result::QueryResult;

/// Compiles one SELECT. Single owner, not shared between threads.
pub struct SelectInterpreter {
    query: SyntaxTree,
    context: ExecutionContext,
    options: SelectQueryOptions,
    planner: Planner,
    pipeline_builder: Arc<dyn PipelineBuilder>,
}

impl SelectInterpreter {
    pub fn new(
        query: &SyntaxTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
    ) -> AnalyzerResult<Self> {
        Self::with_components(query, context, options, AnalyzerComponents::default())
    }

    pub fn with_components(
        query: &SyntaxTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
        components: AnalyzerComponents,
    ) -> AnalyzerResult<Self> {
        observe(context, "syntax_tree", || {
            let query = normalize_and_validate(query)?.clone();
            let context = derive_context(context, &options);
            let query_tree = build_query_tree_and_run_passes(&query, &options, &context, &components)?;
            Ok(Self::assemble(query, context, options, query_tree, components))
        })
    }

    /// Takes an already analyzed tree; passes are not run again
    pub fn from_query_tree(
        query_tree: QueryTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
    ) -> AnalyzerResult<Self> {
        Self::from_query_tree_with_components(
            query_tree,
            context,
            options,
            AnalyzerComponents::default(),
        )
    }

    pub fn from_query_tree_with_components(
        query_tree: QueryTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
        components: AnalyzerComponents,
    ) -> AnalyzerResult<Self> {
        observe(context, "query_tree", || {
            let query = query_tree.to_ast();
            let context = derive_context(context, &options);
            Ok(Self::assemble(query, context, options, query_tree, components))
        })
    }

    fn assemble(
        query: SyntaxTree,
        context: ExecutionContext,
        options: SelectQueryOptions,
        query_tree: QueryTree,
        components: AnalyzerComponents,
    ) -> Self {
        let planner = Planner::new(
            query_tree,
            options,
            PlannerConfiguration::from(&options),
            context.clone(),
        );
        Self {
            query,
            context,
            options,
            planner,
            pipeline_builder: components.pipeline_builder,
        }
    }

    /// Result header of `query`, analyzed without building a pipeline
    pub fn sample_block_for(
        query: &SyntaxTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
    ) -> AnalyzerResult<Block> {
        Self::new(query, context, options.analyze(true))?.sample_block()
    }

    /// Result header of an analyzed tree
    pub fn sample_block_for_tree(
        query_tree: QueryTree,
        context: &ExecutionContext,
        options: SelectQueryOptions,
    ) -> AnalyzerResult<Block> {
        Self::from_query_tree(query_tree, context, options.analyze(true))?.sample_block()
    }

    /// Header of the plan's output stream. Never builds a pipeline.
    pub fn sample_block(&mut self) -> AnalyzerResult<Block> {
        Ok(self.query_plan()?.header())
    }

    /// Logical plan, built on first access
    pub fn query_plan(&mut self) -> AnalyzerResult<&QueryPlan> {
        self.planner.build_query_plan_if_needed()?;
        self.planner.query_plan()
    }

    pub fn explain_plan(&mut self) -> AnalyzerResult<String> {
        Ok(self.query_plan()?.explain())
    }

    /// Lowers the plan into a new pipeline
    pub fn build_query_pipeline(&mut self) -> AnalyzerResult<QueryPipeline> {
        self.planner.build_query_plan_if_needed()?;
        let plan = self.planner.query_plan()?;

        let optimization = QueryPlanOptimizationSettings::from_context(&self.context);
        let build = BuildQueryPipelineSettings::from_context(&self.context);
        let pipeline = self.pipeline_builder.build(plan, &optimization, &build)?;

        self.context.metrics().increment_pipelines_built();
        let plan_id = plan.id().to_string();
        let processors = pipeline.processors().len().to_string();
        self.context.log_event(
            Event::PipelineBuilt,
            &[("plan_id", &plan_id), ("processors", &processors)],
        );
        Ok(pipeline)
    }

    /// Builds a pipeline and attaches the session quota to full executions
    pub fn execute(&mut self) -> AnalyzerResult<QueryResult> {
        let mut pipeline = self.build_query_pipeline()?;

        if self.options.attaches_quota() {
            let quota = self.context.quota();
            self.context
                .log_event(Event::QuotaAttached, &[("quota", quota.name())]);
            pipeline.set_quota(quota);
            self.context.metrics().increment_quotas_attached();
        }
        Ok(QueryResult::new(pipeline))
    }

    /// Moves the plan out. Afterwards no plan or pipeline can be produced.
    pub fn extract_query_plan(&mut self) -> AnalyzerResult<QueryPlan> {
        self.planner.build_query_plan_if_needed()?;
        self.planner.extract_query_plan()
    }

    pub fn add_storage_limits(&mut self, limits: Vec<StorageLimits>) -> AnalyzerResult<()> {
        self.planner.add_storage_limits(limits)
    }

    /// The compiled syntax tree; rebuilt from the tree for interpreters
    /// constructed from a query tree
    pub fn query(&self) -> &SyntaxTree {
        &self.query
    }

    /// Derived context of this query
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn query_tree(&self) -> &QueryTree {
        self.planner.query_tree()
    }

    pub fn options(&self) -> &SelectQueryOptions {
        &self.options
    }
}

impl std::fmt::Debug for SelectInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectInterpreter")
            .field("query", &self.query.to_string())
            .field("options", &self.options)
            .field("planner", &self.planner)
            .finish_non_exhaustive()
    }
}

fn build_query_tree_and_run_passes(
    query: &SyntaxTree,
    options: &SelectQueryOptions,
    context: &ExecutionContext,
    components: &AnalyzerComponents,
) -> AnalyzerResult<QueryTree> {
    let mut query_tree = components.query_tree_builder.build(query, context)?;
    let header = query_tree.header().to_string();
    context.log_event(Event::QueryTreeBuilt, &[("header", &header)]);

    let pass_manager = components.pass_manager();
    if options.ignore_ast_optimizations {
        pass_manager.run_up_to(&mut query_tree, context, MANDATORY_PASS_COUNT)?;
    } else {
        pass_manager.run(&mut query_tree, context)?;
    }
    Ok(query_tree)
}

/// Wraps interpreter construction in a `QUERY_ANALYSIS` scope
fn observe<T>(
    context: &ExecutionContext,
    source: &str,
    analyze: impl FnOnce() -> AnalyzerResult<T>,
) -> AnalyzerResult<T> {
    let scope = ObservationScope::with_fields(
        "QUERY_ANALYSIS",
        context.settings().log_queries,
        vec![
            ("query_id", context.query_id().to_string()),
            ("source", source.to_string()),
        ],
    );

    match analyze() {
        Ok(value) => {
            context.metrics().increment_queries_analyzed();
            scope.complete();
            Ok(value)
        }
        Err(err) => {
            context.metrics().increment_queries_rejected();
            scope.fail(err.code(), &err.to_string());
            Err(err)
        }
    }
}
