//! Pluggable collaborators of the interpreter

use std::sync::Arc;

use crate::analyzer::{DefaultQueryTreeBuilder, QueryTreeBuilder};
use crate::passes::{DefaultPassRegistry, PassManager, PassRegistry};
use crate::pipeline::{DefaultPipelineBuilder, PipelineBuilder};

/// Query tree builder, pass catalog and pipeline builder used by an
/// interpreter. `Default` wires the built-in implementations.
#[derive(Clone)]
pub struct AnalyzerComponents {
    pub query_tree_builder: Arc<dyn QueryTreeBuilder>,
    pub pass_registry: Arc<dyn PassRegistry>,
    pub pipeline_builder: Arc<dyn PipelineBuilder>,
}

impl AnalyzerComponents {
    pub fn with_query_tree_builder(mut self, builder: Arc<dyn QueryTreeBuilder>) -> Self {
        self.query_tree_builder = builder;
        self
    }

    pub fn with_pass_registry(mut self, registry: Arc<dyn PassRegistry>) -> Self {
        self.pass_registry = registry;
        self
    }

    pub fn with_pipeline_builder(mut self, builder: Arc<dyn PipelineBuilder>) -> Self {
        self.pipeline_builder = builder;
        self
    }

    /// Fresh pass manager filled from the registry
    pub fn pass_manager(&self) -> PassManager {
        let mut manager = PassManager::new();
        self.pass_registry.register_passes(&mut manager);
        manager
    }
}

impl Default for AnalyzerComponents {
    fn default() -> Self {
        Self {
            query_tree_builder: Arc::new(DefaultQueryTreeBuilder),
            pass_registry: Arc::new(DefaultPassRegistry),
            pipeline_builder: Arc::new(DefaultPipelineBuilder),
        }
    }
}

impl std::fmt::Debug for AnalyzerComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerComponents")
            .field("passes", &self.pass_manager().pass_names())
            .finish_non_exhaustive()
    }
}
