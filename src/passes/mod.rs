//! Query tree passes
//!
//! Default catalog, in execution order:
//! 1. `QueryAnalysis` (mandatory normalization)
//! 2. `ConstantFolding`
//! 3. `RemoveTrivialFilter`
//! 4. `UnionFlattening`
//!
//! Pass 1 alone leaves the tree ready for planning. Analysis that skips
//! AST optimizations runs only that pass.

mod analysis;
mod constant_folding;
mod manager;
mod trivial_filter;
mod union_flattening;
mod walk;

pub use analysis::QueryAnalysisPass;
pub use constant_folding::ConstantFoldingPass;
pub use manager::{PassManager, QueryTreePass};
pub use trivial_filter::RemoveTrivialFilterPass;
pub use union_flattening::UnionFlatteningPass;

/// Index of the last pass that must run for a plannable tree
pub const MANDATORY_PASS_COUNT: usize = 1;

/// Supplies the ordered pass catalog to a fresh `PassManager`
pub trait PassRegistry: Send + Sync {
    fn register_passes(&self, manager: &mut PassManager);
}

/// Registers the default catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPassRegistry;

impl PassRegistry for DefaultPassRegistry {
    fn register_passes(&self, manager: &mut PassManager) {
        add_query_tree_passes(manager);
    }
}

/// Appends the default catalog to `manager`
pub fn add_query_tree_passes(manager: &mut PassManager) {
    manager.add_pass(Box::new(QueryAnalysisPass));
    manager.add_pass(Box::new(ConstantFoldingPass));
    manager.add_pass(Box::new(RemoveTrivialFilterPass));
    manager.add_pass(Box::new(UnionFlatteningPass));
}
