//! Ordered pass execution
//!
//! Passes are numbered from 1 in registration order. `run` executes all
//! of them; `run_up_to(n)` executes passes `1..=n` and skips the rest.

use std::fmt::Write as _;

use crate::context::ExecutionContext;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::observability::Event;
use crate::query_tree::QueryTree;

/// One rewriting or analysis step over a query tree
pub trait QueryTreePass: Send + Sync {
    /// Stable pass name
    fn name(&self) -> &str;

    /// Human readable summary used by `PassManager::dump`
    fn description(&self) -> &str;

    /// Rewrites `tree` in place
    fn run(&self, tree: &mut QueryTree, context: &ExecutionContext) -> AnalyzerResult<()>;
}

/// Fixed, ordered registry of passes
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn QueryTreePass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pass(&mut self, pass: Box<dyn QueryTreePass>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Runs every pass in order
    pub fn run(&self, tree: &mut QueryTree, context: &ExecutionContext) -> AnalyzerResult<()> {
        self.run_up_to(tree, context, self.passes.len())
    }

    /// Runs passes `1..=up_to`.
    ///
    /// `up_to == 0` runs nothing. An index past the last pass is rejected
    /// before any pass runs.
    pub fn run_up_to(
        &self,
        tree: &mut QueryTree,
        context: &ExecutionContext,
        up_to: usize,
    ) -> AnalyzerResult<()> {
        self.check_index(up_to)?;

        for (index, pass) in self.passes.iter().take(up_to).enumerate() {
            pass.run(tree, context)?;
            context.metrics().increment_passes_executed();

            let position = (index + 1).to_string();
            context.log_event(
                Event::PassExecuted,
                &[("pass", pass.name()), ("index", &position)],
            );
        }
        Ok(())
    }

    /// Numbered list of the passes `1..=up_to`
    pub fn dump(&self, up_to: usize) -> AnalyzerResult<String> {
        self.check_index(up_to)?;

        let mut out = String::new();
        for (index, pass) in self.passes.iter().take(up_to).enumerate() {
            let _ = write!(out, "{}. {}", index + 1, pass.name());
            if !pass.description().is_empty() {
                let _ = write!(out, ": {}", pass.description());
            }
            out.push('\n');
        }
        Ok(out)
    }

    fn check_index(&self, up_to: usize) -> AnalyzerResult<()> {
        if up_to > self.passes.len() {
            return Err(AnalyzerError::PassIndexOutOfRange {
                requested: up_to,
                available: self.passes.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for PassManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassManager")
            .field("passes", &self.pass_names())
            .finish()
    }
}
