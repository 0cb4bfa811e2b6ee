//! Mandatory normalization pass
//!
//! Leaves the tree valid for planning without optimizing it:
//! - projection names are unique within each SELECT
//! - WHERE has a boolean compatible type

use std::collections::HashSet;

use crate::context::ExecutionContext;
use crate::error::{AnalyzerResult, SemanticError};
use crate::query_tree::{QueryNode, QueryTree};

use super::manager::QueryTreePass;
use super::walk::for_each_query;

#[derive(Debug, Default)]
pub struct QueryAnalysisPass;

impl QueryTreePass for QueryAnalysisPass {
    fn name(&self) -> &str {
        "QueryAnalysis"
    }

    fn description(&self) -> &str {
        "Make projection names unique and check WHERE types"
    }

    fn run(&self, tree: &mut QueryTree, _context: &ExecutionContext) -> AnalyzerResult<()> {
        for_each_query(tree, &mut |query| {
            dedup_projection_names(query);
            check_filter(query)
        })
    }
}

fn dedup_projection_names(query: &mut QueryNode) {
    let mut seen: HashSet<String> = HashSet::new();
    for column in &mut query.projection {
        if seen.insert(column.name.clone()) {
            continue;
        }
        let mut suffix = 1;
        let unique = loop {
            let candidate = format!("{}_{}", column.name, suffix);
            if !seen.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        seen.insert(unique.clone());
        column.name = unique;
    }
}

fn check_filter(query: &QueryNode) -> AnalyzerResult<()> {
    if let Some(predicate) = &query.where_expr {
        if !predicate.data_type().is_filter_compatible() {
            return Err(SemanticError::type_mismatch(format!(
                "Illegal type {} of column {} for filter. Must be UInt8 or Bool",
                predicate.data_type(),
                predicate.column_name()
            ))
            .into());
        }
    }
    Ok(())
}
