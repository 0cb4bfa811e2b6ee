//! Splices nested unions of the same mode into their parent

use crate::context::ExecutionContext;
use crate::error::AnalyzerResult;
use crate::query_tree::QueryTree;

use super::manager::QueryTreePass;
use super::walk::for_each_union;

#[derive(Debug, Default)]
pub struct UnionFlatteningPass;

impl QueryTreePass for UnionFlatteningPass {
    fn name(&self) -> &str {
        "UnionFlattening"
    }

    fn description(&self) -> &str {
        "Merge nested unions with the same mode"
    }

    fn run(&self, tree: &mut QueryTree, _context: &ExecutionContext) -> AnalyzerResult<()> {
        for_each_union(tree, &mut |union| {
            let mode = union.mode;
            let members = std::mem::take(&mut union.queries);
            for member in members {
                match member {
                    QueryTree::Union(nested) if nested.mode == mode => {
                        union.queries.extend(nested.queries);
                    }
                    other => union.queries.push(other),
                }
            }
        });
        Ok(())
    }
}
