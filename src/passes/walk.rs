//! Post-order traversal helpers shared by passes

use crate::error::AnalyzerResult;
use crate::query_tree::{QueryNode, QueryTree, TableNode, UnionNode};

/// Visits every SELECT, inner sources before the query reading them
pub(crate) fn for_each_query(
    tree: &mut QueryTree,
    f: &mut dyn FnMut(&mut QueryNode) -> AnalyzerResult<()>,
) -> AnalyzerResult<()> {
    match tree {
        QueryTree::Query(query) => {
            if let TableNode::Subquery(source) = &mut query.from {
                for_each_query(source, f)?;
            }
            f(query)
        }
        QueryTree::Union(union) => {
            for member in &mut union.queries {
                for_each_query(member, f)?;
            }
            Ok(())
        }
    }
}

/// Visits every UNION, nested unions before the enclosing one
pub(crate) fn for_each_union(tree: &mut QueryTree, f: &mut dyn FnMut(&mut UnionNode)) {
    match tree {
        QueryTree::Query(query) => {
            if let TableNode::Subquery(source) = &mut query.from {
                for_each_union(source, f);
            }
        }
        QueryTree::Union(union) => {
            for member in &mut union.queries {
                for_each_union(member, f);
            }
            f(union);
        }
    }
}
