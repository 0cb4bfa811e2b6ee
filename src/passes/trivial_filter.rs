//! Simplifies WHERE clauses that are constant
//!
//! - `WHERE true` is dropped
//! - `WHERE false` and `WHERE NULL` keep a `false` filter and get `LIMIT 0`
//!
//! The filter stays because partial stages plan no `Limit` step; without it
//! a shard would return every row.

use crate::context::ExecutionContext;
use crate::error::AnalyzerResult;
use crate::query_tree::{ExprNode, QueryTree};
use crate::types::Value;

use super::manager::QueryTreePass;
use super::walk::for_each_query;

#[derive(Debug, Default)]
pub struct RemoveTrivialFilterPass;

impl QueryTreePass for RemoveTrivialFilterPass {
    fn name(&self) -> &str {
        "RemoveTrivialFilter"
    }

    fn description(&self) -> &str {
        "Drop true WHERE clauses, reduce false ones to LIMIT 0"
    }

    fn run(&self, tree: &mut QueryTree, _context: &ExecutionContext) -> AnalyzerResult<()> {
        for_each_query(tree, &mut |query| {
            let Some(value) = query.where_expr.as_ref().and_then(|e| e.as_constant()) else {
                return Ok(());
            };
            if value.as_filter_flag().unwrap_or(false) {
                query.where_expr = None;
            } else {
                query.where_expr = Some(ExprNode::constant(Value::Bool(false)));
                query.limit = Some(0);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_tree::{ProjectionColumn, QueryNode, TableNode};
    use crate::types::DataType;

    fn filtered(predicate: ExprNode) -> QueryTree {
        QueryTree::Query(QueryNode {
            projection: vec![ProjectionColumn::new("x", ExprNode::column("x", DataType::UInt8))],
            from: TableNode::One,
            where_expr: Some(predicate),
            limit: Some(10),
            is_subquery: false,
        })
    }

    fn node(tree: &QueryTree) -> &QueryNode {
        match tree {
            QueryTree::Query(query) => query,
            QueryTree::Union(_) => panic!("expected query"),
        }
    }

    #[test]
    fn test_true_filter_removed() {
        let mut tree = filtered(ExprNode::constant(Value::Bool(true)));
        RemoveTrivialFilterPass.run(&mut tree, &ExecutionContext::empty()).unwrap();

        assert!(node(&tree).where_expr.is_none());
        assert_eq!(node(&tree).limit, Some(10));
    }

    #[test]
    fn test_false_and_null_filters_keep_false_filter() {
        for value in [Value::Bool(false), Value::Null, Value::UInt(0)] {
            let mut tree = filtered(ExprNode::constant(value));
            RemoveTrivialFilterPass.run(&mut tree, &ExecutionContext::empty()).unwrap();

            let predicate = node(&tree).where_expr.as_ref().unwrap();
            assert_eq!(predicate.as_constant(), Some(&Value::Bool(false)));
            assert_eq!(node(&tree).limit, Some(0));
        }
    }

    #[test]
    fn test_column_filter_kept() {
        let mut tree = filtered(ExprNode::column("x", DataType::UInt8));
        RemoveTrivialFilterPass.run(&mut tree, &ExecutionContext::empty()).unwrap();
        assert!(node(&tree).where_expr.is_some());
    }
}
