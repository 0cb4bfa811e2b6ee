//! Evaluates functions whose arguments are all constants

use crate::analyzer::evaluate_constant;
use crate::context::ExecutionContext;
use crate::error::AnalyzerResult;
use crate::query_tree::{ExprNode, QueryTree};

use super::manager::QueryTreePass;
use super::walk::for_each_query;

#[derive(Debug, Default)]
pub struct ConstantFoldingPass;

impl QueryTreePass for ConstantFoldingPass {
    fn name(&self) -> &str {
        "ConstantFolding"
    }

    fn description(&self) -> &str {
        "Replace constant function calls with their value"
    }

    fn run(&self, tree: &mut QueryTree, _context: &ExecutionContext) -> AnalyzerResult<()> {
        for_each_query(tree, &mut |query| {
            for column in &mut query.projection {
                column.expr = fold(&column.expr);
            }
            query.where_expr = query.where_expr.as_ref().map(fold);
            Ok(())
        })
    }
}

/// Folded constants keep the type the function resolved to
fn fold(expr: &ExprNode) -> ExprNode {
    let ExprNode::Function {
        name,
        arguments,
        result_type,
    } = expr
    else {
        return expr.clone();
    };

    let arguments: Vec<ExprNode> = arguments.iter().map(fold).collect();
    let values: Option<Vec<_>> = arguments.iter().map(|a| a.as_constant().cloned()).collect();

    if let Some(value) = values.and_then(|values| evaluate_constant(name, &values)) {
        return ExprNode::Constant {
            value,
            data_type: result_type.clone(),
            source: None,
        };
    }

    ExprNode::Function {
        name: name.clone(),
        arguments,
        result_type: result_type.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_tree::{ProjectionColumn, QueryNode, TableNode};
    use crate::types::{DataType, Value};

    fn call(name: &str, arguments: Vec<ExprNode>, result_type: DataType) -> ExprNode {
        ExprNode::Function {
            name: name.into(),
            arguments,
            result_type,
        }
    }

    #[test]
    fn test_nested_constants_fold() {
        let expr = call(
            "multiply",
            vec![
                call(
                    "plus",
                    vec![ExprNode::constant(Value::UInt(1)), ExprNode::constant(Value::UInt(2))],
                    DataType::UInt64,
                ),
                ExprNode::constant(Value::UInt(4)),
            ],
            DataType::UInt64,
        );

        let folded = fold(&expr);
        assert_eq!(folded.as_constant(), Some(&Value::UInt(12)));
        assert_eq!(folded.data_type(), &DataType::UInt64);
    }

    #[test]
    fn test_column_reference_blocks_folding() {
        let expr = call(
            "plus",
            vec![
                ExprNode::column("x", DataType::UInt64),
                call(
                    "plus",
                    vec![ExprNode::constant(Value::UInt(1)), ExprNode::constant(Value::UInt(1))],
                    DataType::UInt64,
                ),
            ],
            DataType::UInt64,
        );

        assert_eq!(fold(&expr).column_name(), "plus(x, 2)");
    }

    #[test]
    fn test_projection_names_survive_folding() {
        let mut tree = QueryTree::Query(QueryNode {
            projection: vec![ProjectionColumn::new(
                "plus(1, 2)",
                call(
                    "plus",
                    vec![ExprNode::constant(Value::UInt(1)), ExprNode::constant(Value::UInt(2))],
                    DataType::UInt64,
                ),
            )],
            from: TableNode::One,
            where_expr: None,
            limit: None,
            is_subquery: false,
        });

        ConstantFoldingPass.run(&mut tree, &ExecutionContext::empty()).unwrap();
        assert_eq!(tree.header().names(), vec!["plus(1, 2)"]);
    }

    #[test]
    fn test_unsigned_difference_folds_to_signed() {
        use crate::analyzer::build_query_tree;
        use crate::ast::{SelectQuery, SyntaxTree};
        use crate::context::derive_context;
        use crate::options::SelectQueryOptions;

        let context = derive_context(
            &ExecutionContext::empty(),
            &SelectQueryOptions::new().set_shard_info(1, 4),
        );
        let query = SelectQuery::new()
            .column(SyntaxTree::function(
                "minus",
                vec![
                    SyntaxTree::identifier("_shard_num"),
                    SyntaxTree::function("shardCount", vec![]),
                ],
            ))
            .into_tree();

        let mut tree = build_query_tree(&query, &context).unwrap();
        ConstantFoldingPass.run(&mut tree, &context).unwrap();

        let QueryTree::Query(node) = &tree else {
            panic!("expected query");
        };
        let folded = &node.projection[0].expr;
        assert_eq!(folded.as_constant(), Some(&Value::Int(-3)));
        assert_eq!(folded.data_type(), &DataType::Int64);
    }
}
