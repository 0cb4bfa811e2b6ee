//! Lowering of syntax trees into query trees
//!
//! Resolution order for an identifier:
//! 1. Column of the FROM source
//! 2. Alias defined earlier in the projection
//! 3. Special scalar of the context (`_shard_num`, `_shard_count`)

use crate::ast::{SelectQuery, SyntaxTree};
use crate::catalog::DEFAULT_DATABASE;
use crate::context::{ExecutionContext, SHARD_COUNT, SHARD_NUM};
use crate::error::{AnalyzerResult, SemanticError};
use crate::query_tree::{ExprNode, ProjectionColumn, QueryNode, QueryTree, TableNode, UnionNode};
use crate::types::{Block, DataType, Value};

use super::functions::{resolve_function, SHARD_COUNT_FUNCTION, SHARD_NUM_FUNCTION};

/// Builds a query tree from a validated syntax tree.
///
/// Fails with `SemanticAnalysis` when names or types cannot be resolved.
pub trait QueryTreeBuilder: Send + Sync {
    fn build(&self, query: &SyntaxTree, context: &ExecutionContext) -> AnalyzerResult<QueryTree>;
}

/// Resolves against the context catalog and special scalars
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQueryTreeBuilder;

impl QueryTreeBuilder for DefaultQueryTreeBuilder {
    fn build(&self, query: &SyntaxTree, context: &ExecutionContext) -> AnalyzerResult<QueryTree> {
        Ok(Resolver { context }.build_tree(query)?)
    }
}

/// Convenience wrapper over [`DefaultQueryTreeBuilder`]
pub fn build_query_tree(query: &SyntaxTree, context: &ExecutionContext) -> AnalyzerResult<QueryTree> {
    DefaultQueryTreeBuilder.build(query, context)
}

struct Resolver<'a> {
    context: &'a ExecutionContext,
}

type Aliases = Vec<(String, ExprNode)>;

impl Resolver<'_> {
    fn build_tree(&self, query: &SyntaxTree) -> Result<QueryTree, SemanticError> {
        match query {
            SyntaxTree::SelectWithUnionQuery { union_mode, selects } => match selects.as_slice() {
                [] => Err(SemanticError::invalid_arguments("UNION without queries")),
                [single] => self.build_tree(single),
                _ => {
                    let queries = selects
                        .iter()
                        .map(|select| self.build_tree(select))
                        .collect::<Result<Vec<_>, _>>()?;
                    check_union_headers(&queries)?;
                    Ok(QueryTree::Union(UnionNode {
                        mode: *union_mode,
                        queries,
                        is_subquery: false,
                    }))
                }
            },
            SyntaxTree::SelectQuery(select) => self.build_query(select),
            SyntaxTree::Subquery { child } => {
                let mut tree = self.build_tree(child)?;
                tree.set_is_subquery(true);
                Ok(tree)
            }
            other => Err(SemanticError::unsupported(format!(
                "{} is not a query: {}",
                other.kind(),
                other
            ))),
        }
    }

    fn build_source(&self, from: Option<&SyntaxTree>) -> Result<TableNode, SemanticError> {
        match from {
            None => Ok(TableNode::One),
            Some(SyntaxTree::TableIdentifier { database, table }) => self
                .context
                .catalog()
                .table(database.as_deref(), table)
                .map(TableNode::Table)
                .ok_or_else(|| {
                    SemanticError::unknown_table(&format!(
                        "{}.{}",
                        database.as_deref().unwrap_or(DEFAULT_DATABASE),
                        table
                    ))
                }),
            Some(SyntaxTree::Subquery { child }) => {
                let mut tree = self.build_tree(child)?;
                tree.set_is_subquery(true);
                Ok(TableNode::Subquery(Box::new(tree)))
            }
            Some(other) => Err(SemanticError::unsupported(format!(
                "{} cannot be used in FROM: {}",
                other.kind(),
                other
            ))),
        }
    }

    fn build_query(&self, select: &SelectQuery) -> Result<QueryTree, SemanticError> {
        let from = self.build_source(select.from.as_deref())?;
        let source = from.header();

        if select.projection.is_empty() {
            return Err(SemanticError::invalid_arguments(
                "Empty list of columns in SELECT query",
            ));
        }

        let mut projection = Vec::new();
        let mut aliases: Aliases = Vec::new();
        for item in &select.projection {
            match item {
                SyntaxTree::Asterisk => {
                    for column in source.columns() {
                        projection.push(ProjectionColumn::new(
                            column.name.clone(),
                            ExprNode::column(column.name.clone(), column.data_type.clone()),
                        ));
                    }
                }
                SyntaxTree::Alias { expr, alias } => {
                    let resolved = self.resolve_expr(expr, &source, &aliases)?;
                    aliases.push((alias.clone(), resolved.clone()));
                    projection.push(ProjectionColumn::new(alias.clone(), resolved));
                }
                expr => {
                    let resolved = self.resolve_expr(expr, &source, &aliases)?;
                    projection.push(ProjectionColumn::new(resolved.column_name(), resolved));
                }
            }
        }

        let where_expr = select
            .where_clause
            .as_deref()
            .map(|predicate| self.resolve_expr(predicate, &source, &aliases))
            .transpose()?;

        Ok(QueryTree::Query(QueryNode {
            projection,
            from,
            where_expr,
            limit: select.limit,
            is_subquery: false,
        }))
    }

    fn resolve_identifier(
        &self,
        name: &str,
        source: &Block,
        aliases: &Aliases,
    ) -> Result<ExprNode, SemanticError> {
        if let Some(column) = source.get(name) {
            return Ok(ExprNode::column(name, column.data_type.clone()));
        }
        if let Some((_, expr)) = aliases.iter().rev().find(|(alias, _)| alias == name) {
            return Ok(expr.clone());
        }
        if let Some(scalar) = self.context.special_scalar(name) {
            return Ok(ExprNode::Constant {
                value: scalar.value.clone(),
                data_type: scalar.data_type.clone(),
                source: Some(scalar.name.clone()),
            });
        }
        Err(SemanticError::unknown_identifier(name))
    }

    fn resolve_shard_function(&self, name: &str) -> ExprNode {
        let (scalar_name, fallback) = if name == SHARD_NUM_FUNCTION {
            (SHARD_NUM, 0)
        } else {
            (SHARD_COUNT, 1)
        };
        let value = self
            .context
            .special_scalar(scalar_name)
            .map(|scalar| scalar.value.clone())
            .unwrap_or(Value::UInt(fallback));

        ExprNode::Constant {
            value,
            data_type: DataType::UInt32,
            source: Some(format!("{}()", name)),
        }
    }

    fn resolve_expr(
        &self,
        expr: &SyntaxTree,
        source: &Block,
        aliases: &Aliases,
    ) -> Result<ExprNode, SemanticError> {
        match expr {
            SyntaxTree::Identifier { name } => self.resolve_identifier(name, source, aliases),
            SyntaxTree::Literal { value } => Ok(ExprNode::constant(value.clone())),
            SyntaxTree::Alias { expr, .. } => self.resolve_expr(expr, source, aliases),
            SyntaxTree::Function { name, arguments }
                if arguments.is_empty()
                    && (name == SHARD_NUM_FUNCTION || name == SHARD_COUNT_FUNCTION) =>
            {
                Ok(self.resolve_shard_function(name))
            }
            SyntaxTree::Function { name, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| self.resolve_expr(arg, source, aliases))
                    .collect::<Result<Vec<_>, _>>()?;
                let types: Vec<DataType> =
                    arguments.iter().map(|arg| arg.data_type().clone()).collect();
                let result_type = resolve_function(name, &types)?;
                Ok(ExprNode::Function {
                    name: name.clone(),
                    arguments,
                    result_type,
                })
            }
            SyntaxTree::Asterisk => Err(SemanticError::unsupported(
                "Asterisk is allowed only in the projection list",
            )),
            other => Err(SemanticError::unsupported(format!(
                "{} is not supported in expressions: {}",
                other.kind(),
                other
            ))),
        }
    }
}

fn check_union_headers(queries: &[QueryTree]) -> Result<(), SemanticError> {
    let headers: Vec<Block> = queries.iter().map(QueryTree::header).collect();
    let first = &headers[0];

    for header in &headers[1..] {
        if header.len() != first.len() {
            return Err(SemanticError::type_mismatch(format!(
                "Different number of columns in UNION elements: {} and {}",
                first.len(),
                header.len()
            )));
        }
        for (left, right) in first.columns().iter().zip(header.columns()) {
            if DataType::supertype(&left.data_type, &right.data_type).is_none() {
                return Err(SemanticError::type_mismatch(format!(
                    "Cannot find common type for column {} in UNION: {} and {}",
                    left.name, left.data_type, right.data_type
                )));
            }
        }
    }
    Ok(())
}
