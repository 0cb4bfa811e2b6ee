//! Query tree nodes
//!
//! The query tree is the resolved form of a SELECT. Passes rewrite it in
//! place; the planner lowers it into a query plan.

use std::fmt;

use crate::ast::{SelectQuery, SyntaxTree, UnionMode};
use crate::catalog::TableSchema;
use crate::types::{Block, ColumnHeader, DataType};

use super::expr::ExprNode;

/// Column of the implicit one-row source used by SELECT without FROM
pub const DUMMY_COLUMN: &str = "dummy";

/// One output column of a query
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionColumn {
    pub name: String,
    pub expr: ExprNode,
}

impl ProjectionColumn {
    pub fn new(name: impl Into<String>, expr: ExprNode) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }

    pub fn header(&self) -> ColumnHeader {
        ColumnHeader::new(self.name.clone(), self.expr.data_type().clone())
    }
}

/// Source a query reads from
#[derive(Debug, Clone, PartialEq)]
pub enum TableNode {
    /// Implicit single row with one `dummy UInt8` column
    One,
    Table(TableSchema),
    Subquery(Box<QueryTree>),
}

impl TableNode {
    /// Columns visible to the query reading from this source
    pub fn header(&self) -> Block {
        match self {
            TableNode::One => Block::new(vec![ColumnHeader::new(DUMMY_COLUMN, DataType::UInt8)]),
            TableNode::Table(schema) => schema.header(),
            TableNode::Subquery(tree) => tree.header(),
        }
    }
}

/// Resolved SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub projection: Vec<ProjectionColumn>,
    pub from: TableNode,
    pub where_expr: Option<ExprNode>,
    pub limit: Option<u64>,
    pub is_subquery: bool,
}

impl QueryNode {
    pub fn header(&self) -> Block {
        Block::new(self.projection.iter().map(ProjectionColumn::header).collect())
    }
}

/// Resolved UNION of queries with identical arity
#[derive(Debug, Clone, PartialEq)]
pub struct UnionNode {
    pub mode: UnionMode,
    pub queries: Vec<QueryTree>,
    pub is_subquery: bool,
}

impl UnionNode {
    /// Names of the first query, types widened across all members
    pub fn header(&self) -> Block {
        let mut members = self.queries.iter().map(QueryTree::header);
        let Some(first) = members.next() else {
            return Block::default();
        };

        let mut columns: Vec<ColumnHeader> = first.columns().to_vec();
        for member in members {
            for (column, other) in columns.iter_mut().zip(member.columns()) {
                if let Some(widened) = DataType::supertype(&column.data_type, &other.data_type) {
                    column.data_type = widened;
                }
            }
        }
        Block::new(columns)
    }
}

/// Root of a resolved query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTree {
    Query(QueryNode),
    Union(UnionNode),
}

impl QueryTree {
    /// Output header
    pub fn header(&self) -> Block {
        match self {
            QueryTree::Query(query) => query.header(),
            QueryTree::Union(union) => union.header(),
        }
    }

    pub fn is_subquery(&self) -> bool {
        match self {
            QueryTree::Query(query) => query.is_subquery,
            QueryTree::Union(union) => union.is_subquery,
        }
    }

    pub fn set_is_subquery(&mut self, value: bool) {
        match self {
            QueryTree::Query(query) => query.is_subquery = value,
            QueryTree::Union(union) => union.is_subquery = value,
        }
    }

    /// Converts back into a syntax tree
    pub fn to_ast(&self) -> SyntaxTree {
        match self {
            QueryTree::Query(query) => SyntaxTree::SelectQuery(query_to_ast(query)),
            QueryTree::Union(union) => SyntaxTree::SelectWithUnionQuery {
                union_mode: union.mode,
                selects: union.queries.iter().map(QueryTree::to_ast).collect(),
            },
        }
    }
}

fn query_to_ast(query: &QueryNode) -> SelectQuery {
    let projection = query
        .projection
        .iter()
        .map(|column| {
            let expr = column.expr.to_ast();
            if column.name == column.expr.column_name() {
                expr
            } else {
                SyntaxTree::alias(expr, column.name.clone())
            }
        })
        .collect();

    let from = match &query.from {
        TableNode::One => None,
        TableNode::Table(schema) => Some(Box::new(SyntaxTree::TableIdentifier {
            database: Some(schema.database.clone()),
            table: schema.name.clone(),
        })),
        TableNode::Subquery(tree) => Some(Box::new(SyntaxTree::subquery(tree.to_ast()))),
    };

    SelectQuery {
        projection,
        from,
        where_clause: query.where_expr.as_ref().map(|e| Box::new(e.to_ast())),
        limit: query.limit,
    }
}

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ast())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn select_const(value: Value, name: &str) -> QueryTree {
        QueryTree::Query(QueryNode {
            projection: vec![ProjectionColumn::new(name, ExprNode::constant(value))],
            from: TableNode::One,
            where_expr: None,
            limit: None,
            is_subquery: false,
        })
    }

    #[test]
    fn test_union_header_widens_types() {
        let union = QueryTree::Union(UnionNode {
            mode: UnionMode::All,
            queries: vec![
                select_const(Value::UInt(1), "a"),
                select_const(Value::Float(2.5), "b"),
            ],
            is_subquery: false,
        });

        let header = union.header();
        assert_eq!(header.names(), vec!["a"]);
        assert_eq!(header.columns()[0].data_type, DataType::Float64);
    }

    #[test]
    fn test_to_ast_keeps_aliases() {
        let tree = select_const(Value::UInt(1), "one");
        assert_eq!(tree.to_ast().to_string(), "SELECT 1 AS one");

        let unaliased = select_const(Value::UInt(1), "1");
        assert_eq!(unaliased.to_string(), "SELECT 1");
    }

    #[test]
    fn test_one_source_header() {
        let header = TableNode::One.header();
        assert_eq!(header.names(), vec![DUMMY_COLUMN]);
    }
}
