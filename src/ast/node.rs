//! Syntax tree node definitions
//!
//! The tree is produced by the SQL parser and is read-only input to the
//! analyzer.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// How the members of a `SelectWithUnionQuery` are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionMode {
    #[default]
    All,
    Distinct,
}

impl UnionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionMode::All => "UNION ALL",
            UnionMode::Distinct => "UNION DISTINCT",
        }
    }
}

/// Body of a single SELECT
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectQuery {
    pub projection: Vec<SyntaxTree>,
    /// `TableIdentifier` or `Subquery`
    #[serde(default)]
    pub from: Option<Box<SyntaxTree>>,
    #[serde(default)]
    pub where_clause: Option<Box<SyntaxTree>>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a projection item
    pub fn column(mut self, expr: SyntaxTree) -> Self {
        self.projection.push(expr);
        self
    }

    /// Reads from a table in the default database
    pub fn from_table(mut self, table: impl Into<String>) -> Self {
        self.from = Some(Box::new(SyntaxTree::table(table)));
        self
    }

    /// Reads from a subquery
    pub fn from_subquery(mut self, query: SyntaxTree) -> Self {
        self.from = Some(Box::new(SyntaxTree::subquery(query)));
        self
    }

    pub fn filter(mut self, predicate: SyntaxTree) -> Self {
        self.where_clause = Some(Box::new(predicate));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn into_tree(self) -> SyntaxTree {
        SyntaxTree::SelectQuery(self)
    }
}

/// Closed set of syntax node kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxTree {
    SelectWithUnionQuery {
        #[serde(default)]
        union_mode: UnionMode,
        selects: Vec<SyntaxTree>,
    },
    SelectQuery(SelectQuery),
    /// Parenthesized query. Owns exactly one child.
    Subquery { child: Box<SyntaxTree> },
    ExpressionList { items: Vec<SyntaxTree> },
    Identifier { name: String },
    Asterisk,
    Literal { value: Value },
    Function {
        name: String,
        #[serde(default)]
        arguments: Vec<SyntaxTree>,
    },
    Alias { expr: Box<SyntaxTree>, alias: String },
    TableIdentifier {
        #[serde(default)]
        database: Option<String>,
        table: String,
    },
    InsertQuery {
        table: String,
        #[serde(default)]
        select: Option<Box<SyntaxTree>>,
    },
    ShowTables {
        #[serde(default)]
        database: Option<String>,
    },
}

impl SyntaxTree {
    /// Node kind name
    pub fn kind(&self) -> &'static str {
        match self {
            SyntaxTree::SelectWithUnionQuery { .. } => "SelectWithUnionQuery",
            SyntaxTree::SelectQuery(_) => "SelectQuery",
            SyntaxTree::Subquery { .. } => "Subquery",
            SyntaxTree::ExpressionList { .. } => "ExpressionList",
            SyntaxTree::Identifier { .. } => "Identifier",
            SyntaxTree::Asterisk => "Asterisk",
            SyntaxTree::Literal { .. } => "Literal",
            SyntaxTree::Function { .. } => "Function",
            SyntaxTree::Alias { .. } => "Alias",
            SyntaxTree::TableIdentifier { .. } => "TableIdentifier",
            SyntaxTree::InsertQuery { .. } => "InsertQuery",
            SyntaxTree::ShowTables { .. } => "ShowTables",
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        SyntaxTree::Identifier { name: name.into() }
    }

    pub fn literal(value: Value) -> Self {
        SyntaxTree::Literal { value }
    }

    pub fn function(name: impl Into<String>, arguments: Vec<SyntaxTree>) -> Self {
        SyntaxTree::Function {
            name: name.into(),
            arguments,
        }
    }

    pub fn alias(expr: SyntaxTree, alias: impl Into<String>) -> Self {
        SyntaxTree::Alias {
            expr: Box::new(expr),
            alias: alias.into(),
        }
    }

    pub fn table(table: impl Into<String>) -> Self {
        SyntaxTree::TableIdentifier {
            database: None,
            table: table.into(),
        }
    }

    pub fn subquery(child: SyntaxTree) -> Self {
        SyntaxTree::Subquery {
            child: Box::new(child),
        }
    }

    pub fn union(union_mode: UnionMode, selects: Vec<SyntaxTree>) -> Self {
        SyntaxTree::SelectWithUnionQuery { union_mode, selects }
    }

    /// Renders the node for diagnostics
    pub fn format_for_error_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_builder() {
        let query = SelectQuery::new()
            .column(SyntaxTree::identifier("id"))
            .from_table("users")
            .limit(10);

        assert_eq!(query.projection.len(), 1);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.into_tree().kind(), "SelectQuery");
    }

    #[test]
    fn test_json_shape() {
        let tree = SyntaxTree::subquery(
            SelectQuery::new()
                .column(SyntaxTree::literal(Value::UInt(1)))
                .into_tree(),
        );

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["kind"], "subquery");
        assert_eq!(json["child"]["kind"], "select_query");

        let parsed: SyntaxTree = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, tree);
    }
}
