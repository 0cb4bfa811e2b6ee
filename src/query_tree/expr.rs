//! Resolved expressions

use crate::ast::SyntaxTree;
use crate::types::{DataType, Value};

/// Expression with every identifier resolved and every type known
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// Column of the source the query reads from
    Column { name: String, data_type: DataType },
    /// Constant; `source` names the scalar or expression it came from
    Constant {
        value: Value,
        data_type: DataType,
        source: Option<String>,
    },
    Function {
        name: String,
        arguments: Vec<ExprNode>,
        result_type: DataType,
    },
}

impl ExprNode {
    pub fn column(name: impl Into<String>, data_type: DataType) -> Self {
        ExprNode::Column {
            name: name.into(),
            data_type,
        }
    }

    /// Constant typed after its value
    pub fn constant(value: Value) -> Self {
        let data_type = value.data_type();
        ExprNode::Constant {
            value,
            data_type,
            source: None,
        }
    }

    pub fn data_type(&self) -> &DataType {
        match self {
            ExprNode::Column { data_type, .. } => data_type,
            ExprNode::Constant { data_type, .. } => data_type,
            ExprNode::Function { result_type, .. } => result_type,
        }
    }

    /// Default output column name of the expression
    pub fn column_name(&self) -> String {
        match self {
            ExprNode::Column { name, .. } => name.clone(),
            ExprNode::Constant {
                source: Some(source),
                ..
            } => source.clone(),
            ExprNode::Constant { value, .. } => value.to_string(),
            ExprNode::Function {
                name, arguments, ..
            } => {
                let args: Vec<String> = arguments.iter().map(ExprNode::column_name).collect();
                format!("{}({})", name, args.join(", "))
            }
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            ExprNode::Constant { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Names of source columns the expression reads, in first-seen order
    pub fn referenced_columns(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut Vec<String>) {
        match self {
            ExprNode::Column { name, .. } => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            ExprNode::Constant { .. } => {}
            ExprNode::Function { arguments, .. } => {
                for arg in arguments {
                    arg.collect_columns(out);
                }
            }
        }
    }

    /// Replaces column references for which `lookup` returns a substitute
    pub fn substitute_columns(&self, lookup: &dyn Fn(&str) -> Option<ExprNode>) -> ExprNode {
        match self {
            ExprNode::Column { name, .. } => lookup(name).unwrap_or_else(|| self.clone()),
            ExprNode::Constant { .. } => self.clone(),
            ExprNode::Function {
                name,
                arguments,
                result_type,
            } => ExprNode::Function {
                name: name.clone(),
                arguments: arguments
                    .iter()
                    .map(|arg| arg.substitute_columns(lookup))
                    .collect(),
                result_type: result_type.clone(),
            },
        }
    }

    pub fn to_ast(&self) -> SyntaxTree {
        match self {
            ExprNode::Column { name, .. } => SyntaxTree::identifier(name.clone()),
            ExprNode::Constant { value, .. } => SyntaxTree::literal(value.clone()),
            ExprNode::Function {
                name, arguments, ..
            } => SyntaxTree::function(name.clone(), arguments.iter().map(ExprNode::to_ast).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_x_one() -> ExprNode {
        ExprNode::Function {
            name: "plus".into(),
            arguments: vec![
                ExprNode::column("x", DataType::UInt64),
                ExprNode::constant(Value::UInt(1)),
            ],
            result_type: DataType::UInt64,
        }
    }

    #[test]
    fn test_column_name() {
        assert_eq!(plus_x_one().column_name(), "plus(x, 1)");

        let scalar = ExprNode::Constant {
            value: Value::UInt(2),
            data_type: DataType::UInt32,
            source: Some("_shard_num".into()),
        };
        assert_eq!(scalar.column_name(), "_shard_num");
    }

    #[test]
    fn test_referenced_columns() {
        let expr = ExprNode::Function {
            name: "and".into(),
            arguments: vec![plus_x_one(), ExprNode::column("x", DataType::UInt64)],
            result_type: DataType::Bool,
        };
        assert_eq!(expr.referenced_columns(), vec!["x".to_string()]);
    }

    #[test]
    fn test_substitute_columns() {
        let replaced = plus_x_one().substitute_columns(&|name| {
            (name == "x").then(|| ExprNode::column("y", DataType::UInt64))
        });
        assert_eq!(replaced.column_name(), "plus(y, 1)");
    }
}
