//! Semantic intermediate representation of a SELECT

mod expr;
mod node;

pub use expr::ExprNode;
pub use node::{ProjectionColumn, QueryNode, QueryTree, TableNode, UnionNode, DUMMY_COLUMN};
