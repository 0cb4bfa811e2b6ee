//! Syntax tree consumed by the analyzer
//!
//! The parser that produces these trees lives outside this crate. Trees can
//! also be built in code with the helper constructors, or read as JSON.

mod format;
mod node;

pub use node::{SelectQuery, SyntaxTree, UnionMode};
