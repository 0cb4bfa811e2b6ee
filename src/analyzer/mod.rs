//! Query analysis front end
//!
//! - Top level shape validation of the syntax tree
//! - Name and type resolution into a query tree
//! - Built-in function signatures and constant evaluation

mod builder;
mod functions;
mod validate;

pub use builder::{build_query_tree, DefaultQueryTreeBuilder, QueryTreeBuilder};
pub use functions::{
    compare_values, evaluate_constant, resolve_function, SHARD_COUNT_FUNCTION, SHARD_NUM_FUNCTION,
};
pub use validate::normalize_and_validate;
