//! aeroquery - SELECT analysis and execution-plan construction
//!
//! Compiles a parsed SELECT into a logical query plan and a physical
//! pipeline:
//!
//! 1. Validate the syntax tree shape
//! 2. Derive a per-query context (shard scalars, settings)
//! 3. Build the resolved query tree
//! 4. Run the query tree pass catalog
//! 5. Lower the tree into a `QueryPlan`
//! 6. Optimize the plan and lower it into a `QueryPipeline`
//!
//! `SelectInterpreter` sequences the whole pipeline; every stage is also
//! usable on its own.

pub mod analyzer;
pub mod ast;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod interpreter;
pub mod observability;
pub mod options;
pub mod passes;
pub mod pipeline;
pub mod plan;
pub mod query_tree;
pub mod quota;
pub mod types;

pub use error::{AnalyzerError, AnalyzerResult};
pub use interpreter::{AnalyzerComponents, QueryResult, SelectInterpreter};
pub use options::{QueryProcessingStage, SelectQueryOptions};
