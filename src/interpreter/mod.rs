//! Query compilation façade
//!
//! `SelectInterpreter` sequences validation, context derivation, query
//! tree construction, passes, planning and pipeline construction for one
//! SELECT.

mod components;
mod result;
mod select;

pub use components::AnalyzerComponents;
pub use result::QueryResult;
pub use select::SelectInterpreter;
