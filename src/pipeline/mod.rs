//! Physical pipeline construction

mod builder;
mod optimize;
mod processor;
mod settings;

pub use builder::{DefaultPipelineBuilder, PipelineBuilder};
pub use optimize::optimize_plan;
pub use processor::{Processor, QueryPipeline};
pub use settings::{BuildQueryPipelineSettings, QueryPlanOptimizationSettings};
