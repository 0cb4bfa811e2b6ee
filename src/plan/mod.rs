//! Logical query planning
//!
//! - Step tree with union fan-in (`QueryPlan`, `PlanStep`)
//! - Lowering from the analyzed query tree
//! - `Planner` state machine with storage limit augmentation

mod lowering;
mod planner;
mod query_plan;
mod step;

pub use lowering::build_plan;
pub use planner::{Planner, PlannerConfiguration};
pub use query_plan::{QueryPlan, StorageLimits};
pub use step::{DataStream, PlanNode, PlanStep};
