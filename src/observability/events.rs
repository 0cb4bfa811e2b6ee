//! Typed lifecycle events of a query compilation

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,

    // Front end
    QueryTreeBuilt,

    // Middle end
    PassExecuted,

    // Back end
    PlanBuilt,
    PlanExtracted,
    StorageLimitsAdded,
    PipelineBuilt,
    QuotaAttached,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryTreeBuilt => "QUERY_TREE_BUILT",
            Event::PassExecuted => "PASS_EXECUTED",
            Event::PlanBuilt => "PLAN_BUILT",
            Event::PlanExtracted => "PLAN_EXTRACTED",
            Event::StorageLimitsAdded => "STORAGE_LIMITS_ADDED",
            Event::PipelineBuilt => "PIPELINE_BUILT",
            Event::QuotaAttached => "QUOTA_ATTACHED",
        }
    }

    /// Events emitted once per pass or step are logged at TRACE
    pub fn is_verbose(&self) -> bool {
        matches!(self, Event::PassExecuted | Event::QueryTreeBuilt)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
