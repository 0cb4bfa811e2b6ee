//! Observability for query compilation
//!
//! - Structured logging (JSON lines)
//! - Monotonic counters
//! - Lifecycle scopes
//!
//! Observability is read-only: it never changes the outcome of a
//! compilation.
//!
//! # Usage
//!
//! ```ignore
//! use aeroquery::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::PlanBuilt, &[("steps", "4")]);
//!
//! let scope = ObservationScope::new("QUERY_ANALYSIS", true);
//! // ... analyze ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_verbose() {
        Severity::Trace
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_does_not_panic() {
        log_event(Event::PlanBuilt, &[]);
        log_event(Event::PassExecuted, &[("pass", "ConstantFolding")]);
    }
}
