//! Resource accounting attached to full query executions
//!
//! Counters are monotonic and thread-safe; a quota handle is shared by every
//! query of a session.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Ceilings enforced by the runtime
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotaLimits {
    #[serde(default)]
    pub max_queries: Option<u64>,
    #[serde(default)]
    pub max_result_rows: Option<u64>,
}

/// Point-in-time usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QuotaUsage {
    pub queries: u64,
    pub result_rows: u64,
}

/// Quota tracker
#[derive(Debug)]
pub struct Quota {
    name: String,
    limits: QuotaLimits,
    queries: AtomicU64,
    result_rows: AtomicU64,
}

impl Quota {
    pub fn new(name: impl Into<String>, limits: QuotaLimits) -> Self {
        Self {
            name: name.into(),
            limits,
            queries: AtomicU64::new(0),
            result_rows: AtomicU64::new(0),
        }
    }

    /// Quota with no limits
    pub fn unlimited() -> Self {
        Self::new("default", QuotaLimits::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// Charges one query. Called when the quota is attached to a pipeline.
    pub fn register_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Charges produced rows. Called by the runtime.
    pub fn add_result_rows(&self, rows: u64) {
        self.result_rows.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn usage(&self) -> QuotaUsage {
        QuotaUsage {
            queries: self.queries.load(Ordering::Relaxed),
            result_rows: self.result_rows.load(Ordering::Relaxed),
        }
    }

    /// Returns true if any limit has been passed
    pub fn is_exceeded(&self) -> bool {
        let usage = self.usage();
        self.limits.max_queries.is_some_and(|max| usage.queries > max)
            || self
                .limits
                .max_result_rows
                .is_some_and(|max| usage.result_rows > max)
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::unlimited()
    }
}
