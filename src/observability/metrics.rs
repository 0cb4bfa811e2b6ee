//! Compilation counters
//!
//! Counters only, monotonic, relaxed atomics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters shared by every context derived from the same root
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    queries_analyzed: AtomicU64,
    queries_rejected: AtomicU64,
    passes_executed: AtomicU64,
    plans_built: AtomicU64,
    plans_extracted: AtomicU64,
    pipelines_built: AtomicU64,
    quotas_attached: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_analyzed(&self) {
        self.queries_analyzed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_passes_executed(&self) {
        self.passes_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_plans_built(&self) {
        self.plans_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_plans_extracted(&self) {
        self.plans_extracted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_pipelines_built(&self) {
        self.pipelines_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_quotas_attached(&self) {
        self.quotas_attached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_analyzed: self.queries_analyzed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            passes_executed: self.passes_executed.load(Ordering::Relaxed),
            plans_built: self.plans_built.load(Ordering::Relaxed),
            plans_extracted: self.plans_extracted.load(Ordering::Relaxed),
            pipelines_built: self.pipelines_built.load(Ordering::Relaxed),
            quotas_attached: self.quotas_attached.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub queries_analyzed: u64,
    pub queries_rejected: u64,
    pub passes_executed: u64,
    pub plans_built: u64,
    pub plans_extracted: u64,
    pub pipelines_built: u64,
    pub quotas_attached: u64,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
