//! Execution context
//!
//! A context has two halves:
//!
//! | Field | On copy |
//! |---|---|
//! | `query_id` | copied |
//! | `settings` | copied (value) |
//! | `scalars` | copied (value) |
//! | `quota` | shared handle |
//! | `shared` (catalog, cluster, session, metrics) | shared by reference |
//!
//! Copying never writes to the source context, so each sub-query can own a
//! derived context while the shared half is read concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, InMemoryCatalog};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::quota::Quota;

use super::scalar::SpecialScalar;
use super::settings::Settings;

/// Cluster topology visible to the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default = "default_cluster_name")]
    pub name: String,
    #[serde(default = "default_shard_count")]
    pub shard_count: u32,
}

fn default_cluster_name() -> String {
    "local".to_string()
}

fn default_shard_count() -> u32 {
    1
}

impl Default for ClusterInfo {
    fn default() -> Self {
        Self {
            name: default_cluster_name(),
            shard_count: default_shard_count(),
        }
    }
}

/// Session the query belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub user: String,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user: user.into(),
            started_at: Utc::now(),
        }
    }
}

/// Read-only state shared by a root context and all contexts derived from it
#[derive(Debug)]
pub struct SharedState {
    pub catalog: Arc<dyn Catalog>,
    pub cluster: ClusterInfo,
    pub session: SessionInfo,
    pub metrics: MetricsRegistry,
}

impl SharedState {
    pub fn new(catalog: Arc<dyn Catalog>, cluster: ClusterInfo, session: SessionInfo) -> Self {
        Self {
            catalog,
            cluster,
            session,
            metrics: MetricsRegistry::new(),
        }
    }
}

/// Mutable per-query configuration
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    query_id: Uuid,
    settings: Settings,
    scalars: BTreeMap<String, SpecialScalar>,
    quota: Arc<Quota>,
    shared: Arc<SharedState>,
}

impl ExecutionContext {
    pub fn new(shared: SharedState, settings: Settings, quota: Quota) -> Self {
        Self {
            query_id: Uuid::new_v4(),
            settings,
            scalars: BTreeMap::new(),
            quota: Arc::new(quota),
            shared: Arc::new(shared),
        }
    }

    /// Root context over a catalog with default settings and no quota limits
    pub fn with_catalog(catalog: impl Catalog + 'static) -> Self {
        let shared = SharedState::new(
            Arc::new(catalog),
            ClusterInfo::default(),
            SessionInfo::new("default"),
        );
        Self::new(shared, Settings::default(), Quota::unlimited())
    }

    /// Root context with an empty catalog
    pub fn empty() -> Self {
        Self::with_catalog(InMemoryCatalog::new())
    }

    /// Independent copy: owned fields cloned, shared state aliased
    pub fn create_copy(&self) -> Self {
        self.clone()
    }

    pub fn query_id(&self) -> Uuid {
        self.query_id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Quota handle of the session
    pub fn quota(&self) -> Arc<Quota> {
        Arc::clone(&self.quota)
    }

    pub fn add_special_scalar(&mut self, scalar: SpecialScalar) {
        self.scalars.insert(scalar.name.clone(), scalar);
    }

    pub fn special_scalar(&self, name: &str) -> Option<&SpecialScalar> {
        self.scalars.get(name)
    }

    pub fn special_scalars(&self) -> &BTreeMap<String, SpecialScalar> {
        &self.scalars
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.shared.catalog.as_ref()
    }

    pub fn cluster(&self) -> &ClusterInfo {
        &self.shared.cluster
    }

    pub fn session(&self) -> &SessionInfo {
        &self.shared.session
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.shared.metrics
    }

    /// Logs `event` unless query logging is disabled by settings
    pub fn log_event(&self, event: Event, fields: &[(&str, &str)]) {
        if self.settings.log_queries {
            log_event(event, fields);
        }
    }

    /// True when both contexts alias the same shared state
    pub fn shares_state_with(&self, other: &ExecutionContext) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}
