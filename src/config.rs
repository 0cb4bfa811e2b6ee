//! Engine configuration file
//!
//! JSON document; every section is optional:
//!
//! ```json
//! {
//!   "settings": { "max_threads": 8 },
//!   "tables": [
//!     { "name": "events", "columns": [{ "name": "id", "type": "UInt64" }] }
//!   ],
//!   "quota": { "name": "default", "limits": { "max_queries": 1000 } },
//!   "cluster": { "name": "local", "shard_count": 1 },
//!   "user": "default"
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{InMemoryCatalog, TableSchema};
use crate::context::{ClusterInfo, ExecutionContext, SessionInfo, Settings, SharedState};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::observability::{log_event, Event};
use crate::quota::{Quota, QuotaLimits};

/// Quota section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_quota_name")]
    pub name: String,
    #[serde(default)]
    pub limits: QuotaLimits,
}

fn default_quota_name() -> String {
    "default".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            name: default_quota_name(),
            limits: QuotaLimits::default(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub tables: Vec<TableSchema>,
    #[serde(default)]
    pub quota: QuotaConfig,
    #[serde(default)]
    pub cluster: ClusterInfo,
    /// Session user
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            tables: Vec::new(),
            quota: QuotaConfig::default(),
            cluster: ClusterInfo::default(),
            user: default_user(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> AnalyzerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&content)?;

        let tables = config.tables.len().to_string();
        log_event(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string()), ("tables", &tables)],
        );
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> AnalyzerResult<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| AnalyzerError::config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.settings.max_threads == 0 {
            return Err(AnalyzerError::config("max_threads must be > 0"));
        }
        if self.settings.max_block_size == 0 {
            return Err(AnalyzerError::config("max_block_size must be > 0"));
        }
        if self.cluster.shard_count == 0 {
            return Err(AnalyzerError::config("cluster.shard_count must be > 0"));
        }

        let mut tables = HashSet::new();
        for table in &self.tables {
            if table.name.is_empty() {
                return Err(AnalyzerError::config("Table name must not be empty"));
            }
            if !tables.insert(table.qualified_name()) {
                return Err(AnalyzerError::config(format!(
                    "Duplicate table: {}",
                    table.qualified_name()
                )));
            }
            if table.columns.is_empty() {
                return Err(AnalyzerError::config(format!(
                    "Table {} has no columns",
                    table.qualified_name()
                )));
            }

            let mut columns = HashSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(AnalyzerError::config(format!(
                        "Duplicate column {} in table {}",
                        column.name,
                        table.qualified_name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Root context for queries run under this configuration
    pub fn into_context(self) -> ExecutionContext {
        let mut catalog = InMemoryCatalog::new();
        for table in self.tables {
            catalog.add_table(table);
        }

        let shared = SharedState::new(Arc::new(catalog), self.cluster, SessionInfo::new(self.user));
        let quota = Quota::new(self.quota.name, self.quota.limits);
        ExecutionContext::new(shared, self.settings, quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CONFIG: &str = r#"{
        "settings": { "max_threads": 2 },
        "tables": [
            { "name": "events", "columns": [
                { "name": "id", "type": "UInt64" },
                { "name": "kind", "type": "String" }
            ] }
        ],
        "quota": { "name": "analysts", "limits": { "max_queries": 10 } }
    }"#;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.settings.max_threads, 2);
        assert_eq!(config.settings.max_block_size, 65409);
        assert_eq!(config.tables.len(), 1);
        assert_eq!(config.quota.limits.max_queries, Some(10));
        assert_eq!(config.user, "default");
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/aeroquery.json")).unwrap_err();
        assert_eq!(err.code(), "AERO_CONFIG_INVALID");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_rejects_zero_threads() {
        let err = EngineConfig::from_json_str(r#"{"settings": {"max_threads": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("max_threads"));
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = EngineConfig::from_json_str(
            r#"{"tables": [{"name": "t", "columns": [
                {"name": "a", "type": "UInt8"}, {"name": "a", "type": "UInt8"}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate column a"));
    }

    #[test]
    fn test_into_context() {
        let ctx = EngineConfig::from_json_str(CONFIG).unwrap().into_context();

        assert!(ctx.catalog().table(None, "events").is_some());
        assert_eq!(ctx.quota().name(), "analysts");
        assert_eq!(ctx.settings().max_threads, 2);
    }
}
