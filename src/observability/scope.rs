//! Begin/complete logging around a unit of work
//!
//! - `{name}_BEGIN` on creation
//! - `{name}_COMPLETE` with `elapsed_ms` on `complete()`
//! - `{name}_FAILED` on `fail()`
//! - `{name}_INCOMPLETE` if dropped unfinished

use std::time::Instant;

use super::logger::Logger;

/// Scope that logs its own lifecycle.
///
/// A disabled scope stays silent except for failures.
pub struct ObservationScope {
    name: &'static str,
    fields: Vec<(&'static str, String)>,
    enabled: bool,
    finished: bool,
    started_at: Instant,
}

impl ObservationScope {
    pub fn new(name: &'static str, enabled: bool) -> Self {
        Self::with_fields(name, enabled, Vec::new())
    }

    pub fn with_fields(
        name: &'static str,
        enabled: bool,
        fields: Vec<(&'static str, String)>,
    ) -> Self {
        let scope = Self {
            name,
            fields,
            enabled,
            finished: false,
            started_at: Instant::now(),
        };
        if enabled {
            Logger::info(&format!("{}_BEGIN", name), &scope.field_refs());
        }
        scope
    }

    fn field_refs(&self) -> Vec<(&str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    pub fn complete(mut self) {
        self.finished = true;
        if self.enabled {
            let elapsed = self.elapsed_ms().to_string();
            let mut fields = self.field_refs();
            fields.push(("elapsed_ms", &elapsed));
            Logger::info(&format!("{}_COMPLETE", self.name), &fields);
        }
    }

    /// Failures are always logged
    pub fn fail(mut self, code: &str, reason: &str) {
        self.finished = true;
        let mut fields = self.field_refs();
        fields.push(("code", code));
        fields.push(("reason", reason));
        Logger::error(&format!("{}_FAILED", self.name), &fields);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.finished && self.enabled {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
