//! Logical query plan
//!
//! A plan is a tree of steps rooted at the step producing the final
//! result. Plans are built bottom-up: `add_step` stacks a step on the
//! current root, `unite_plans` fans several plans into one step.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::Settings;
use crate::types::Block;

use super::step::{DataStream, PlanNode, PlanStep};

/// Resource ceilings enforced by the sources of the physical pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageLimits {
    #[serde(default)]
    pub max_rows: Option<u64>,
    #[serde(default)]
    pub max_bytes: Option<u64>,
    #[serde(default)]
    pub max_execution_time_ms: Option<u64>,
}

impl StorageLimits {
    pub fn rows(max_rows: u64) -> Self {
        Self {
            max_rows: Some(max_rows),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_rows.is_none() && self.max_bytes.is_none() && self.max_execution_time_ms.is_none()
    }

    /// Limits configured by settings, if any
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let limits = Self {
            max_rows: settings.max_rows_to_read,
            max_bytes: settings.max_bytes_to_read,
            max_execution_time_ms: settings.max_execution_time_ms,
        };
        (!limits.is_empty()).then_some(limits)
    }
}

/// Logical plan of one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    id: Uuid,
    root: Option<PlanNode>,
    storage_limits: Vec<StorageLimits>,
    only_analyze: bool,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            root: None,
            storage_limits: Vec::new(),
            only_analyze: false,
        }
    }

    /// Identity of this plan; stable across moves and clones
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&PlanNode> {
        self.root.as_ref()
    }

    pub(crate) fn root_mut(&mut self) -> Option<&mut PlanNode> {
        self.root.as_mut()
    }

    /// Stacks `step` on top of the current root
    pub fn add_step(&mut self, step: PlanStep) {
        let children = self.root.take().into_iter().collect();
        self.root = Some(PlanNode { step, children });
    }

    /// Replaces this plan with `step` reading from every plan in `plans`
    pub fn unite_plans(&mut self, step: PlanStep, plans: Vec<QueryPlan>) {
        let mut children = Vec::with_capacity(plans.len());
        for plan in plans {
            self.storage_limits.extend(plan.storage_limits);
            children.extend(plan.root);
        }
        self.root = Some(PlanNode { step, children });
    }

    /// Output of the step that currently ends the plan
    pub fn current_data_stream(&self) -> Option<&DataStream> {
        self.root.as_ref().map(|node| node.step.output_stream())
    }

    /// Header of the current data stream, empty for an empty plan
    pub fn header(&self) -> Block {
        self.current_data_stream()
            .map(|stream| stream.header.clone())
            .unwrap_or_default()
    }

    pub fn add_storage_limits(&mut self, limits: StorageLimits) {
        self.storage_limits.push(limits);
    }

    pub fn storage_limits(&self) -> &[StorageLimits] {
        &self.storage_limits
    }

    pub fn only_analyze(&self) -> bool {
        self.only_analyze
    }

    pub fn set_only_analyze(&mut self, value: bool) {
        self.only_analyze = value;
    }

    pub fn step_count(&self) -> usize {
        self.root.as_ref().map_or(0, PlanNode::step_count)
    }

    /// Indented step tree, root first
    pub fn explain(&self) -> String {
        let mut out = String::new();
        if let Some(root) = &self.root {
            explain_node(root, 0, &mut out);
        }
        out
    }
}

impl Default for QueryPlan {
    fn default() -> Self {
        Self::new()
    }
}

fn explain_node(node: &PlanNode, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{}", "", node.step, indent = depth * 2);
    for child in &node.children {
        explain_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnHeader, DataType};

    fn one_row() -> PlanStep {
        PlanStep::ReadOne {
            output: DataStream::new(Block::new(vec![ColumnHeader::new(
                "dummy",
                DataType::UInt8,
            )])),
        }
    }

    #[test]
    fn test_add_step_stacks_on_root() {
        let mut plan = QueryPlan::new();
        assert!(!plan.is_initialized());
        assert!(plan.header().is_empty());

        plan.add_step(one_row());
        plan.add_step(PlanStep::Limit {
            limit: 1,
            output: DataStream::new(plan.header()),
        });

        assert_eq!(plan.step_count(), 2);
        assert_eq!(plan.header().names(), vec!["dummy"]);
        assert_eq!(plan.explain(), "Limit (1)\n  ReadFromSystemOne\n");
    }

    #[test]
    fn test_unite_plans_collects_limits() {
        let mut left = QueryPlan::new();
        left.add_step(one_row());
        left.add_storage_limits(StorageLimits::rows(10));

        let mut right = QueryPlan::new();
        right.add_step(one_row());

        let header = left.header();
        let mut union = QueryPlan::new();
        union.unite_plans(
            PlanStep::Union {
                output: DataStream::new(header),
            },
            vec![left, right],
        );

        assert_eq!(union.step_count(), 3);
        assert_eq!(union.storage_limits(), &[StorageLimits::rows(10)]);
    }

    #[test]
    fn test_limits_from_settings() {
        let mut settings = Settings::default();
        assert!(StorageLimits::from_settings(&settings).is_none());

        settings.max_rows_to_read = Some(500);
        assert_eq!(
            StorageLimits::from_settings(&settings),
            Some(StorageLimits::rows(500))
        );
    }
}
