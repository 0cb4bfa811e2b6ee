//! Logical plan steps

use std::fmt;

use crate::query_tree::{ExprNode, ProjectionColumn};
use crate::types::Block;

/// Header of the rows flowing out of a step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataStream {
    pub header: Block,
}

impl DataStream {
    pub fn new(header: Block) -> Self {
        Self { header }
    }
}

/// One operation of the logical plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStep {
    /// Read columns of a catalog table
    ReadFromStorage {
        database: String,
        table: String,
        columns: Vec<String>,
        output: DataStream,
    },
    /// Implicit single row for SELECT without FROM
    ReadOne { output: DataStream },
    /// Keep rows for which `predicate` holds
    Filter {
        predicate: ExprNode,
        output: DataStream,
    },
    /// Compute the output columns
    Expression {
        actions: Vec<ProjectionColumn>,
        output: DataStream,
    },
    Limit { limit: u64, output: DataStream },
    /// Concatenate the children
    Union { output: DataStream },
    Distinct { output: DataStream },
}

impl PlanStep {
    pub fn name(&self) -> &'static str {
        match self {
            PlanStep::ReadFromStorage { .. } => "ReadFromStorage",
            PlanStep::ReadOne { .. } => "ReadFromSystemOne",
            PlanStep::Filter { .. } => "Filter",
            PlanStep::Expression { .. } => "Expression",
            PlanStep::Limit { .. } => "Limit",
            PlanStep::Union { .. } => "Union",
            PlanStep::Distinct { .. } => "Distinct",
        }
    }

    pub fn output_stream(&self) -> &DataStream {
        match self {
            PlanStep::ReadFromStorage { output, .. }
            | PlanStep::ReadOne { output }
            | PlanStep::Filter { output, .. }
            | PlanStep::Expression { output, .. }
            | PlanStep::Limit { output, .. }
            | PlanStep::Union { output }
            | PlanStep::Distinct { output } => output,
        }
    }

    pub fn output_header(&self) -> &Block {
        &self.output_stream().header
    }

    /// Step-specific detail shown by explain
    pub fn detail(&self) -> String {
        match self {
            PlanStep::ReadFromStorage {
                database,
                table,
                columns,
                ..
            } => format!("{}.{}: {}", database, table, columns.join(", ")),
            PlanStep::ReadOne { .. } => String::new(),
            PlanStep::Filter { predicate, .. } => predicate.column_name(),
            PlanStep::Expression { actions, .. } => actions
                .iter()
                .map(|action| {
                    let expr = action.expr.column_name();
                    if expr == action.name {
                        expr
                    } else {
                        format!("{} AS {}", expr, action.name)
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
            PlanStep::Limit { limit, .. } => limit.to_string(),
            PlanStep::Union { .. } | PlanStep::Distinct { .. } => String::new(),
        }
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        if detail.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{} ({})", self.name(), detail)
        }
    }
}

/// Step with its inputs
#[derive(Debug, Clone, PartialEq)]
pub struct PlanNode {
    pub step: PlanStep,
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Number of steps in this subtree
    pub fn step_count(&self) -> usize {
        1 + self.children.iter().map(PlanNode::step_count).sum::<usize>()
    }
}
