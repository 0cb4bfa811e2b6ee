//! Logical plan rewrites applied before lowering
//!
//! Rules, tried in order at each step until none applies:
//! 1. Limit over Expression: the limit moves below the expression
//! 2. Expression over Expression: the two are merged into one

use std::collections::HashMap;
use std::mem;

use crate::plan::{DataStream, PlanNode, PlanStep, QueryPlan};
use crate::query_tree::{ExprNode, ProjectionColumn};

use super::settings::QueryPlanOptimizationSettings;

/// Rewrites `plan` in place and returns the number of rewrites applied
pub fn optimize_plan(plan: &mut QueryPlan, settings: &QueryPlanOptimizationSettings) -> usize {
    let mut applied = 0;
    if !settings.optimize_plan {
        return applied;
    }
    let Some(root) = plan.root_mut() else {
        return applied;
    };

    // A rewrite can expose new matches above it, so repeat until stable
    loop {
        let before = applied;
        optimize_node(root, settings, &mut applied);
        if applied == before || applied >= settings.max_optimizations_to_apply {
            return applied;
        }
    }
}

fn optimize_node(node: &mut PlanNode, settings: &QueryPlanOptimizationSettings, applied: &mut usize) {
    while *applied < settings.max_optimizations_to_apply {
        let rewritten = (settings.push_down_limit && push_down_limit(node))
            || (settings.merge_expressions && merge_expressions(node));
        if !rewritten {
            break;
        }
        *applied += 1;
    }

    for child in &mut node.children {
        optimize_node(child, settings, applied);
    }
}

fn push_down_limit(node: &mut PlanNode) -> bool {
    let PlanStep::Limit { limit, .. } = node.step else {
        return false;
    };
    if node.children.len() != 1 || !matches!(node.children[0].step, PlanStep::Expression { .. }) {
        return false;
    }
    let Some(mut expression) = node.children.pop() else {
        return false;
    };

    let input = expression
        .children
        .first()
        .map(|child| child.step.output_header().clone())
        .unwrap_or_default();
    let limit_node = PlanNode {
        step: PlanStep::Limit {
            limit,
            output: DataStream::new(input),
        },
        children: mem::take(&mut expression.children),
    };
    expression.children = vec![limit_node];
    *node = expression;
    true
}

fn merge_expressions(node: &mut PlanNode) -> bool {
    if node.children.len() != 1 {
        return false;
    }
    let (
        PlanStep::Expression { actions, .. },
        PlanStep::Expression {
            actions: inner_actions,
            ..
        },
    ) = (&node.step, &node.children[0].step)
    else {
        return false;
    };

    let inner: HashMap<&str, &ExprNode> = inner_actions
        .iter()
        .map(|action| (action.name.as_str(), &action.expr))
        .collect();
    let merged: Vec<ProjectionColumn> = actions
        .iter()
        .map(|action| {
            let expr = action
                .expr
                .substitute_columns(&|name| inner.get(name).map(|expr| (*expr).clone()));
            ProjectionColumn::new(action.name.clone(), expr)
        })
        .collect();

    let output = node.step.output_stream().clone();
    let grandchildren = mem::take(&mut node.children[0].children);
    node.step = PlanStep::Expression {
        actions: merged,
        output,
    };
    node.children = grandchildren;
    true
}
