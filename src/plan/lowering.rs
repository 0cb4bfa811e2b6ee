//! Query tree to logical plan
//!
//! A SELECT is lowered to, bottom-up:
//! 1. Source (`ReadFromStorage`, `ReadFromSystemOne` or the subquery plan)
//! 2. `Filter` for WHERE
//! 3. `Expression` computing the projection
//! 4. `Limit`
//!
//! A UNION fans the member plans into `Union`, followed by `Distinct`
//! for UNION DISTINCT. `FetchColumns` stops after the source;
//! `WithMergeableState` leaves out the steps applied after merging
//! (`Limit`, `Distinct`).

use crate::ast::UnionMode;
use crate::options::QueryProcessingStage;
use crate::query_tree::{QueryNode, QueryTree, TableNode, UnionNode};
use crate::types::{Block, ColumnHeader};

use super::query_plan::QueryPlan;
use super::step::{DataStream, PlanStep};

/// Builds the logical plan of `tree` up to `stage`
pub fn build_plan(tree: &QueryTree, stage: QueryProcessingStage) -> QueryPlan {
    match tree {
        QueryTree::Query(query) => plan_query(query, stage),
        QueryTree::Union(union) => plan_union(union, stage),
    }
}

fn plan_query(query: &QueryNode, stage: QueryProcessingStage) -> QueryPlan {
    let mut plan = plan_source(query);
    if stage == QueryProcessingStage::FetchColumns {
        return plan;
    }

    if let Some(predicate) = &query.where_expr {
        let header = plan.header();
        plan.add_step(PlanStep::Filter {
            predicate: predicate.clone(),
            output: DataStream::new(header),
        });
    }

    plan.add_step(PlanStep::Expression {
        actions: query.projection.clone(),
        output: DataStream::new(query.header()),
    });

    if let (Some(limit), QueryProcessingStage::Complete) = (query.limit, stage) {
        let header = plan.header();
        plan.add_step(PlanStep::Limit {
            limit,
            output: DataStream::new(header),
        });
    }
    plan
}

fn plan_source(query: &QueryNode) -> QueryPlan {
    match &query.from {
        TableNode::One => {
            let mut plan = QueryPlan::new();
            plan.add_step(PlanStep::ReadOne {
                output: DataStream::new(query.from.header()),
            });
            plan
        }
        TableNode::Table(schema) => {
            let columns = required_columns(query, &schema.header());
            let names = columns.iter().map(|c| c.name.clone()).collect();

            let mut plan = QueryPlan::new();
            plan.add_step(PlanStep::ReadFromStorage {
                database: schema.database.clone(),
                table: schema.name.clone(),
                columns: names,
                output: DataStream::new(Block::new(columns)),
            });
            plan
        }
        // Inner results are always needed in full
        TableNode::Subquery(tree) => build_plan(tree, QueryProcessingStage::Complete),
    }
}

/// Table columns read by the query, in table order.
///
/// A query that references no column still reads the first one so the
/// source produces the right number of rows.
fn required_columns(query: &QueryNode, source: &Block) -> Vec<ColumnHeader> {
    let mut referenced: Vec<String> = Vec::new();
    let exprs = query
        .projection
        .iter()
        .map(|column| &column.expr)
        .chain(query.where_expr.iter());
    for expr in exprs {
        for name in expr.referenced_columns() {
            if !referenced.contains(&name) {
                referenced.push(name);
            }
        }
    }

    let columns: Vec<ColumnHeader> = source
        .columns()
        .iter()
        .filter(|column| referenced.contains(&column.name))
        .cloned()
        .collect();

    if columns.is_empty() {
        source.columns().iter().take(1).cloned().collect()
    } else {
        columns
    }
}

fn plan_union(union: &UnionNode, stage: QueryProcessingStage) -> QueryPlan {
    let plans: Vec<QueryPlan> = union
        .queries
        .iter()
        .map(|member| build_plan(member, stage))
        .collect();

    let header = if stage == QueryProcessingStage::FetchColumns {
        plans.first().map(QueryPlan::header).unwrap_or_default()
    } else {
        union.header()
    };

    let mut plan = QueryPlan::new();
    plan.unite_plans(
        PlanStep::Union {
            output: DataStream::new(header.clone()),
        },
        plans,
    );

    if union.mode == UnionMode::Distinct && stage == QueryProcessingStage::Complete {
        plan.add_step(PlanStep::Distinct {
            output: DataStream::new(header),
        });
    }
    plan
}
