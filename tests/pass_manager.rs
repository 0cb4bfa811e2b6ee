//! Pass Manager Tests
//!
//! Tests for ordered pass execution:
//! - `run_up_to(n)` executes exactly passes 1..=n
//! - Out of range indices are rejected before any pass runs
//! - Ignoring AST optimizations runs only the mandatory pass

use std::sync::{Arc, Mutex};

use aeroquery::analyzer::build_query_tree;
use aeroquery::ast::{SelectQuery, SyntaxTree};
use aeroquery::context::ExecutionContext;
use aeroquery::error::{AnalyzerError, AnalyzerResult};
use aeroquery::passes::{PassManager, PassRegistry, QueryAnalysisPass, QueryTreePass};
use aeroquery::query_tree::QueryTree;
use aeroquery::types::Value;
use aeroquery::{AnalyzerComponents, SelectInterpreter, SelectQueryOptions};

// =============================================================================
// Helper Functions
// =============================================================================

type Trace = Arc<Mutex<Vec<usize>>>;

/// Pass that appends its id to a shared trace
struct TracingPass {
    id: usize,
    name: String,
    trace: Trace,
}

impl QueryTreePass for TracingPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records its id"
    }

    fn run(&self, _tree: &mut QueryTree, _context: &ExecutionContext) -> AnalyzerResult<()> {
        self.trace.lock().unwrap().push(self.id);
        Ok(())
    }
}

fn tracing_manager(count: usize, trace: &Trace) -> PassManager {
    let mut manager = PassManager::new();
    for id in 1..=count {
        manager.add_pass(Box::new(TracingPass {
            id,
            name: format!("Trace{}", id),
            trace: Arc::clone(trace),
        }));
    }
    manager
}

/// Mandatory pass followed by tracing passes
struct TracingRegistry {
    trace: Trace,
}

impl PassRegistry for TracingRegistry {
    fn register_passes(&self, manager: &mut PassManager) {
        manager.add_pass(Box::new(QueryAnalysisPass));
        for id in 2..=4 {
            manager.add_pass(Box::new(TracingPass {
                id,
                name: format!("Trace{}", id),
                trace: Arc::clone(&self.trace),
            }));
        }
    }
}

fn one_plus_one() -> SyntaxTree {
    SelectQuery::new()
        .column(SyntaxTree::function(
            "plus",
            vec![
                SyntaxTree::literal(Value::UInt(1)),
                SyntaxTree::literal(Value::UInt(1)),
            ],
        ))
        .into_tree()
}

// =============================================================================
// Ordered Execution Tests
// =============================================================================

/// run_up_to(1) executes only the first pass.
#[test]
fn test_run_up_to_one_runs_first_pass_only() {
    let context = ExecutionContext::empty();
    let trace = Trace::default();
    let manager = tracing_manager(4, &trace);

    let mut tree = build_query_tree(&one_plus_one(), &context).unwrap();
    manager.run_up_to(&mut tree, &context, 1).unwrap();

    assert_eq!(*trace.lock().unwrap(), vec![1]);
}

/// run executes every pass in registration order.
#[test]
fn test_run_all_in_order() {
    let context = ExecutionContext::empty();
    let trace = Trace::default();
    let manager = tracing_manager(3, &trace);

    let mut tree = build_query_tree(&one_plus_one(), &context).unwrap();
    manager.run(&mut tree, &context).unwrap();

    assert_eq!(*trace.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(context.metrics().snapshot().passes_executed, 3);
}

/// An index past the catalog is rejected and nothing runs.
#[test]
fn test_out_of_range_rejected_before_running() {
    let context = ExecutionContext::empty();
    let trace = Trace::default();
    let manager = tracing_manager(2, &trace);

    let mut tree = build_query_tree(&one_plus_one(), &context).unwrap();
    let err = manager.run_up_to(&mut tree, &context, 3).unwrap_err();

    assert!(matches!(
        err,
        AnalyzerError::PassIndexOutOfRange {
            requested: 3,
            available: 2
        }
    ));
    assert!(trace.lock().unwrap().is_empty());
}

/// Dump lists passes with their descriptions.
#[test]
fn test_dump_lists_passes() {
    let trace = Trace::default();
    let manager = tracing_manager(2, &trace);

    assert_eq!(
        manager.dump(2).unwrap(),
        "1. Trace1: Records its id\n2. Trace2: Records its id\n"
    );
}

// =============================================================================
// Interpreter Integration Tests
// =============================================================================

/// Ignoring AST optimizations skips every pass after the mandatory one.
#[test]
fn test_ignore_ast_optimizations_runs_mandatory_only() {
    let trace = Trace::default();
    let components = AnalyzerComponents::default().with_pass_registry(Arc::new(TracingRegistry {
        trace: Arc::clone(&trace),
    }));

    SelectInterpreter::with_components(
        &one_plus_one(),
        &ExecutionContext::empty(),
        SelectQueryOptions::new().ignore_ast_optimizations(true),
        components.clone(),
    )
    .unwrap();
    assert!(trace.lock().unwrap().is_empty());

    SelectInterpreter::with_components(
        &one_plus_one(),
        &ExecutionContext::empty(),
        SelectQueryOptions::new(),
        components,
    )
    .unwrap();
    assert_eq!(*trace.lock().unwrap(), vec![2, 3, 4]);
}

/// Constant folding only happens when optimizations run.
#[test]
fn test_constant_folding_skipped_when_ignored() {
    let context = ExecutionContext::empty();

    let mut folded =
        SelectInterpreter::new(&one_plus_one(), &context, SelectQueryOptions::new()).unwrap();
    let mut raw = SelectInterpreter::new(
        &one_plus_one(),
        &context,
        SelectQueryOptions::new().ignore_ast_optimizations(true),
    )
    .unwrap();

    assert!(folded.explain_plan().unwrap().contains("2 AS plus(1, 1)"));
    assert!(raw.explain_plan().unwrap().contains("plus(1, 1)"));
    assert!(!raw.explain_plan().unwrap().contains("2 AS"));
}
