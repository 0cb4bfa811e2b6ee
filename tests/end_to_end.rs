//! End-to-End Tests
//!
//! Full compilation from syntax tree to pipeline:
//! - Top level shape validation
//! - Sharded execution with quota
//! - Plan shape per processing stage
//! - Configuration driven contexts

use std::io::Write;

use aeroquery::analyzer::normalize_and_validate;
use aeroquery::ast::{SelectQuery, SyntaxTree, UnionMode};
use aeroquery::catalog::{InMemoryCatalog, TableSchema};
use aeroquery::config::EngineConfig;
use aeroquery::context::ExecutionContext;
use aeroquery::error::AnalyzerError;
use aeroquery::types::{ColumnHeader, DataType, Value};
use aeroquery::{QueryProcessingStage, SelectInterpreter, SelectQueryOptions};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn context() -> ExecutionContext {
    ExecutionContext::with_catalog(InMemoryCatalog::new().with_table(TableSchema::new(
        "events",
        vec![
            ColumnHeader::new("id", DataType::UInt64),
            ColumnHeader::new("kind", DataType::String),
        ],
    )))
}

fn clicks() -> SyntaxTree {
    SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .from_table("events")
        .filter(SyntaxTree::function(
            "equals",
            vec![
                SyntaxTree::identifier("kind"),
                SyntaxTree::literal(Value::String("click".into())),
            ],
        ))
        .limit(10)
        .into_tree()
}

// =============================================================================
// Shape Validation Tests
// =============================================================================

/// SELECT and UNION nodes are returned unchanged.
#[test]
fn test_select_and_union_pass_validation() {
    let select = clicks();
    assert_eq!(normalize_and_validate(&select).unwrap(), &select);

    let union = SyntaxTree::union(UnionMode::All, vec![clicks(), clicks()]);
    assert_eq!(normalize_and_validate(&union).unwrap(), &union);
}

/// A subquery is unwrapped to its child.
#[test]
fn test_subquery_unwrapped() {
    let subquery = SyntaxTree::subquery(clicks());
    assert_eq!(normalize_and_validate(&subquery).unwrap(), &clicks());
}

/// Other node kinds are rejected before any analysis.
#[test]
fn test_other_shapes_rejected() {
    let context = context();
    let show = SyntaxTree::ShowTables { database: None };

    let err = SelectInterpreter::new(&show, &context, SelectQueryOptions::new()).unwrap_err();

    assert!(matches!(err, AnalyzerError::UnsupportedQueryShape { .. }));
    assert!(err.to_string().contains("SHOW TABLES"));
    assert_eq!(context.metrics().snapshot().queries_rejected, 1);
}

// =============================================================================
// Execution Tests
// =============================================================================

/// Sharded complete execution yields a pipeline with the quota attached.
#[test]
fn test_sharded_execute_attaches_quota() {
    let context = context();
    let options = SelectQueryOptions::new()
        .set_shard_info(2, 4)
        .analyze(false)
        .with_stage(QueryProcessingStage::Complete);

    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .column(SyntaxTree::function("shardNum", vec![]))
        .from_table("events")
        .into_tree();

    let mut interpreter = SelectInterpreter::new(&query, &context, options).unwrap();
    let result = interpreter.execute().unwrap();

    assert!(result.has_quota());
    let pipeline = result.into_pipeline();
    assert!(!pipeline.processors().is_empty());
    assert_eq!(pipeline.header().to_string(), "id UInt64, shardNum() UInt32");
}

/// Complete stage plans filter, projection and limit.
#[test]
fn test_complete_plan_shape() {
    let mut interpreter =
        SelectInterpreter::new(&clicks(), &context(), SelectQueryOptions::new()).unwrap();

    assert_eq!(
        interpreter.explain_plan().unwrap(),
        "Limit (10)\n  Expression (id)\n    Filter (equals(kind, 'click'))\n      ReadFromStorage (default.events: id, kind)\n"
    );
}

/// Fetch-columns stage plans only the read.
#[test]
fn test_fetch_columns_plan_shape() {
    let options = SelectQueryOptions::new().with_stage(QueryProcessingStage::FetchColumns);
    let mut interpreter = SelectInterpreter::new(&clicks(), &context(), options).unwrap();

    let plan = interpreter.query_plan().unwrap();
    assert_eq!(plan.step_count(), 1);
    assert!(plan.explain().starts_with("ReadFromStorage"));
}

/// UNION DISTINCT adds a distinct step over the union.
#[test]
fn test_union_distinct_plan() {
    let query = SyntaxTree::union(UnionMode::Distinct, vec![clicks(), clicks()]);
    let mut interpreter =
        SelectInterpreter::new(&query, &context(), SelectQueryOptions::new()).unwrap();

    let explain = interpreter.explain_plan().unwrap();
    assert!(explain.starts_with("Distinct\n  Union\n"));
    assert_eq!(interpreter.sample_block().unwrap().names(), vec!["id"]);
}

/// A filter that is always false keeps a false filter under an empty limit.
#[test]
fn test_false_filter_becomes_empty_limit() {
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .from_table("events")
        .filter(SyntaxTree::literal(Value::Bool(false)))
        .into_tree();
    let mut interpreter =
        SelectInterpreter::new(&query, &context(), SelectQueryOptions::new()).unwrap();

    assert_eq!(
        interpreter.explain_plan().unwrap(),
        "Limit (0)\n  Expression (id)\n    Filter (false)\n      ReadFromStorage (default.events: id)\n"
    );
}

/// Optimizations never let a partial stage return rows a false filter drops.
#[test]
fn test_false_filter_kept_at_mergeable_state() {
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .from_table("events")
        .filter(SyntaxTree::function(
            "equals",
            vec![
                SyntaxTree::literal(Value::UInt(1)),
                SyntaxTree::literal(Value::UInt(2)),
            ],
        ))
        .into_tree();
    let stage = SelectQueryOptions::new().with_stage(QueryProcessingStage::WithMergeableState);

    let mut optimized = SelectInterpreter::new(&query, &context(), stage).unwrap();
    let mut unoptimized =
        SelectInterpreter::new(&query, &context(), stage.ignore_ast_optimizations(true)).unwrap();

    assert_eq!(
        unoptimized.explain_plan().unwrap(),
        "Expression (id)\n  Filter (equals(1, 2))\n    ReadFromStorage (default.events: id)\n"
    );
    assert_eq!(
        optimized.explain_plan().unwrap(),
        "Expression (id)\n  Filter (false)\n    ReadFromStorage (default.events: id)\n"
    );
    assert_eq!(
        optimized.sample_block().unwrap(),
        unoptimized.sample_block().unwrap()
    );

    let pipeline = optimized.build_query_pipeline().unwrap();
    assert!(pipeline
        .processors()
        .iter()
        .any(|p| p.name == "FilterTransform"));
}

/// Unknown columns are rejected with a semantic error.
#[test]
fn test_unknown_column_rejected() {
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("missing"))
        .from_table("events")
        .into_tree();

    let err = SelectInterpreter::new(&query, &context(), SelectQueryOptions::new()).unwrap_err();
    assert_eq!(err.code(), "AERO_SEMANTIC_ANALYSIS");
}

// =============================================================================
// Configuration Tests
// =============================================================================

/// A configuration file drives catalog, settings and quota.
#[test]
fn test_context_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "settings": { "max_threads": 3, "max_rows_to_read": 1000 },
            "tables": [
                { "name": "events", "columns": [{ "name": "id", "type": "UInt64" }] }
            ],
            "quota": { "name": "batch" }
        }"#,
    )
    .unwrap();

    let context = EngineConfig::load(file.path()).unwrap().into_context();
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .from_table("events")
        .into_tree();

    let mut interpreter = SelectInterpreter::new(&query, &context, SelectQueryOptions::new()).unwrap();
    let result = interpreter.execute().unwrap();
    let pipeline = result.pipeline();

    assert_eq!(pipeline.num_threads(), 3);
    assert_eq!(result.quota().unwrap().name(), "batch");

    let source = &pipeline.processors()[0];
    assert!(source.is_source());
    assert_eq!(source.limits[0].max_rows, Some(1000));
}
