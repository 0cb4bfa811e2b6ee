//! Context Derivation Tests
//!
//! Tests for per-query context derivation:
//! - The caller's context is never mutated
//! - Shard identity becomes `_shard_num` / `_shard_count` scalars
//! - Derived contexts share catalog and metrics with their base

use aeroquery::ast::{SelectQuery, SyntaxTree};
use aeroquery::catalog::{InMemoryCatalog, TableSchema};
use aeroquery::context::{derive_context, ExecutionContext, SHARD_COUNT, SHARD_NUM};
use aeroquery::types::{ColumnHeader, DataType, Value};
use aeroquery::{SelectInterpreter, SelectQueryOptions};

// =============================================================================
// Helper Functions
// =============================================================================

fn context() -> ExecutionContext {
    ExecutionContext::with_catalog(InMemoryCatalog::new().with_table(TableSchema::new(
        "events",
        vec![ColumnHeader::new("id", DataType::UInt64)],
    )))
}

// =============================================================================
// Base Context Isolation Tests
// =============================================================================

/// Derivation leaves every field of the base context untouched.
#[test]
fn test_base_context_unchanged() {
    let base = context();
    let query_id = base.query_id();
    let settings = base.settings().clone();
    let scalars = base.special_scalars().clone();

    let derived = derive_context(&base, &SelectQueryOptions::new().set_shard_info(2, 4));

    assert_eq!(base.query_id(), query_id);
    assert_eq!(base.settings(), &settings);
    assert_eq!(base.special_scalars(), &scalars);
    assert!(base.special_scalar(SHARD_NUM).is_none());
    assert_eq!(derived.special_scalars().len(), 2);
}

/// Constructing an interpreter does not touch the caller's context.
#[test]
fn test_interpreter_does_not_mutate_caller() {
    let base = context();
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("_shard_num"))
        .from_table("events")
        .into_tree();

    let mut interpreter =
        SelectInterpreter::new(&query, &base, SelectQueryOptions::new().set_shard_info(1, 2))
            .unwrap();
    interpreter.execute().unwrap();

    assert!(base.special_scalars().is_empty());
    assert!(interpreter.context().special_scalar(SHARD_NUM).is_some());
    assert!(interpreter.context().shares_state_with(&base));
}

// =============================================================================
// Shard Scalar Tests
// =============================================================================

/// shard_num = 3 injects a one-row UInt32 scalar.
#[test]
fn test_shard_num_scalar() {
    let options = SelectQueryOptions {
        shard_num: Some(3),
        ..Default::default()
    };
    let derived = derive_context(&context(), &options);

    let scalar = derived.special_scalar(SHARD_NUM).unwrap();
    assert_eq!(scalar.value, Value::UInt(3));
    assert_eq!(scalar.data_type, DataType::UInt32);
    assert_eq!(scalar.rows, 1);
    assert!(derived.special_scalar(SHARD_COUNT).is_none());
}

/// No shard options, no scalars.
#[test]
fn test_no_scalars_without_shard_options() {
    let derived = derive_context(&context(), &SelectQueryOptions::new());
    assert!(derived.special_scalar(SHARD_NUM).is_none());
    assert!(derived.special_scalar(SHARD_COUNT).is_none());
}

/// Shard scalars resolve in projections as UInt32 columns.
#[test]
fn test_shard_scalars_in_header() {
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("_shard_num"))
        .column(SyntaxTree::identifier("_shard_count"))
        .from_table("events")
        .into_tree();

    let header = SelectInterpreter::sample_block_for(
        &query,
        &context(),
        SelectQueryOptions::new().set_shard_info(2, 4),
    )
    .unwrap();

    assert_eq!(header.to_string(), "_shard_num UInt32, _shard_count UInt32");
}

/// Metrics are shared between the base and derived contexts.
#[test]
fn test_metrics_shared_with_base() {
    let base = context();
    let query = SelectQuery::new()
        .column(SyntaxTree::identifier("id"))
        .from_table("events")
        .into_tree();

    SelectInterpreter::sample_block_for(&query, &base, SelectQueryOptions::new().set_shard_info(0, 1))
        .unwrap();

    let snapshot = base.metrics().snapshot();
    assert_eq!(snapshot.queries_analyzed, 1);
    assert_eq!(snapshot.plans_built, 1);
}
