//! Derivation of per-query contexts

use crate::options::SelectQueryOptions;

use super::execution::ExecutionContext;
use super::scalar::{SpecialScalar, SHARD_COUNT, SHARD_NUM};

/// Derives the context a SELECT is compiled under.
///
/// The base context is only read. Shard identity from the options is
/// injected as `UInt32` special scalars; all other options are consumed
/// later by the planner and pipeline builder.
pub fn derive_context(base: &ExecutionContext, options: &SelectQueryOptions) -> ExecutionContext {
    let mut context = base.create_copy();

    if let Some(shard_num) = options.shard_num {
        context.add_special_scalar(SpecialScalar::uint32(SHARD_NUM, shard_num));
    }
    if let Some(shard_count) = options.shard_count {
        context.add_special_scalar(SpecialScalar::uint32(SHARD_COUNT, shard_count));
    }

    context
}
