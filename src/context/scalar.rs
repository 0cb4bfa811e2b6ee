//! Special scalars exposing distributed identity to expressions

use crate::types::{DataType, Value};

/// Scalar holding the number of the shard a sub-query runs on
pub const SHARD_NUM: &str = "_shard_num";
/// Scalar holding the total number of shards
pub const SHARD_COUNT: &str = "_shard_count";

/// Named single-row constant
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialScalar {
    pub name: String,
    pub value: Value,
    pub data_type: DataType,
    pub rows: usize,
}

impl SpecialScalar {
    /// One-row `UInt32` scalar
    pub fn uint32(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value: Value::UInt(u64::from(value)),
            data_type: DataType::UInt32,
            rows: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint32_scalar_shape() {
        let scalar = SpecialScalar::uint32(SHARD_NUM, 3);
        assert_eq!(scalar.name, "_shard_num");
        assert_eq!(scalar.value, Value::UInt(3));
        assert_eq!(scalar.data_type, DataType::UInt32);
        assert_eq!(scalar.rows, 1);
    }
}
