//! Built-in scalar functions: return type resolution and constant evaluation

use std::cmp::Ordering;

use crate::error::SemanticError;
use crate::types::{DataType, Value};

pub const SHARD_NUM_FUNCTION: &str = "shardNum";
pub const SHARD_COUNT_FUNCTION: &str = "shardCount";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionClass {
    Arithmetic,
    Comparison,
    Logical,
    Not,
    ShardIdentity,
}

fn classify(name: &str) -> Option<FunctionClass> {
    match name {
        "plus" | "minus" | "multiply" => Some(FunctionClass::Arithmetic),
        "equals" | "notEquals" | "less" | "greater" | "lessOrEquals" | "greaterOrEquals" => {
            Some(FunctionClass::Comparison)
        }
        "and" | "or" => Some(FunctionClass::Logical),
        "not" => Some(FunctionClass::Not),
        SHARD_NUM_FUNCTION | SHARD_COUNT_FUNCTION => Some(FunctionClass::ShardIdentity),
        _ => None,
    }
}

fn wrap_nullable(result: DataType, args: &[DataType]) -> DataType {
    if args.iter().any(DataType::is_nullable) {
        DataType::nullable(result)
    } else {
        result
    }
}

fn expect_arity(name: &str, args: &[DataType], expected: usize) -> Result<(), SemanticError> {
    if args.len() != expected {
        return Err(SemanticError::invalid_arguments(format!(
            "Function {} expects {} arguments, got {}",
            name,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn comparable(left: &DataType, right: &DataType) -> bool {
    let (l, r) = (left.remove_nullable(), right.remove_nullable());
    *l == DataType::Nothing
        || *r == DataType::Nothing
        || (l.is_numeric() && r.is_numeric())
        || l == r
}

/// Resolves the result type of `name(args...)`
pub fn resolve_function(name: &str, args: &[DataType]) -> Result<DataType, SemanticError> {
    let class = classify(name).ok_or_else(|| SemanticError::unknown_function(name))?;

    match class {
        FunctionClass::Arithmetic => {
            expect_arity(name, args, 2)?;
            let (l, r) = (args[0].remove_nullable(), args[1].remove_nullable());
            let base = match (l, r) {
                (DataType::Nothing, DataType::Nothing) => DataType::Nothing,
                (DataType::Nothing, other) | (other, DataType::Nothing) if other.is_numeric() => {
                    other.clone()
                }
                (l, r) if l.is_numeric() && r.is_numeric() => {
                    DataType::supertype(l, r).unwrap_or(DataType::Float64)
                }
                _ => {
                    return Err(SemanticError::type_mismatch(format!(
                        "Illegal types {} and {} of arguments of function {}",
                        args[0], args[1], name
                    )))
                }
            };
            // Unsigned differences can be negative
            let base = if name == "minus" && base.is_unsigned() {
                DataType::Int64
            } else {
                base
            };
            Ok(wrap_nullable(base, args))
        }
        FunctionClass::Comparison => {
            expect_arity(name, args, 2)?;
            if !comparable(&args[0], &args[1]) {
                return Err(SemanticError::type_mismatch(format!(
                    "Illegal types {} and {} of arguments of function {}",
                    args[0], args[1], name
                )));
            }
            Ok(wrap_nullable(DataType::Bool, args))
        }
        FunctionClass::Logical => {
            if args.len() < 2 {
                return Err(SemanticError::invalid_arguments(format!(
                    "Function {} expects at least 2 arguments, got {}",
                    name,
                    args.len()
                )));
            }
            if let Some(bad) = args.iter().find(|t| !t.is_filter_compatible()) {
                return Err(SemanticError::type_mismatch(format!(
                    "Illegal type {} of argument of function {}",
                    bad, name
                )));
            }
            Ok(wrap_nullable(DataType::Bool, args))
        }
        FunctionClass::Not => {
            expect_arity(name, args, 1)?;
            if !args[0].is_filter_compatible() {
                return Err(SemanticError::type_mismatch(format!(
                    "Illegal type {} of argument of function not",
                    args[0]
                )));
            }
            Ok(wrap_nullable(DataType::Bool, args))
        }
        FunctionClass::ShardIdentity => {
            expect_arity(name, args, 0)?;
            Ok(DataType::UInt32)
        }
    }
}

/// Orders two constants of comparable types
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::UInt(a), Value::UInt(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::UInt(a), Value::Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
        (Value::Int(a), Value::UInt(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Float(a), other) => as_f64(other).and_then(|b| a.partial_cmp(&b)),
        (other, Value::Float(b)) => as_f64(other).and_then(|a| a.partial_cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::UInt(v) => Some(*v as f64),
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::UInt(v) => i64::try_from(*v).ok(),
        Value::Int(v) => Some(*v),
        _ => None,
    }
}

fn arithmetic(name: &str, left: &Value, right: &Value) -> Option<Value> {
    if matches!(left, Value::Float(_)) || matches!(right, Value::Float(_)) {
        let (a, b) = (as_f64(left)?, as_f64(right)?);
        return Some(Value::Float(match name {
            "plus" => a + b,
            "minus" => a - b,
            _ => a * b,
        }));
    }

    if let (Value::UInt(a), Value::UInt(b), false) = (left, right, name == "minus") {
        let result = match name {
            "plus" => a.checked_add(*b),
            _ => a.checked_mul(*b),
        };
        return result.map(Value::UInt);
    }

    let (a, b) = (as_i64(left)?, as_i64(right)?);
    let result = match name {
        "plus" => a.checked_add(b),
        "minus" => a.checked_sub(b),
        _ => a.checked_mul(b),
    };
    result.map(Value::Int)
}

/// Evaluates a function over constant arguments.
///
/// `None` means the call cannot be folded (overflow, unsupported
/// combination) and must stay in the tree.
pub fn evaluate_constant(name: &str, args: &[Value]) -> Option<Value> {
    match classify(name)? {
        FunctionClass::Logical => {
            let flags: Vec<Option<bool>> = args
                .iter()
                .map(|v| if v.is_null() { None } else { v.as_filter_flag() })
                .collect();
            let decisive = name == "or";
            if flags.iter().any(|f| *f == Some(decisive)) {
                return Some(Value::Bool(decisive));
            }
            if args.iter().any(Value::is_null) {
                return Some(Value::Null);
            }
            Some(Value::Bool(!decisive))
        }
        _ if args.iter().any(Value::is_null) => Some(Value::Null),
        FunctionClass::Arithmetic => arithmetic(name, args.first()?, args.get(1)?),
        FunctionClass::Comparison => {
            let ordering = compare_values(args.first()?, args.get(1)?)?;
            let result = match name {
                "equals" => ordering == Ordering::Equal,
                "notEquals" => ordering != Ordering::Equal,
                "less" => ordering == Ordering::Less,
                "greater" => ordering == Ordering::Greater,
                "lessOrEquals" => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Some(Value::Bool(result))
        }
        FunctionClass::Not => Some(Value::Bool(!args.first()?.as_filter_flag()?)),
        FunctionClass::ShardIdentity => None,
    }
}
