//! Value and column types shared by every stage of analysis
//!
//! The type set is closed: anything the analyzer resolves must land on one
//! of these variants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical column type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of a bare NULL literal
    Nothing,
    Bool,
    UInt8,
    UInt32,
    UInt64,
    Int64,
    Float64,
    String,
    Nullable(Box<DataType>),
}

impl DataType {
    /// Wraps a type into `Nullable`, leaving already nullable types alone
    pub fn nullable(inner: DataType) -> DataType {
        match inner {
            DataType::Nullable(_) => inner,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    /// Returns true for `Nullable(..)` types
    pub fn is_nullable(&self) -> bool {
        matches!(self, DataType::Nullable(_))
    }

    /// Strips one level of `Nullable`
    pub fn remove_nullable(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Returns true for integer and floating point types
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.remove_nullable(),
            DataType::UInt8
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Int64
                | DataType::Float64
        )
    }

    /// Returns true for `UInt8`, `UInt32` and `UInt64`
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self.remove_nullable(),
            DataType::UInt8 | DataType::UInt32 | DataType::UInt64
        )
    }

    /// Returns true if the type may be used as a filter condition.
    ///
    /// `UInt8` is accepted alongside `Bool`, as is `Nullable(Nothing)`.
    pub fn is_filter_compatible(&self) -> bool {
        matches!(
            self.remove_nullable(),
            DataType::Bool | DataType::UInt8 | DataType::Nothing
        )
    }

    /// Least common type of two types, if one exists
    pub fn supertype(left: &DataType, right: &DataType) -> Option<DataType> {
        if left == right {
            return Some(left.clone());
        }

        if left.is_nullable() || right.is_nullable() {
            let inner = match (left.remove_nullable(), right.remove_nullable()) {
                (DataType::Nothing, other) | (other, DataType::Nothing) => other.clone(),
                (l, r) => DataType::supertype(l, r)?,
            };
            return Some(DataType::nullable(inner));
        }

        match (left, right) {
            (DataType::Nothing, other) | (other, DataType::Nothing) => {
                Some(DataType::nullable(other.clone()))
            }
            (l, r) if l.is_numeric() && r.is_numeric() => {
                if *l == DataType::Float64 || *r == DataType::Float64 {
                    Some(DataType::Float64)
                } else if l.is_unsigned() && r.is_unsigned() {
                    Some(DataType::UInt64)
                } else {
                    Some(DataType::Int64)
                }
            }
            _ => None,
        }
    }

    /// Type name as rendered in headers and error messages
    pub fn name(&self) -> String {
        match self {
            DataType::Nothing => "Nothing".to_string(),
            DataType::Bool => "Bool".to_string(),
            DataType::UInt8 => "UInt8".to_string(),
            DataType::UInt32 => "UInt32".to_string(),
            DataType::UInt64 => "UInt64".to_string(),
            DataType::Int64 => "Int64".to_string(),
            DataType::Float64 => "Float64".to_string(),
            DataType::String => "String".to_string(),
            DataType::Nullable(inner) => format!("Nullable({})", inner.name()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Natural type of a literal value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::nullable(DataType::Nothing),
            Value::Bool(_) => DataType::Bool,
            Value::UInt(_) => DataType::UInt64,
            Value::Int(_) => DataType::Int64,
            Value::Float(_) => DataType::Float64,
            Value::String(_) => DataType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness as used by filters. `None` for values that are not
    /// filter-compatible.
    pub fn as_filter_flag(&self) -> Option<bool> {
        match self {
            Value::Null => Some(false),
            Value::Bool(b) => Some(*b),
            Value::UInt(v) => Some(*v != 0),
            Value::Int(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

/// Name and type of one output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl ColumnHeader {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns describing a stream.
///
/// A block here never carries data: it is the sample block (header) of a
/// plan or pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    columns: Vec<ColumnHeader>,
}

impl Block {
    pub fn new(columns: Vec<ColumnHeader>) -> Self {
        Self { columns }
    }

    pub fn push(&mut self, column: ColumnHeader) {
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[ColumnHeader] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Finds a column by name
    pub fn get(&self, name: &str) -> Option<&ColumnHeader> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", column.name, column.data_type)?;
        }
        Ok(())
    }
}
