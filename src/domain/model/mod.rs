//! Domain model for the tourism-arrivals dataset: column schema, scalar values and records.

use serde_json::Value as JsonValue;
use std::fmt;

pub mod record;
pub mod registry;
pub mod serializer;

pub use record::{FieldChange, FieldChanges, Record, YearProjection};
pub use registry::{SchemaRegistry, TOURISM_ARRIVALS};
pub use serializer::{projection_to_json, to_json, to_json_many};

/// Scalar type a column is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Int,
}

impl ColumnType {
    /// Name reported to API callers in type-mismatch messages.
    pub fn type_name(self) -> &'static str {
        match self {
            ColumnType::Text => "str",
            ColumnType::Int => "int",
        }
    }

    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Int => "INTEGER",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One entry of the column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl ColumnSpec {
    pub const fn text(name: &'static str, nullable: bool) -> Self {
        Self {
            name,
            col_type: ColumnType::Text,
            nullable,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            col_type: ColumnType::Int,
            nullable: true,
        }
    }

    /// Converts a JSON value into this column's scalar type.
    ///
    /// Null is always accepted here; nullability is a separate rule. Returns `None`
    /// when the JSON type does not match the declared type exactly.
    pub fn scalar_from_json(&self, value: &JsonValue) -> Option<ScalarValue> {
        match (self.col_type, value) {
            (_, JsonValue::Null) => Some(ScalarValue::Null),
            (ColumnType::Text, JsonValue::String(s)) => Some(ScalarValue::Text(s.clone())),
            (ColumnType::Int, JsonValue::Number(n)) => n.as_i64().map(ScalarValue::Int),
            _ => None,
        }
    }
}

/// A JSON number with no fractional part that does not fit in an `i64`.
///
/// Integer literals past `u64::MAX` are parsed as floats, so a whole-valued
/// float of that magnitude counts too.
pub fn is_oversized_integer(value: &JsonValue) -> bool {
    let JsonValue::Number(n) = value else {
        return false;
    };
    if n.is_i64() {
        return false;
    }
    if n.is_u64() {
        return true;
    }
    n.as_f64()
        .is_some_and(|f| f.is_finite() && f.fract() == 0.0 && f.abs() >= i64::MAX as f64)
}

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScalarValue {
    #[default]
    Null,
    Text(String),
    Int(i64),
}

impl ScalarValue {
    /// Null or an empty string.
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Text(s) => s.is_empty(),
            ScalarValue::Int(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            ScalarValue::Null => JsonValue::Null,
            ScalarValue::Text(s) => JsonValue::from(s.as_str()),
            ScalarValue::Int(n) => JsonValue::from(*n),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Text(s) => f.write_str(s),
            ScalarValue::Int(n) => write!(f, "{}", n),
        }
    }
}
