//! Payload validation for inserts and partial updates.
//!
//! Rules short-circuit on the first violation, in this order:
//!
//! - insert: missing keys, per-field type, empty identity column, unknown key
//! - update: unknown key, per-field type, empty identity column, unchanged value,
//!   primary key change

use crate::domain::model::{
    is_oversized_integer, ColumnSpec, ColumnType, FieldChange, FieldChanges, Record, ScalarValue,
    SchemaRegistry,
};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

type JsonMap = Map<String, JsonValue>;

/// Why a payload was refused. `Display` is the message returned to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationFailure {
    #[error("Missing required keys: {}", .columns.join(", "))]
    MissingRequiredField { columns: Vec<&'static str> },

    #[error("The value entered for {column} should be of type: {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: ColumnType,
    },

    #[error("The value entered for {column} is outside the 64-bit integer range")]
    IntegerOutOfRange { column: &'static str },

    #[error("The value entered for {column} cannot be empty or null")]
    NullOnNonNullable { column: &'static str },

    #[error("Invalid key entry: That column name does not exist.")]
    UnknownColumn { column: String },

    #[error("Value entered of '{value}' for '{column}' already exists in the database")]
    DuplicateValue {
        column: &'static str,
        value: ScalarValue,
    },

    #[error("The value entered for {column} cannot be changed")]
    ImmutableKey { column: &'static str },
}

/// Type-checked fields of a payload, in schema order.
struct TypedFields(Vec<FieldChange>);

impl TypedFields {
    fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.0
            .iter()
            .find(|f| f.column.name == column)
            .map(|f| &f.value)
    }
}

fn typed_fields(schema: &SchemaRegistry, payload: &JsonMap) -> Result<TypedFields, ValidationFailure> {
    let mut fields = Vec::with_capacity(payload.len());
    for column in schema.columns() {
        let Some(raw) = payload.get(column.name) else {
            continue;
        };
        fields.push(FieldChange {
            column,
            value: check_type(column, raw)?,
        });
    }
    Ok(TypedFields(fields))
}

fn check_type(column: &'static ColumnSpec, raw: &JsonValue) -> Result<ScalarValue, ValidationFailure> {
    match column.scalar_from_json(raw) {
        Some(value) => Ok(value),
        None if column.col_type == ColumnType::Int && is_oversized_integer(raw) => {
            Err(ValidationFailure::IntegerOutOfRange {
                column: column.name,
            })
        }
        None => Err(ValidationFailure::TypeMismatch {
            column: column.name,
            expected: column.col_type,
        }),
    }
}

fn check_identity_columns(schema: &SchemaRegistry, fields: &TypedFields) -> Result<(), ValidationFailure> {
    for column in schema.non_nullable_columns() {
        if fields.get(column.name).is_some_and(ScalarValue::is_null_or_empty) {
            return Err(ValidationFailure::NullOnNonNullable {
                column: column.name,
            });
        }
    }
    Ok(())
}

fn check_known_columns(schema: &SchemaRegistry, payload: &JsonMap) -> Result<(), ValidationFailure> {
    match payload.keys().find(|k| schema.column(k).is_none()) {
        Some(unknown) => Err(ValidationFailure::UnknownColumn {
            column: unknown.clone(),
        }),
        None => Ok(()),
    }
}

/// Validates a full payload for a new record and builds the record from it.
pub fn validate_for_insert(
    schema: &'static SchemaRegistry,
    payload: &JsonMap,
) -> Result<Record, ValidationFailure> {
    let missing: Vec<&'static str> = schema
        .column_names()
        .filter(|name| !payload.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::MissingRequiredField { columns: missing });
    }

    let fields = typed_fields(schema, payload)?;
    check_identity_columns(schema, &fields)?;
    check_known_columns(schema, payload)?;

    let mut record = Record::empty(schema);
    for field in fields.0 {
        record.set(field.column.name, field.value);
    }
    Ok(record)
}

/// Validates a partial payload against the stored record it would modify.
///
/// An incoming value equal to the stored one is rejected: a no-op update is
/// reported to the caller instead of silently succeeding.
pub fn validate_for_update(
    existing: &Record,
    payload: &JsonMap,
) -> Result<FieldChanges, ValidationFailure> {
    let schema = existing.schema();

    check_known_columns(schema, payload)?;
    let fields = typed_fields(schema, payload)?;
    check_identity_columns(schema, &fields)?;

    let mut changes = Vec::with_capacity(fields.0.len());
    for key in payload.keys() {
        let (Some(column), Some(incoming)) = (schema.column(key), fields.get(key)) else {
            continue;
        };
        if existing.get(column.name) == Some(incoming) {
            return Err(ValidationFailure::DuplicateValue {
                column: column.name,
                value: incoming.clone(),
            });
        }
        changes.push(FieldChange {
            column,
            value: incoming.clone(),
        });
    }

    let pk = schema.primary_key_field();
    if changes.iter().any(|c| c.column.name == pk) {
        return Err(ValidationFailure::ImmutableKey { column: pk });
    }

    Ok(FieldChanges::new(changes))
}
