//! Record -> JSON, always every registry column, always in registry order.

use crate::domain::model::{Record, YearProjection};
use serde_json::{Map, Value as JsonValue};

pub fn to_json(record: &Record) -> JsonValue {
    let map: Map<String, JsonValue> = record
        .fields()
        .map(|(column, value)| (column.name.to_string(), value.to_json()))
        .collect();
    JsonValue::Object(map)
}

pub fn to_json_many(records: &[Record]) -> Vec<JsonValue> {
    records.iter().map(to_json).collect()
}

/// `[{"Country_Name": .., "year_XXXX": ..}, ..]`
pub fn projection_to_json(projection: &YearProjection) -> Vec<JsonValue> {
    projection
        .rows
        .iter()
        .map(|(name, value)| {
            let mut entry = Map::new();
            entry.insert("Country_Name".to_string(), JsonValue::from(name.as_str()));
            entry.insert(projection.column.to_string(), value.to_json());
            JsonValue::Object(entry)
        })
        .collect()
}
