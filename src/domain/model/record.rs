use crate::domain::model::{ColumnSpec, ScalarValue, SchemaRegistry};

/// One row of the dataset, with one value per registry column.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static SchemaRegistry,
    values: Vec<ScalarValue>,
}

impl Record {
    /// A record with every column null.
    pub fn empty(schema: &'static SchemaRegistry) -> Self {
        Self {
            schema,
            values: vec![ScalarValue::Null; schema.columns().len()],
        }
    }

    pub fn schema(&self) -> &'static SchemaRegistry {
        self.schema
    }

    pub fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.schema.position(column).map(|idx| &self.values[idx])
    }

    /// Sets a known column. Returns false (and changes nothing) for unknown names.
    pub fn set(&mut self, column: &str, value: ScalarValue) -> bool {
        match self.schema.position(column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Primary key value. Empty only for a record that was never populated.
    pub fn key(&self) -> &str {
        self.get(self.schema.primary_key_field())
            .and_then(ScalarValue::as_text)
            .unwrap_or("")
    }

    /// `(column, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static ColumnSpec, &ScalarValue)> {
        self.schema.columns().iter().zip(self.values.iter())
    }
}

/// A single validated column change.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub column: &'static ColumnSpec,
    pub value: ScalarValue,
}

/// The validated set of changes a partial update applies, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    changes: Vec<FieldChange>,
}

impl FieldChanges {
    pub fn new(changes: Vec<FieldChange>) -> Self {
        Self { changes }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldChange> {
        self.changes.iter()
    }
}

/// `(Country_Name, year value)` pairs for a single year column.
#[derive(Debug, Clone)]
pub struct YearProjection {
    pub column: &'static str,
    pub rows: Vec<(String, ScalarValue)>,
}
