//! Dynamic table row

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::Value;
use crate::error::FieldError;

/// A single table row.
///
/// Records hold cell values as a `HashMap<String, Value>` keyed by column id;
/// the schema is implied by the [`ColumnSpec`](super::ColumnSpec) set, not
/// enforced structurally. A JSON array of flat objects deserializes directly
/// to `Vec<Record>`.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::Record;
///
/// let row = Record::new()
///     .set("title", "Monitor")
///     .set("price", 250i64);
///
/// assert_eq!(row.get_str("title").unwrap(), Some("Monitor"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Sets a cell value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a cell value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a cell and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Returns a reference to the cell value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all cells.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if the field is missing or has the wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string cell value.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a numeric cell value, widening integers to `f64`.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Int(n)) => Ok(Some(*n as f64)),
            Some(Value::Float(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "number",
                other.type_name(),
            )),
        }
    }

    /// Gets a boolean cell value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(FieldError::type_mismatch(field, "bool", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_array_deserialization() {
        let json = r#"[
            {"title": "Chair", "price": 80, "rating": 4.5},
            {"title": "Desk", "price": null}
        ]"#;

        let rows: Vec<Record> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_str("title").unwrap(), Some("Chair"));
        assert_eq!(rows[0].get_f64("price").unwrap(), Some(80.0));
        assert_eq!(rows[0].get_f64("rating").unwrap(), Some(4.5));
        assert_eq!(rows[1].get_f64("price").unwrap(), None);
    }

    #[test]
    fn test_typed_getter_errors() {
        let row = Record::new().set("price", 10i64);

        assert!(matches!(
            row.get_str("title"),
            Err(FieldError::Missing { .. })
        ));
        assert!(matches!(
            row.get_str("price"),
            Err(FieldError::TypeMismatch { .. })
        ));
    }
}
