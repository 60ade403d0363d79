//! Schema error types

/// Errors for sort requests that do not fit the column schema.
///
/// These indicate programmer or configuration mistakes, not runtime
/// conditions, so they fail fast before any state change or fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// The sort field does not match any column id.
    #[error("Unknown column '{field}'")]
    UnknownColumn { field: String },

    /// The sort field names a column configured as not sortable.
    #[error("Column '{field}' is not sortable")]
    NotSortable { field: String },
}

impl SchemaError {
    /// Creates a new unknown column error.
    pub fn unknown_column(field: impl Into<String>) -> Self {
        Self::UnknownColumn {
            field: field.into(),
        }
    }

    /// Creates a new not-sortable error.
    pub fn not_sortable(field: impl Into<String>) -> Self {
        Self::NotSortable {
            field: field.into(),
        }
    }
}
