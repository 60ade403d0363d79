//! Cell access errors

/// Error type for typed cell access on [`Record`](crate::model::Record).
///
/// Raised when a row is asked for a column it does not carry, or when the
/// cell holds a different type than the accessor expects. A present cell
/// holding [`Value::Null`](crate::model::Value::Null) is not an error; the
/// typed getters report it as `Ok(None)`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FieldError {
    /// The row carries no cell for the requested column.
    #[error("Column '{column}' absent from row")]
    Missing { column: String },

    /// The cell exists but holds a different type than requested.
    #[error("Column '{column}' holds {actual}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl FieldError {
    /// Creates an absent-column error.
    pub fn missing(column: impl Into<String>) -> Self {
        Self::Missing {
            column: column.into(),
        }
    }

    /// Creates a cell type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        }
    }
}
