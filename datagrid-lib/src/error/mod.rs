//! Error types

mod fetch;
mod field;
mod schema;

pub use fetch::*;
pub use field::*;
pub use schema::*;

/// Top-level error type aggregating all error families.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Schema/configuration error; fails fast, never retried.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Transient fetch error; the view returns to idle so the trigger
    /// source may retry.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Typed row access error.
    #[error(transparent)]
    Field(#[from] FieldError),
}
