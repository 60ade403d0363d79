//! Sortable, paginated tabular data view core
//!
//! The non-visual engine behind a sortable table: a type-aware stable sort,
//! a growing row window for incremental loading, a local-or-remote data
//! source adapter, and a load gate that serializes fetch triggers. Rendering,
//! styling, and event wiring are left to the consuming collaborator, which
//! observes the view through [`GridEvent`]s.

pub mod error;
pub mod model;
pub mod query;
pub mod sort;
pub mod source;

mod view;

pub use view::*;
