//! Column schema types

use std::sync::Arc;

use super::Value;

/// How a column's cell values compare during sorting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
    /// Locale-style string comparison, uppercase before lowercase.
    #[default]
    String,
    /// Numeric comparison; missing and NaN values sort first.
    Number,
}

/// Custom cell renderer producing markup for the rendering collaborator.
pub type CellRenderer = dyn Fn(&Value) -> String + Send + Sync;

/// Schema entry for one table column.
///
/// The column set collectively defines the schema every row is expected to
/// follow. Specs are immutable after construction.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{ColumnSpec, SortType};
///
/// let columns = vec![
///     ColumnSpec::new("title", "Name").sortable(SortType::String),
///     ColumnSpec::new("price", "Price").sortable(SortType::Number),
///     ColumnSpec::new("images", "Image"),
/// ];
/// assert!(columns[0].is_sortable());
/// assert!(!columns[2].is_sortable());
/// ```
#[derive(Clone)]
pub struct ColumnSpec {
    id: String,
    title: String,
    sortable: bool,
    sort_type: SortType,
    renderer: Option<Arc<CellRenderer>>,
}

impl ColumnSpec {
    /// Creates a new non-sortable column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sortable: false,
            sort_type: SortType::default(),
            renderer: None,
        }
    }

    /// Marks the column sortable with the given comparison type.
    pub fn sortable(mut self, sort_type: SortType) -> Self {
        self.sortable = true;
        self.sort_type = sort_type;
        self
    }

    /// Attaches a custom cell renderer.
    pub fn with_renderer(mut self, renderer: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Returns the column id (the key into each row).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the column header title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns `true` if the column participates in sorting.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Returns the comparison type used when sorting this column.
    pub fn sort_type(&self) -> SortType {
        self.sort_type
    }

    /// Renders a cell value to markup.
    ///
    /// Uses the custom renderer when one is attached, otherwise the value's
    /// display form.
    pub fn render(&self, value: &Value) -> String {
        match &self.renderer {
            Some(renderer) => renderer(value),
            None => value.to_string(),
        }
    }
}

impl std::fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("sort_type", &self.sort_type)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
