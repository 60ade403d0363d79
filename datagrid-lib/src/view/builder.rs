//! Typestate builder for GridView

use crate::model::ColumnSpec;
use crate::query::SortSpec;
use crate::source::DataSource;

use super::GridView;

/// Default window step (rows per incremental fetch).
pub const DEFAULT_STEP: usize = 30;

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`GridView`].
///
/// Uses the typestate pattern so the required fields are enforced at compile
/// time: `build()` only exists once both `columns` and `source` are set.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridView;
/// use datagrid_lib::model::{ColumnSpec, SortType};
/// use datagrid_lib::query::SortSpec;
/// use datagrid_lib::source::DataSource;
/// use url::Url;
///
/// let endpoint = Url::parse("https://example.com/api/rest/products").unwrap();
/// let view = GridView::builder()
///     .columns(vec![ColumnSpec::new("title", "Name").sortable(SortType::String)])
///     .source(DataSource::remote_http(endpoint))
///     .initial_sort(SortSpec::asc("title"))
///     .step(30)
///     .build();
/// ```
pub struct GridViewBuilder<Columns, Source> {
    columns: Columns,
    source: Source,
    initial_sort: Option<SortSpec>,
    step: usize,
    stop_on_short_page: bool,
}

impl GridViewBuilder<Missing, Missing> {
    pub(crate) fn new() -> Self {
        Self {
            columns: Missing,
            source: Missing,
            initial_sort: None,
            step: DEFAULT_STEP,
            stop_on_short_page: false,
        }
    }
}

impl Default for GridViewBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Columns, Source> GridViewBuilder<Columns, Source> {
    /// Sets the column schema (required).
    pub fn columns(self, columns: Vec<ColumnSpec>) -> GridViewBuilder<Set<Vec<ColumnSpec>>, Source> {
        GridViewBuilder {
            columns: Set(columns),
            source: self.source,
            initial_sort: self.initial_sort,
            step: self.step,
            stop_on_short_page: self.stop_on_short_page,
        }
    }

    /// Sets the data source (required).
    pub fn source(self, source: DataSource) -> GridViewBuilder<Columns, Set<DataSource>> {
        GridViewBuilder {
            columns: self.columns,
            source: Set(source),
            initial_sort: self.initial_sort,
            step: self.step,
            stop_on_short_page: self.stop_on_short_page,
        }
    }

    /// Sets the sort applied by `initialize()`.
    ///
    /// Defaults to ascending on the first sortable column, or natural order
    /// when no column is sortable.
    pub fn initial_sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    /// Sets the window step (rows per incremental fetch). Defaults to
    /// [`DEFAULT_STEP`]; values below 1 are clamped to 1.
    pub fn step(mut self, step: usize) -> Self {
        self.step = step.max(1);
        self
    }

    /// When enabled, a fetch returning fewer rows than the window size marks
    /// the dataset exhausted and later scroll triggers stop fetching.
    ///
    /// Disabled by default: the window then keeps advancing by the fixed
    /// step on every scroll trigger, and trailing fetches may come back
    /// empty.
    pub fn stop_on_short_page(mut self, stop: bool) -> Self {
        self.stop_on_short_page = stop;
        self
    }
}

impl GridViewBuilder<Set<Vec<ColumnSpec>>, Set<DataSource>> {
    /// Builds the view.
    pub fn build(self) -> GridView {
        let Set(columns) = self.columns;
        let Set(source) = self.source;
        let initial_sort = self
            .initial_sort
            .unwrap_or_else(|| default_sort(&columns));
        GridView::from_parts(columns, source, initial_sort, self.step, self.stop_on_short_page)
    }
}

/// Ascending on the first sortable column, natural order otherwise.
fn default_sort(columns: &[ColumnSpec]) -> SortSpec {
    columns
        .iter()
        .find(|column| column.is_sortable())
        .map(|column| SortSpec::asc(column.id()))
        .unwrap_or(SortSpec::Natural)
}
