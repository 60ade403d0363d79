//! GridView component
//!
//! The single source of truth for a table's rows, sort, window, and loading
//! flag. External triggers (mount, header click, scroll-near-bottom) arrive
//! as method calls from the rendering collaborator; the load gate serializes
//! them so at most one fetch per view is ever in flight.

mod builder;
mod event;
mod state;

pub use builder::*;
pub use event::*;
pub use state::LoadState;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use log::debug;
use log::warn;
use tokio::sync::mpsc;

use crate::error::Error;
use crate::error::SchemaError;
use crate::model::ColumnSpec;
use crate::model::Record;
use crate::query::Direction;
use crate::query::MergeMode;
use crate::query::SortSpec;
use crate::query::Window;
use crate::query::merge_rows;
use crate::source::DataSource;
use state::LoadGate;

/// Snapshot of a view's data state.
///
/// Held behind a lock inside [`GridView`]; [`GridView::state`] returns a
/// clone taken atomically with respect to concurrent triggers.
#[derive(Debug, Clone)]
pub struct ViewState {
    rows: Vec<Record>,
    sort: SortSpec,
    window: Window,
    has_more: bool,
}

impl ViewState {
    fn new(sort: SortSpec, window: Window) -> Self {
        Self {
            rows: Vec::new(),
            sort,
            window,
            has_more: true,
        }
    }

    /// Returns the materialized rows.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Returns the current sort specification.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// Returns the current row window.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Returns `false` once a short page has marked the dataset exhausted
    /// (only ever cleared when `stop_on_short_page` is enabled).
    pub fn has_more(&self) -> bool {
        self.has_more
    }
}

struct GridInner {
    columns: Vec<ColumnSpec>,
    source: DataSource,
    step: usize,
    stop_on_short_page: bool,
    state: RwLock<ViewState>,
    gate: LoadGate,
    generation: AtomicU64,
    torn_down: AtomicBool,
    events: Mutex<Option<mpsc::UnboundedSender<GridEvent>>>,
}

impl GridInner {
    fn emit(&self, event: GridEvent) {
        if let Ok(guard) = self.events.lock()
            && let Some(sender) = guard.as_ref()
        {
            // Receiver may be gone; emission is best-effort.
            let _ = sender.send(event);
        }
    }
}

/// Releases the load gate when the fetch settles, success or failure, so an
/// error path can never leave the view stuck in `Loading`.
struct LoadGuard<'a> {
    inner: &'a GridInner,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.inner.gate.release();
        self.inner.emit(GridEvent::LoadingChanged(false));
    }
}

/// Sortable, incrementally loaded table data view.
///
/// Cheap to clone (`Arc` internally), so triggers may arrive from concurrent
/// tasks; the internal load gate guarantees they never overlap a fetch.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridView;
/// use datagrid_lib::model::{ColumnSpec, Record, SortType};
/// use datagrid_lib::query::{Direction, SortSpec};
/// use datagrid_lib::source::DataSource;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), datagrid_lib::error::Error> {
/// let rows = vec![
///     Record::new().set("title", "Desk").set("price", 120i64),
///     Record::new().set("title", "Chair").set("price", 80i64),
/// ];
///
/// let view = GridView::builder()
///     .columns(vec![
///         ColumnSpec::new("title", "Name").sortable(SortType::String),
///         ColumnSpec::new("price", "Price").sortable(SortType::Number),
///     ])
///     .source(DataSource::local(rows))
///     .initial_sort(SortSpec::asc("title"))
///     .build();
///
/// view.initialize().await?;
/// view.apply_sort("price", Direction::Asc).await?;
/// assert_eq!(view.state().rows()[0].get_str("title")?, Some("Chair"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GridView {
    inner: Arc<GridInner>,
}

impl GridView {
    /// Creates a new builder for constructing a view.
    pub fn builder() -> GridViewBuilder<Missing, Missing> {
        GridViewBuilder::new()
    }

    pub(crate) fn from_parts(
        columns: Vec<ColumnSpec>,
        source: DataSource,
        initial_sort: SortSpec,
        step: usize,
        stop_on_short_page: bool,
    ) -> Self {
        Self {
            inner: Arc::new(GridInner {
                state: RwLock::new(ViewState::new(initial_sort, Window::initial(step))),
                columns,
                source,
                step,
                stop_on_short_page,
                gate: LoadGate::new(),
                generation: AtomicU64::new(0),
                torn_down: AtomicBool::new(false),
                events: Mutex::new(None),
            }),
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Subscribes the rendering collaborator to view events.
    ///
    /// Replaces any previous subscription.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<GridEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Ok(mut guard) = self.inner.events.lock() {
            *guard = Some(sender);
        }
        receiver
    }

    /// Returns a snapshot of the data state.
    pub fn state(&self) -> ViewState {
        self.inner
            .state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| ViewState::new(SortSpec::Natural, Window::initial(self.inner.step)))
    }

    /// Returns the column schema.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.inner.columns
    }

    /// Returns the configured window step (page size).
    pub fn step(&self) -> usize {
        self.inner.step
    }

    /// Returns the current load state.
    pub fn load_state(&self) -> LoadState {
        self.inner.gate.state()
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.gate.is_loading()
    }

    // =========================================================================
    // Triggers
    // =========================================================================

    /// Performs the initial load: the configured sort over the first window.
    ///
    /// Rows are replaced. A no-op if a fetch is already in flight or the view
    /// is torn down.
    pub async fn initialize(&self) -> Result<(), Error> {
        self.fetch_into(FetchIntent::Initialize).await
    }

    /// Applies a new sort and reloads the first window.
    ///
    /// Fails fast with [`SchemaError::UnknownColumn`] (or
    /// [`SchemaError::NotSortable`]) before any state change or fetch. The
    /// window resets to `[0, step)` and the row set is replaced. Dropped as a
    /// no-op while a fetch is in flight.
    ///
    /// There is deliberately no way back to natural order once a column sort
    /// has been applied: triggers only ever carry ascending or descending,
    /// mirroring header clicks. Natural order exists only as a starting
    /// state, via [`GridViewBuilder::initial_sort`].
    pub async fn apply_sort(&self, field: &str, direction: Direction) -> Result<(), Error> {
        self.sortable_column(field)?;
        self.fetch_into(FetchIntent::Sort(SortSpec::by(field, direction)))
            .await
    }

    /// Flips the sort direction, as a repeated header click does.
    ///
    /// Sorting a different column starts ascending; sorting the current
    /// column inverts its direction.
    pub async fn toggle_sort(&self, field: &str) -> Result<(), Error> {
        self.sortable_column(field)?;
        self.fetch_into(FetchIntent::Toggle(field.to_string())).await
    }

    /// Reacts to the caller's should-load-more signal by fetching the next
    /// window and appending it.
    ///
    /// The view is geometry-agnostic: deciding that the visible bottom has
    /// reached the content bottom is the trigger source's job. No-op for a
    /// local source (the full set is already materialized), while a fetch is
    /// in flight, once `stop_on_short_page` has exhausted the dataset, or
    /// after teardown.
    pub async fn on_scroll_near_bottom(&self) -> Result<(), Error> {
        if self.inner.source.is_local() {
            return Ok(());
        }
        self.fetch_into(FetchIntent::NextPage).await
    }

    /// Tears the view down.
    ///
    /// Marks the view dead, invalidates any in-flight fetch (its response is
    /// discarded on arrival), and drops the event channel. Further triggers
    /// are no-ops.
    pub fn teardown(&self) {
        self.inner.torn_down.store(true, Ordering::SeqCst);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.inner.events.lock() {
            guard.take();
        }
    }

    // =========================================================================
    // Fetch pipeline
    // =========================================================================

    /// Validates that `field` names a sortable column, before any state
    /// change or fetch.
    fn sortable_column(&self, field: &str) -> Result<(), Error> {
        let column = self
            .inner
            .columns
            .iter()
            .find(|column| column.id() == field)
            .ok_or_else(|| SchemaError::unknown_column(field))?;
        if !column.is_sortable() {
            return Err(SchemaError::not_sortable(field).into());
        }
        Ok(())
    }

    /// Gates, fetches, and commits one page.
    ///
    /// The intent is resolved against committed state only after the trigger
    /// wins the load gate. Commits happen exclusively under the gate, so the
    /// sort and window a fetch pairs with cannot go stale between resolution
    /// and commit.
    ///
    /// The committed window is the one the page was requested with, so a
    /// failed fetch leaves the window where it was and a retry asks for the
    /// same page again.
    async fn fetch_into(&self, intent: FetchIntent) -> Result<(), Error> {
        if self.inner.torn_down.load(Ordering::SeqCst) {
            return Ok(());
        }
        if !self.inner.gate.try_begin() {
            debug!("trigger dropped: fetch already in flight");
            return Ok(());
        }

        let Some((sort, window, mode, accepted_event)) = self.resolve(intent) else {
            self.inner.gate.release();
            return Ok(());
        };
        let _guard = LoadGuard { inner: &self.inner };

        if let Some(event) = accepted_event {
            self.inner.emit(event);
        }
        self.inner.emit(GridEvent::LoadingChanged(true));

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .inner
            .source
            .fetch_page(&self.inner.columns, &sort, window)
            .await;

        if self.inner.torn_down.load(Ordering::SeqCst)
            || self.inner.generation.load(Ordering::SeqCst) != generation
        {
            debug!("stale response discarded");
            return Ok(());
        }

        let incoming = match result {
            Ok(rows) => rows,
            Err(err) => {
                warn!("page fetch failed: {}", err);
                return Err(err);
            }
        };

        if incoming.is_empty() {
            // Zero rows is a valid terminal state; the collaborator renders
            // its empty-state placeholder.
            debug!("fetch returned an empty result set");
        }

        let emitted = incoming.clone();
        if let Ok(mut state) = self.inner.state.write() {
            state.sort = sort;
            state.window = window;
            state.has_more = if self.inner.source.is_local() {
                false
            } else if self.inner.stop_on_short_page {
                incoming.len() >= window.len()
            } else {
                true
            };
            let existing = std::mem::take(&mut state.rows);
            state.rows = merge_rows(existing, incoming, mode);
        }

        self.inner.emit(match mode {
            MergeMode::Replace => GridEvent::RowsReplaced(emitted),
            MergeMode::Append => GridEvent::RowsAppended(emitted),
        });

        Ok(())
    }

    /// Turns an accepted intent into the concrete fetch to run, reading the
    /// state committed at the moment the gate was won. Returns `None` when
    /// the intent has nothing left to do.
    fn resolve(&self, intent: FetchIntent) -> Option<(SortSpec, Window, MergeMode, Option<GridEvent>)> {
        let state = self.state();
        let first = Window::initial(self.inner.step);
        match intent {
            FetchIntent::Initialize => Some((state.sort, first, MergeMode::Replace, None)),
            FetchIntent::Sort(sort) => Some((
                sort.clone(),
                first,
                MergeMode::Replace,
                Some(GridEvent::SortChanged(sort)),
            )),
            FetchIntent::Toggle(field) => {
                let direction = match &state.sort {
                    SortSpec::By {
                        field: current,
                        direction,
                    } if *current == field => direction.inverted(),
                    _ => Direction::Asc,
                };
                let sort = SortSpec::by(field, direction);
                Some((
                    sort.clone(),
                    first,
                    MergeMode::Replace,
                    Some(GridEvent::SortChanged(sort)),
                ))
            }
            FetchIntent::NextPage => {
                if !state.has_more {
                    debug!("scroll trigger ignored: dataset exhausted");
                    return None;
                }
                Some((
                    state.sort,
                    state.window.advance(self.inner.step),
                    MergeMode::Append,
                    None,
                ))
            }
        }
    }
}

/// What an accepted trigger should fetch. Carried through the gate and only
/// resolved against committed state once the trigger holds it.
enum FetchIntent {
    /// Reload the first window under the current sort.
    Initialize,
    /// Switch to the given sort and reload the first window.
    Sort(SortSpec),
    /// Flip the direction on a column and reload the first window.
    Toggle(String),
    /// Fetch the window after the committed one and append it.
    NextPage,
}

impl std::fmt::Debug for GridView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridView")
            .field("columns", &self.inner.columns.len())
            .field("source", &self.inner.source)
            .field("step", &self.inner.step)
            .field("load_state", &self.inner.gate.state())
            .finish()
    }
}
