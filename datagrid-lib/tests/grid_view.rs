//! End-to-end GridView scenarios against a scripted fetcher.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use url::Url;

use datagrid_lib::GridEvent;
use datagrid_lib::GridView;
use datagrid_lib::LoadState;
use datagrid_lib::error::Error;
use datagrid_lib::error::FetchError;
use datagrid_lib::error::SchemaError;
use datagrid_lib::model::ColumnSpec;
use datagrid_lib::model::Record;
use datagrid_lib::model::SortType;
use datagrid_lib::query::Direction;
use datagrid_lib::query::SortSpec;
use datagrid_lib::source::DataSource;
use datagrid_lib::source::RowFetcher;

/// Fetcher replaying a scripted sequence of pages, optionally gated so a
/// fetch stays unresolved until the test releases it.
struct ScriptedFetcher {
    calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
    pages: Mutex<VecDeque<Result<Vec<Record>, FetchError>>>,
    gate: Semaphore,
}

impl ScriptedFetcher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            pages: Mutex::new(VecDeque::new()),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
        })
    }

    /// A fetcher whose calls block until [`release`](Self::release).
    fn gated() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            pages: Mutex::new(VecDeque::new()),
            gate: Semaphore::new(0),
        })
    }

    fn push_page(&self, rows: Vec<Record>) {
        self.pages.lock().unwrap().push_back(Ok(rows));
    }

    fn push_error(&self, err: FetchError) {
        self.pages.lock().unwrap().push_back(Err(err));
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn urls(&self) -> Vec<Url> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowFetcher for ScriptedFetcher {
    async fn fetch_rows(&self, url: &Url) -> Result<Vec<Record>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.clone());

        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| FetchError::http(499, "fetcher closed"))?;
        permit.forget();

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn product_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("title", "Name").sortable(SortType::String),
        ColumnSpec::new("price", "Price").sortable(SortType::Number),
        ColumnSpec::new("images", "Image"),
    ]
}

fn product(title: &str, price: i64) -> Record {
    Record::new().set("title", title).set("price", price)
}

fn numbered_page(range: std::ops::Range<i64>) -> Vec<Record> {
    range
        .map(|n| product(&format!("Product {}", n), n))
        .collect()
}

fn endpoint() -> Url {
    Url::parse("https://example.com/api/rest/products").unwrap()
}

fn remote_view(fetcher: Arc<ScriptedFetcher>) -> GridView {
    GridView::builder()
        .columns(product_columns())
        .source(DataSource::remote(endpoint(), fetcher))
        .initial_sort(SortSpec::asc("title"))
        .build()
}

fn titles(view: &GridView) -> Vec<String> {
    view.state()
        .rows()
        .iter()
        .map(|row| row.get_str("title").unwrap().unwrap_or("").to_string())
        .collect()
}

// =============================================================================
// Local mode
// =============================================================================

#[tokio::test]
async fn local_sort_by_number_and_string() {
    let view = GridView::builder()
        .columns(product_columns())
        .source(DataSource::local(vec![product("B", 5), product("a", 20)]))
        .build();

    view.apply_sort("price", Direction::Asc).await.unwrap();
    assert_eq!(titles(&view), ["B", "a"]);

    // Uppercase B orders before lowercase a.
    view.apply_sort("title", Direction::Asc).await.unwrap();
    assert_eq!(titles(&view), ["B", "a"]);
}

#[tokio::test]
async fn local_initialize_applies_initial_sort_to_full_set() {
    let view = GridView::builder()
        .columns(product_columns())
        .source(DataSource::local(vec![
            product("Desk", 120),
            product("Chair", 80),
            product("Bench", 60),
        ]))
        .initial_sort(SortSpec::desc("price"))
        .step(2)
        .build();

    view.initialize().await.unwrap();

    // Local mode returns the full sorted set; the window is a rendering
    // concern and does not truncate the data.
    assert_eq!(titles(&view), ["Desk", "Chair", "Bench"]);
    assert!(!view.state().has_more());
}

#[tokio::test]
async fn local_scroll_trigger_is_noop() {
    let view = GridView::builder()
        .columns(product_columns())
        .source(DataSource::local(vec![product("Desk", 120)]))
        .build();

    view.initialize().await.unwrap();
    view.on_scroll_near_bottom().await.unwrap();

    assert_eq!(view.state().rows().len(), 1);
    assert_eq!(view.state().window().start(), 0);
}

#[tokio::test]
async fn sort_validation_fails_fast() {
    let fetcher = ScriptedFetcher::new();
    let view = remote_view(fetcher.clone());

    let err = view.apply_sort("rating", Direction::Asc).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Schema(SchemaError::UnknownColumn { ref field }) if field == "rating"
    ));

    let err = view.apply_sort("images", Direction::Asc).await.unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::NotSortable { .. })));

    // Neither request reached the fetcher.
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(view.load_state(), LoadState::Idle);
}

// =============================================================================
// Remote mode
// =============================================================================

#[tokio::test]
async fn remote_initialize_then_scroll_appends() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..60));
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();
    assert_eq!(view.state().rows().len(), 30);
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (0, 30));

    view.on_scroll_near_bottom().await.unwrap();
    assert_eq!(view.state().rows().len(), 60);
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (30, 60));

    let urls = fetcher.urls();
    assert_eq!(
        urls[0].query(),
        Some("_sort=title&_order=asc&_start=0&_end=30")
    );
    assert_eq!(
        urls[1].query(),
        Some("_sort=title&_order=asc&_start=30&_end=60")
    );
}

#[tokio::test]
async fn trigger_while_loading_issues_no_second_fetch() {
    let fetcher = ScriptedFetcher::gated();
    fetcher.push_page(numbered_page(0..30));
    let view = remote_view(fetcher.clone());

    let pending = tokio::spawn({
        let view = view.clone();
        async move { view.initialize().await }
    });
    while fetcher.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(view.is_loading());

    // Rapid repeated triggers while the first fetch is unresolved.
    view.on_scroll_near_bottom().await.unwrap();
    view.on_scroll_near_bottom().await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    fetcher.release();
    pending.await.unwrap().unwrap();
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(view.state().rows().len(), 30);
    assert_eq!(view.load_state(), LoadState::Idle);
}

#[tokio::test]
async fn failed_fetch_returns_to_idle_and_allows_retry() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_error(FetchError::http(503, "unavailable"));
    fetcher.push_page(numbered_page(0..30));
    let view = remote_view(fetcher.clone());

    let err = view.initialize().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Http { status: 503, .. })));
    assert_eq!(view.load_state(), LoadState::Idle);
    assert!(view.state().rows().is_empty());

    // The gate reopened, so the next trigger retries.
    view.initialize().await.unwrap();
    assert_eq!(view.state().rows().len(), 30);
}

#[tokio::test]
async fn failed_scroll_fetch_does_not_advance_window() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_error(FetchError::http(500, "boom"));
    fetcher.push_page(numbered_page(30..60));
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();
    assert!(view.on_scroll_near_bottom().await.is_err());

    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (0, 30));

    // Retry asks for the same page again.
    view.on_scroll_near_bottom().await.unwrap();
    let urls = fetcher.urls();
    assert_eq!(urls[1].query(), urls[2].query());
    assert_eq!(view.state().rows().len(), 60);
}

#[tokio::test]
async fn scroll_resolves_against_state_committed_when_gate_is_won() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..60));
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();

    // Create the scroll trigger first, then let a sort change commit before
    // it ever runs. The fetch it issues must pair with the sort and window
    // committed at the moment it wins the gate, never with anything observed
    // when the trigger was created.
    let deferred_scroll = view.on_scroll_near_bottom();
    view.apply_sort("price", Direction::Desc).await.unwrap();
    deferred_scroll.await.unwrap();

    let urls = fetcher.urls();
    assert_eq!(
        urls[2].query(),
        Some("_sort=price&_order=desc&_start=30&_end=60")
    );
    assert_eq!(view.state().rows().len(), 60);
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (30, 60));
}

#[tokio::test]
async fn sort_change_resets_window_and_replaces_rows() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..60));
    fetcher.push_page(numbered_page(0..30));
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();
    view.on_scroll_near_bottom().await.unwrap();
    assert_eq!(view.state().rows().len(), 60);

    view.apply_sort("price", Direction::Desc).await.unwrap();
    assert_eq!(view.state().rows().len(), 30);
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (0, 30));
    assert_eq!(view.state().sort(), &SortSpec::desc("price"));

    let urls = fetcher.urls();
    assert_eq!(
        urls[2].query(),
        Some("_sort=price&_order=desc&_start=0&_end=30")
    );
}

#[tokio::test]
async fn toggle_sort_inverts_current_direction() {
    let fetcher = ScriptedFetcher::new();
    let view = remote_view(fetcher.clone());

    view.toggle_sort("title").await.unwrap();
    // Initial sort was already ascending on title, so the toggle descends.
    assert_eq!(view.state().sort(), &SortSpec::desc("title"));

    view.toggle_sort("price").await.unwrap();
    // A different column starts ascending.
    assert_eq!(view.state().sort(), &SortSpec::asc("price"));
}

#[tokio::test]
async fn short_page_halts_fetching_when_configured() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..40));
    let view = GridView::builder()
        .columns(product_columns())
        .source(DataSource::remote(endpoint(), fetcher.clone()))
        .initial_sort(SortSpec::asc("title"))
        .stop_on_short_page(true)
        .build();

    view.initialize().await.unwrap();
    assert!(view.state().has_more());

    view.on_scroll_near_bottom().await.unwrap();
    assert_eq!(view.state().rows().len(), 40);
    assert!(!view.state().has_more());
    // The window still advanced by the full step, not the received count.
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (30, 60));

    view.on_scroll_near_bottom().await.unwrap();
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn short_page_keeps_advancing_by_default() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..40));
    // Past the end of the dataset the source returns empty pages.
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();
    view.on_scroll_near_bottom().await.unwrap();
    view.on_scroll_near_bottom().await.unwrap();

    assert_eq!(fetcher.calls(), 3);
    assert_eq!(view.state().rows().len(), 40);
    let window = view.state().window();
    assert_eq!((window.start(), window.end()), (60, 90));
}

#[tokio::test]
async fn empty_result_is_a_valid_terminal_state() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(Vec::new());
    let view = remote_view(fetcher.clone());
    let mut events = view.subscribe();

    view.initialize().await.unwrap();

    assert!(view.state().rows().is_empty());
    assert_eq!(view.load_state(), LoadState::Idle);

    assert!(matches!(events.try_recv(), Ok(GridEvent::LoadingChanged(true))));
    assert!(matches!(
        events.try_recv(),
        Ok(GridEvent::RowsReplaced(rows)) if rows.is_empty()
    ));
    assert!(matches!(events.try_recv(), Ok(GridEvent::LoadingChanged(false))));
}

#[tokio::test]
async fn sort_change_emits_event_sequence() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..5));
    let view = remote_view(fetcher.clone());
    let mut events = view.subscribe();

    view.apply_sort("price", Direction::Asc).await.unwrap();

    assert!(matches!(
        events.try_recv(),
        Ok(GridEvent::SortChanged(sort)) if sort == SortSpec::asc("price")
    ));
    assert!(matches!(events.try_recv(), Ok(GridEvent::LoadingChanged(true))));
    assert!(matches!(
        events.try_recv(),
        Ok(GridEvent::RowsReplaced(rows)) if rows.len() == 5
    ));
    assert!(matches!(events.try_recv(), Ok(GridEvent::LoadingChanged(false))));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn scroll_appends_only_the_new_page_in_events() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_page(numbered_page(0..30));
    fetcher.push_page(numbered_page(30..60));
    let view = remote_view(fetcher.clone());

    view.initialize().await.unwrap();
    let mut events = view.subscribe();
    view.on_scroll_near_bottom().await.unwrap();

    assert!(matches!(events.try_recv(), Ok(GridEvent::LoadingChanged(true))));
    assert!(matches!(
        events.try_recv(),
        Ok(GridEvent::RowsAppended(rows)) if rows.len() == 30
    ));
}

#[tokio::test]
async fn teardown_discards_inflight_response() {
    let fetcher = ScriptedFetcher::gated();
    fetcher.push_page(numbered_page(0..30));
    let view = remote_view(fetcher.clone());

    let pending = tokio::spawn({
        let view = view.clone();
        async move { view.initialize().await }
    });
    while fetcher.calls() == 0 {
        tokio::task::yield_now().await;
    }

    view.teardown();
    fetcher.release();
    pending.await.unwrap().unwrap();

    // The response resolved after teardown and was discarded.
    assert!(view.state().rows().is_empty());

    // Further triggers are no-ops.
    view.on_scroll_near_bottom().await.unwrap();
    view.initialize().await.unwrap();
    assert_eq!(fetcher.calls(), 1);
}
