//! Data source adapter
//!
//! Abstracts whether rows come from a pre-supplied local array (sorted
//! in-process) or from a remote endpoint (sort and window encoded as request
//! parameters, server returns the pre-sorted page).

mod http;

pub use http::*;

use std::sync::Arc;

use log::debug;
use url::Url;

use crate::error::Error;
use crate::model::ColumnSpec;
use crate::model::Record;
use crate::query::SortSpec;
use crate::query::Window;
use crate::sort::sort_rows;

/// Whether rows are resident in memory or fetched from an upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Full dataset resident in memory; sorting computed in-process.
    Local,
    /// Dataset resides upstream; sort and page parameters sent per request.
    Remote,
}

/// Where the view's rows come from. The mode is fixed at construction.
///
/// # Example
///
/// ```
/// use datagrid_lib::source::DataSource;
/// use url::Url;
///
/// let endpoint = Url::parse("https://example.com/api/rest/products").unwrap();
/// let source = DataSource::remote_http(endpoint);
/// ```
#[derive(Clone)]
pub enum DataSource {
    /// Pre-supplied row set.
    Local {
        /// The full resident dataset, in natural order.
        rows: Vec<Record>,
    },
    /// Upstream source reached through an injected fetch capability.
    Remote {
        /// Endpoint the page parameters are appended to.
        endpoint: Url,
        /// The injected fetch capability.
        fetcher: Arc<dyn RowFetcher>,
    },
}

impl DataSource {
    /// Creates a local source over a resident row set.
    pub fn local(rows: Vec<Record>) -> Self {
        Self::Local { rows }
    }

    /// Creates a remote source with a custom fetch capability.
    pub fn remote(endpoint: Url, fetcher: Arc<dyn RowFetcher>) -> Self {
        Self::Remote { endpoint, fetcher }
    }

    /// Creates a remote source backed by the default HTTP fetcher.
    pub fn remote_http(endpoint: Url) -> Self {
        Self::remote(endpoint, Arc::new(HttpRowFetcher::new()))
    }

    /// Returns the source mode.
    pub fn mode(&self) -> SourceMode {
        match self {
            Self::Local { .. } => SourceMode::Local,
            Self::Remote { .. } => SourceMode::Remote,
        }
    }

    /// Returns `true` for a local source.
    pub fn is_local(&self) -> bool {
        self.mode() == SourceMode::Local
    }

    /// Resolves one page request.
    ///
    /// Local mode ignores the window: the full set is sorted in-process and
    /// returned whole (windowing is a rendering concern there). Remote mode
    /// returns exactly the page the upstream source supplies, with no
    /// client-side re-sort. Failures always surface through the returned
    /// `Result`, never as a panic, so the caller's load gate can release.
    pub async fn fetch_page(
        &self,
        columns: &[ColumnSpec],
        sort: &SortSpec,
        window: Window,
    ) -> Result<Vec<Record>, Error> {
        match self {
            Self::Local { rows } => Ok(sort_rows(rows.clone(), columns, sort)?),
            Self::Remote { endpoint, fetcher } => {
                let url = page_url(endpoint, sort, window);
                debug!("fetching rows from {}", url);
                Ok(fetcher.fetch_rows(&url).await?)
            }
        }
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { rows } => f.debug_struct("Local").field("rows", &rows.len()).finish(),
            Self::Remote { endpoint, .. } => f
                .debug_struct("Remote")
                .field("endpoint", &endpoint.as_str())
                .finish(),
        }
    }
}

/// Builds the page request URL: `_sort`, `_order`, `_start`, `_end`.
///
/// A natural sort omits `_sort`/`_order`; the window bounds are always sent.
fn page_url(endpoint: &Url, sort: &SortSpec, window: Window) -> Url {
    let mut url = endpoint.clone();
    {
        let mut params = url.query_pairs_mut();
        if let SortSpec::By { field, direction } = sort {
            params.append_pair("_sort", field);
            params.append_pair("_order", direction.as_str());
        }
        params.append_pair("_start", &window.start().to_string());
        params.append_pair("_end", &window.end().to_string());
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortType;

    #[test]
    fn test_page_url_parameters() {
        let endpoint = Url::parse("https://example.com/api/rest/products").unwrap();
        let url = page_url(&endpoint, &SortSpec::asc("title"), Window::initial(30));
        assert_eq!(
            url.as_str(),
            "https://example.com/api/rest/products?_sort=title&_order=asc&_start=0&_end=30"
        );
    }

    #[test]
    fn test_page_url_natural_sort_omits_order() {
        let endpoint = Url::parse("https://example.com/api/rest/products").unwrap();
        let url = page_url(&endpoint, &SortSpec::Natural, Window::new(30, 60));
        assert_eq!(
            url.as_str(),
            "https://example.com/api/rest/products?_start=30&_end=60"
        );
    }

    #[tokio::test]
    async fn test_local_source_returns_full_sorted_set() {
        let columns = vec![ColumnSpec::new("price", "Price").sortable(SortType::Number)];
        let rows = vec![
            Record::new().set("price", 30i64),
            Record::new().set("price", 10i64),
            Record::new().set("price", 20i64),
        ];
        let source = DataSource::local(rows);

        // A one-row window still yields the whole set, sorted.
        let page = source
            .fetch_page(&columns, &SortSpec::asc("price"), Window::initial(1))
            .await
            .unwrap();
        let prices: Vec<_> = page
            .iter()
            .map(|row| row.get_f64("price").unwrap().unwrap())
            .collect();
        assert_eq!(prices, [10.0, 20.0, 30.0]);
    }
}
