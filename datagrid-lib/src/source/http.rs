//! RowFetcher trait and default HTTP implementation

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;
use crate::model::Record;

/// The injected fetch capability a remote [`DataSource`](super::DataSource)
/// resolves pages through.
///
/// Implementations must never panic on transport or decode problems; every
/// failure surfaces as a [`FetchError`] so the view's load gate is guaranteed
/// to release. Tests typically substitute a scripted implementation.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use datagrid_lib::error::FetchError;
/// use datagrid_lib::model::Record;
/// use datagrid_lib::source::RowFetcher;
/// use url::Url;
///
/// struct CannedFetcher(Vec<Record>);
///
/// #[async_trait]
/// impl RowFetcher for CannedFetcher {
///     async fn fetch_rows(&self, _url: &Url) -> Result<Vec<Record>, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait RowFetcher: Send + Sync {
    /// Fetches the row page addressed by `url`.
    async fn fetch_rows(&self, url: &Url) -> Result<Vec<Record>, FetchError>;
}

/// Default [`RowFetcher`] backed by `reqwest`.
///
/// Expects the response body to be a JSON array of flat row objects keyed by
/// column ids. Does not retry; retry policy belongs to the trigger source.
#[derive(Debug, Clone, Default)]
pub struct HttpRowFetcher {
    client: reqwest::Client,
}

impl HttpRowFetcher {
    /// Creates a fetcher with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher reusing an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RowFetcher for HttpRowFetcher {
    async fn fetch_rows(&self, url: &Url) -> Result<Vec<Record>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status.as_u16(), body));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|err| FetchError::parse_with_body(err.to_string(), body))
    }
}
