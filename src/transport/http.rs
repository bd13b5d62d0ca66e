//! HTTP datastore
//!
//! A reqwest-backed [`Datastore`] for JSON-over-HTTP endpoints that expose
//! the partition call at `POST {endpoint}/v1/{parent}:partitionQuery` with
//! paginated responses.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use futures::{stream, TryStreamExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::types::{CursorStream, Datastore, PartitionQueryRequest, PartitionQueryResponse};
use crate::error::{Error, Result};
use crate::query::Cursor;
use crate::types::request_tag;

/// Configuration for [`HttpDatastore`].
#[derive(Debug, Clone)]
pub struct HttpDatastoreConfig {
    /// Base endpoint, e.g. `https://docstore.example.com`.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Headers added to every request. Credentials belong here.
    pub default_headers: HashMap<String, String>,
    /// User agent string.
    pub user_agent: String,
    /// Page size asked of the partition call; `None` takes the server's
    /// default.
    pub page_size: Option<u32>,
}

impl Default for HttpDatastoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("docstore-cdk/{}", env!("CARGO_PKG_VERSION")),
            page_size: None,
        }
    }
}

impl HttpDatastoreConfig {
    /// Create a new config builder.
    pub fn builder() -> HttpDatastoreConfigBuilder {
        HttpDatastoreConfigBuilder::default()
    }
}

/// Builder for [`HttpDatastoreConfig`].
#[derive(Debug, Default)]
pub struct HttpDatastoreConfigBuilder {
    config: HttpDatastoreConfig,
}

impl HttpDatastoreConfigBuilder {
    /// Set the base endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Ask the partition call for pages of this size.
    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = Some(page_size);
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> HttpDatastoreConfig {
        self.config
    }
}

/// A [`Datastore`] speaking JSON over HTTP.
///
/// Pages through the partition call lazily: each page is fetched when the
/// stream demands it, and dropping the stream abandons the pages not yet
/// fetched. Performs no retries; callers own that policy.
#[derive(Debug, Clone)]
pub struct HttpDatastore {
    client: Client,
    endpoint: String,
    default_headers: HashMap<String, String>,
    page_size: Option<u32>,
}

impl HttpDatastore {
    /// A datastore for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_config(HttpDatastoreConfig {
            endpoint: endpoint.into(),
            ..HttpDatastoreConfig::default()
        })
    }

    /// A datastore with custom configuration.
    pub fn with_config(config: HttpDatastoreConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            default_headers: config.default_headers,
            page_size: config.page_size,
        })
    }

    fn partition_url(&self, parent: &str) -> String {
        format!("{}/v1/{}:partitionQuery", self.endpoint, parent)
    }
}

#[async_trait]
impl Datastore for HttpDatastore {
    async fn partition_query_stream(
        &self,
        request: PartitionQueryRequest,
    ) -> Result<CursorStream> {
        let mut request = request;
        if request.page_size.is_none() {
            request.page_size = self.page_size;
        }

        let tag = request_tag();
        let url = self.partition_url(&request.parent);
        debug!(
            "[{tag}] POST {url} requesting {} split points",
            request.partition_count
        );

        let state = PageState {
            client: self.client.clone(),
            headers: self.default_headers.clone(),
            next_page_token: request.page_token.take(),
            url,
            request,
            exhausted: false,
            tag,
            pages: 0,
        };

        let cursors = stream::try_unfold(state, fetch_page)
            .map_ok(|partitions| stream::iter(partitions.into_iter().map(Ok)))
            .try_flatten();
        Ok(Box::pin(cursors))
    }
}

struct PageState {
    client: Client,
    url: String,
    headers: HashMap<String, String>,
    request: PartitionQueryRequest,
    next_page_token: Option<String>,
    exhausted: bool,
    tag: String,
    pages: u32,
}

/// Fetch one response page, on demand.
async fn fetch_page(mut state: PageState) -> Result<Option<(Vec<Cursor>, PageState)>> {
    if state.exhausted {
        return Ok(None);
    }

    let mut body = state.request.clone();
    body.page_token = state.next_page_token.clone();

    let mut http_request = state.client.post(&state.url).json(&body);
    for (key, value) in &state.headers {
        http_request = http_request.header(key.as_str(), value.as_str());
    }

    let response = http_request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::http_status(status.as_u16(), body));
    }
    let page: PartitionQueryResponse = response.json().await?;

    state.pages += 1;
    debug!(
        "[{}] page {} delivered {} split cursors",
        state.tag,
        state.pages,
        page.partitions.len()
    );

    match page.next_page_token.filter(|token| !token.is_empty()) {
        Some(token) => state.next_page_token = Some(token),
        None => state.exhausted = true,
    }
    Ok(Some((page.partitions, state)))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_partition_url_joins_endpoint_and_parent() {
        let datastore = HttpDatastore::new("https://docstore.example.com").unwrap();
        assert_eq!(
            datastore.partition_url("projects/p1/databases/d1/documents"),
            "https://docstore.example.com/v1/projects/p1/databases/d1/documents:partitionQuery"
        );
    }

    #[test]
    fn test_trailing_endpoint_slash_is_trimmed() {
        let datastore = HttpDatastore::new("https://docstore.example.com/").unwrap();
        assert_eq!(
            datastore.partition_url("projects/p1/databases/d1/documents"),
            "https://docstore.example.com/v1/projects/p1/databases/d1/documents:partitionQuery"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = HttpDatastore::new("not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = HttpDatastoreConfig::builder()
            .endpoint("https://docstore.example.com")
            .timeout(Duration::from_secs(5))
            .header("authorization", "Bearer token")
            .user_agent("test-agent")
            .page_size(25)
            .build();

        assert_eq!(config.endpoint, "https://docstore.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.default_headers.get("authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.page_size, Some(25));
    }
}
