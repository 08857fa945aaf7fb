//! Search engine connection settings

use std::time::Duration;

/// Default Elasticsearch endpoint
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";
/// Default index holding fund documents
pub const DEFAULT_INDEX_NAME: &str = "funds";

/// Configuration for the Elasticsearch adapter
///
/// # Example
///
/// ```rust
/// use infra_search::SearchConfig;
/// use std::time::Duration;
///
/// let config = SearchConfig::new("http://search:9200/", "funds")
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.url, "http://search:9200");
/// ```
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the cluster, without trailing slash
    pub url: String,
    /// Index name
    pub index: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional basic-auth credentials
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SearchConfig {
    pub fn new(url: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            index: index.into(),
            timeout: Duration::from_secs(30),
            username: None,
            password: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// URL of an index-scoped endpoint, e.g. `_search`
    pub(crate) fn index_url(&self, endpoint: &str) -> String {
        if endpoint.is_empty() {
            format!("{}/{}", self.url, self.index)
        } else {
            format!("{}/{}/{}", self.url, self.index, endpoint)
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL, DEFAULT_INDEX_NAME)
    }
}
