//! Document index trait and Elasticsearch implementation.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bridge_http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{IndexError, Result};
use crate::types::{GetDocResponse, SearchResponse};

/// Batch size for scroll scans
const SCROLL_BATCH_SIZE: u32 = 1000;

/// Scroll context keep-alive
const SCROLL_KEEPALIVE: &str = "1m";

/// Per-user document store keyed by natural id
///
/// All operations are idempotent; the reconciler may be re-run after a crash
/// and converge without special recovery.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Return every document id currently indexed for the user.
    ///
    /// A missing index is treated as empty state: it is provisioned lazily
    /// and an empty set is returned.
    async fn list_ids(&self, user: &str) -> Result<HashSet<String>>;

    /// Fetch a document body by id.
    ///
    /// # Returns
    /// - `Ok(Some(body))` if found
    /// - `Ok(None)` if the document or index does not exist
    async fn get(&self, user: &str, id: &str) -> Result<Option<Value>>;

    /// Create or overwrite the document at `id`.
    async fn upsert(&self, user: &str, id: &str, body: &Value) -> Result<()>;

    /// Delete the document at `id`; deleting an absent id is a no-op.
    async fn delete(&self, user: &str, id: &str) -> Result<()>;
}

/// Connection settings for the index service
#[derive(Debug, Clone)]
pub struct ElasticConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ElasticConfig {
    fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }
}

/// Elasticsearch REST implementation of `DocumentIndex`
///
/// One index per user (`discogs_{user}`), documents addressed as
/// `/{index}/_doc/{id}` with basic-auth on every request.
pub struct ElasticIndex {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Service base URL
    base_url: String,

    /// Pre-computed `Authorization: Basic ...` header value
    auth_header: String,

    /// Retry policy for index requests
    retry_policy: RetryPolicy,
}

impl ElasticIndex {
    /// Create a new index client
    pub fn new(http_client: Arc<dyn HttpClient>, config: &ElasticConfig) -> Self {
        let credentials = format!("{}:{}", config.username, config.password);
        Self {
            http_client,
            base_url: config.base_url(),
            auth_header: format!("Basic {}", BASE64.encode(credentials)),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Override the service base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Logical index name for a user's collection
    pub fn index_name(user: &str) -> String {
        format!("discogs_{}", user)
    }

    fn doc_url(&self, user: &str, id: &str) -> String {
        format!(
            "{}/{}/_doc/{}",
            self.base_url,
            Self::index_name(user),
            urlencoding::encode(id)
        )
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Authorization", self.auth_header.clone())
            .header("Accept", "application/json")
    }

    /// Execute a request with bounded retry on 429/5xx and transport errors.
    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            match self.http_client.execute(request.clone()).await {
                Ok(response) => {
                    if !response.is_retryable() {
                        return Ok(response);
                    }

                    attempt += 1;
                    if attempt >= self.retry_policy.max_attempts {
                        warn!(
                            attempts = attempt,
                            status = response.status,
                            "Index request failed after retries"
                        );
                        return Err(IndexError::ApiError {
                            status_code: response.status,
                            message: format!("Request failed after {} attempts", attempt),
                        });
                    }

                    let backoff = self.retry_policy.backoff(attempt);
                    warn!(
                        attempt = attempt,
                        status = response.status,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retryable index status, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.retry_policy.max_attempts {
                        warn!(attempts = attempt, error = %e, "Index request failed after retries");
                        return Err(e.into());
                    }

                    let backoff = self.retry_policy.backoff(attempt);
                    warn!(
                        attempt = attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "Index request failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Provision the user's index.
    async fn create_index(&self, user: &str) -> Result<()> {
        let url = format!("{}/{}", self.base_url, Self::index_name(user));
        let response = self
            .execute_with_retry(self.request(HttpMethod::Put, url))
            .await?;

        if response.is_success() {
            info!(index = %Self::index_name(user), "Created index");
            Ok(())
        } else {
            Err(IndexError::ApiError {
                status_code: response.status,
                message: response.text(),
            })
        }
    }

    /// Release a scroll context. Best effort: the context expires on its own.
    async fn clear_scroll(&self, scroll_id: &str) {
        let url = format!("{}/_search/scroll", self.base_url);
        let request = match self
            .request(HttpMethod::Delete, url)
            .json(&json!({ "scroll_id": scroll_id }))
        {
            Ok(req) => req,
            Err(_) => return,
        };

        if let Err(e) = self.http_client.execute(request).await {
            debug!(error = %e, "Failed to clear scroll context");
        }
    }
}

#[async_trait]
impl DocumentIndex for ElasticIndex {
    #[instrument(skip(self), fields(user = %user))]
    async fn list_ids(&self, user: &str) -> Result<HashSet<String>> {
        let url = format!(
            "{}/{}/_search?scroll={}",
            self.base_url,
            Self::index_name(user),
            SCROLL_KEEPALIVE
        );
        let request = self.request(HttpMethod::Post, url).json(&json!({
            "query": { "match_all": {} },
            "size": SCROLL_BATCH_SIZE,
            "_source": false,
        }))?;

        let response = self.execute_with_retry(request).await?;

        // Missing index: provision it and report the empty state.
        if response.status == 404 {
            info!(index = %Self::index_name(user), "Index absent, creating");
            self.create_index(user).await?;
            return Ok(HashSet::new());
        }

        if !response.is_success() {
            return Err(IndexError::ApiError {
                status_code: response.status,
                message: response.text(),
            });
        }

        let mut parsed: SearchResponse = response
            .json()
            .map_err(|e| IndexError::ParseError(format!("Bad search response: {}", e)))?;

        let mut ids: HashSet<String> = HashSet::new();
        let mut scroll_id = parsed.scroll_id.take();

        loop {
            if parsed.hits.hits.is_empty() {
                break;
            }
            ids.extend(parsed.hits.hits.into_iter().map(|h| h.id));

            let Some(cursor) = scroll_id.clone() else {
                break;
            };

            let url = format!("{}/_search/scroll", self.base_url);
            let request = self.request(HttpMethod::Post, url).json(&json!({
                "scroll": SCROLL_KEEPALIVE,
                "scroll_id": cursor,
            }))?;

            let response = self.execute_with_retry(request).await?;
            if !response.is_success() {
                return Err(IndexError::ApiError {
                    status_code: response.status,
                    message: response.text(),
                });
            }

            parsed = response
                .json()
                .map_err(|e| IndexError::ParseError(format!("Bad scroll response: {}", e)))?;
            scroll_id = parsed.scroll_id.take().or(scroll_id);
        }

        if let Some(cursor) = scroll_id {
            self.clear_scroll(&cursor).await;
        }

        debug!(count = ids.len(), "Scanned indexed ids");
        Ok(ids)
    }

    #[instrument(skip(self), fields(user = %user, id = %id))]
    async fn get(&self, user: &str, id: &str) -> Result<Option<Value>> {
        let request = self.request(HttpMethod::Get, self.doc_url(user, id));
        let response = self.execute_with_retry(request).await?;

        if response.status == 404 {
            return Ok(None);
        }

        if !response.is_success() {
            return Err(IndexError::ApiError {
                status_code: response.status,
                message: response.text(),
            });
        }

        let doc: GetDocResponse = response
            .json()
            .map_err(|e| IndexError::ParseError(format!("Bad document response: {}", e)))?;

        Ok(if doc.found { doc.source } else { None })
    }

    #[instrument(skip(self, body), fields(user = %user, id = %id))]
    async fn upsert(&self, user: &str, id: &str, body: &Value) -> Result<()> {
        let request = self
            .request(HttpMethod::Put, self.doc_url(user, id))
            .json(body)?;

        let response = self.execute_with_retry(request).await?;

        if response.is_success() {
            debug!("Upserted document");
            Ok(())
        } else {
            Err(IndexError::ApiError {
                status_code: response.status,
                message: response.text(),
            })
        }
    }

    #[instrument(skip(self), fields(user = %user, id = %id))]
    async fn delete(&self, user: &str, id: &str) -> Result<()> {
        let request = self.request(HttpMethod::Delete, self.doc_url(user, id));
        let response = self.execute_with_retry(request).await?;

        // Deleting an already-absent document keeps delete idempotent.
        if response.is_success() || response.status == 404 {
            debug!("Deleted document");
            Ok(())
        } else {
            Err(IndexError::ApiError {
                status_code: response.status,
                message: response.text(),
            })
        }
    }
}
