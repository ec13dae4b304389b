//! Discogs API connector implementation
//!
//! Implements the `CollectionSource` trait against the Discogs REST API.

use async_trait::async_trait;
use bridge_http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{DiscogsError, Result};
use crate::types::{
    ApiMessage, CollectionItem, CollectionPage, FolderResponse, ProfileResponse, ReleasesResponse,
};

/// Discogs API base URL
const DISCOGS_API_BASE: &str = "https://api.discogs.com";

/// Collection page size (API maximum)
const PER_PAGE: u32 = 100;

/// Read side of a user's remote collection
///
/// The reconciler consumes this seam; `DiscogsConnector` is the production
/// implementation and tests substitute a mock.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Verify the target user exists upstream.
    ///
    /// Returns the total item count of the user's collection. This is a
    /// fail-fast check and is not retried on a rejection.
    ///
    /// # Errors
    ///
    /// Returns `DiscogsError::UnknownUser` when the lookup is rejected.
    async fn verify_user(&self, user: &str) -> Result<u64>;

    /// Verify the configured token is valid for some account.
    ///
    /// Only meaningful when a token is configured; implementations without a
    /// token succeed trivially.
    ///
    /// # Errors
    ///
    /// Returns `DiscogsError::InvalidToken` when the profile lookup does not
    /// identify an account.
    async fn verify_token(&self, user: &str) -> Result<()>;

    /// Whether requests are authenticated (selects the rate-limit budget).
    fn is_authenticated(&self) -> bool;

    /// Fetch one page of the user's collection (1-based page number).
    async fn fetch_page(&self, user: &str, page: u32) -> Result<CollectionPage>;
}

/// Discogs API connector
///
/// # Example
///
/// ```ignore
/// use provider_discogs::{CollectionSource, DiscogsConnector};
///
/// let connector = DiscogsConnector::new(http_client, Some(token));
/// let count = connector.verify_user("rodneyfool").await?;
/// let page = connector.fetch_page("rodneyfool", 1).await?;
/// ```
pub struct DiscogsConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// API base URL, overridable for tests
    base_url: String,

    /// Optional personal access token
    token: Option<String>,

    /// Retry policy for page fetches
    retry_policy: RetryPolicy,
}

impl DiscogsConnector {
    /// Create a new connector.
    ///
    /// An empty token is treated as anonymous mode.
    pub fn new(http_client: Arc<dyn HttpClient>, token: Option<String>) -> Self {
        Self {
            http_client,
            base_url: DISCOGS_API_BASE.to_string(),
            token: token.filter(|t| !t.is_empty()),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy for page fetches
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    fn request(&self, url: String) -> HttpRequest {
        let mut request = HttpRequest::get(url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Discogs token={}", token));
        }
        request
    }

    /// Execute a request with bounded retry on 429/5xx and transport errors.
    async fn execute_with_retry(&self, url: String) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            match self.http_client.execute(self.request(url.clone())).await {
                Ok(response) => {
                    if !response.is_retryable() {
                        debug!(status = response.status, "API request completed");
                        return Ok(response);
                    }

                    attempt += 1;
                    if attempt >= self.retry_policy.max_attempts {
                        warn!(
                            attempts = attempt,
                            status = response.status,
                            "API request failed after retries"
                        );
                        return Err(DiscogsError::ApiError {
                            status_code: response.status,
                            message: format!("Request failed after {} attempts", attempt),
                        });
                    }

                    let backoff = self.retry_policy.backoff(attempt);
                    warn!(
                        attempt = attempt,
                        status = response.status,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retryable API status, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.retry_policy.max_attempts {
                        warn!(attempts = attempt, error = %e, "API request failed after retries");
                        return Err(e.into());
                    }

                    let backoff = self.retry_policy.backoff(attempt);
                    warn!(
                        attempt = attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "API request failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    fn folder_url(&self, user: &str) -> String {
        format!(
            "{}/users/{}/collection/folders/0",
            self.base_url,
            urlencoding::encode(user)
        )
    }
}

#[async_trait]
impl CollectionSource for DiscogsConnector {
    #[instrument(skip(self), fields(user = %user))]
    async fn verify_user(&self, user: &str) -> Result<u64> {
        // Fail-fast: a rejected lookup is reported, never retried.
        let response = self.http_client.execute(self.request(self.folder_url(user))).await?;

        if response.is_success() {
            let folder: FolderResponse = response.json().map_err(|e| {
                DiscogsError::ParseError(format!("Bad collection folder response: {}", e))
            })?;
            info!(count = folder.count, "Verified Discogs user");
            return Ok(folder.count);
        }

        let message = response
            .json::<ApiMessage>()
            .map(|m| m.message)
            .unwrap_or_else(|_| response.text());

        Err(DiscogsError::UnknownUser {
            user: user.to_string(),
            status_code: response.status,
            message,
        })
    }

    #[instrument(skip(self), fields(user = %user))]
    async fn verify_token(&self, user: &str) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }

        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(user));
        let response = self.http_client.execute(self.request(url)).await?;

        // A valid token surfaces the account's email in the profile; an
        // anonymous or mis-tokened request never does.
        let has_identity = response.is_success()
            && response
                .json::<ProfileResponse>()
                .ok()
                .and_then(|p| p.email)
                .is_some_and(|email| !email.is_empty());

        if has_identity {
            debug!("Verified Discogs token");
            Ok(())
        } else {
            Err(DiscogsError::InvalidToken {
                user: user.to_string(),
            })
        }
    }

    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[instrument(skip(self), fields(user = %user, page = page))]
    async fn fetch_page(&self, user: &str, page: u32) -> Result<CollectionPage> {
        let url = format!(
            "{}/releases?page={}&per_page={}",
            self.folder_url(user),
            page,
            PER_PAGE
        );

        let response = self.execute_with_retry(url).await?;

        if !response.is_success() {
            return Err(DiscogsError::ApiError {
                status_code: response.status,
                message: response
                    .json::<ApiMessage>()
                    .map(|m| m.message)
                    .unwrap_or_else(|_| response.text()),
            });
        }

        let parsed: ReleasesResponse = response
            .json()
            .map_err(|e| DiscogsError::ParseError(format!("Bad releases response: {}", e)))?;

        let items = parsed
            .releases
            .into_iter()
            .map(CollectionItem::from_release)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            page = page,
            pages = parsed.pagination.pages,
            items = items.len(),
            "Fetched collection page"
        );

        Ok(CollectionPage {
            pagination: parsed.pagination,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_http::HttpError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;
    use std::time::Duration;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> bridge_http::Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn fast_retries() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn test_verify_user_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.ends_with("/users/rodney/collection/folders/0"));
            Ok(response(200, r#"{"id": 0, "name": "All", "count": 42}"#))
        });

        let connector = DiscogsConnector::new(Arc::new(mock_http), None);
        let count = connector.verify_user("rodney").await.unwrap();

        assert_eq!(count, 42);
    }

    #[tokio::test]
    async fn test_verify_user_not_found_is_fatal() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                404,
                r#"{"message": "User does not exist or may have been deleted."}"#,
            ))
        });

        let connector = DiscogsConnector::new(Arc::new(mock_http), None);
        let err = connector.verify_user("nobody").await.unwrap_err();

        match err {
            DiscogsError::UnknownUser {
                user,
                status_code,
                message,
            } => {
                assert_eq!(user, "nobody");
                assert_eq!(status_code, 404);
                assert!(message.contains("does not exist"));
            }
            other => panic!("expected UnknownUser, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_token_valid() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(
                req.headers.get("Authorization"),
                Some(&"Discogs token=tok123".to_string())
            );
            Ok(response(200, r#"{"username": "rodney", "email": "r@example.com"}"#))
        });

        let connector = DiscogsConnector::new(Arc::new(mock_http), Some("tok123".to_string()));
        assert!(connector.verify_token("rodney").await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_token_without_identity_is_invalid() {
        let mut mock_http = MockHttpClient::new();
        // Profile without an email: the token did not authenticate anyone.
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, r#"{"username": "rodney"}"#)));

        let connector = DiscogsConnector::new(Arc::new(mock_http), Some("bad".to_string()));
        let err = connector.verify_token("rodney").await.unwrap_err();

        assert!(matches!(err, DiscogsError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_verify_token_skipped_without_token() {
        let mock_http = MockHttpClient::new();
        let connector = DiscogsConnector::new(Arc::new(mock_http), None);

        assert!(!connector.is_authenticated());
        assert!(connector.verify_token("rodney").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_token_means_anonymous() {
        let mock_http = MockHttpClient::new();
        let connector = DiscogsConnector::new(Arc::new(mock_http), Some(String::new()));

        assert!(!connector.is_authenticated());
    }

    #[tokio::test]
    async fn test_fetch_page_parses_items() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("page=1"));
            assert!(req.url.contains("per_page=100"));
            Ok(response(
                200,
                r#"{
                    "pagination": {"page": 1, "pages": 1, "per_page": 100, "items": 2},
                    "releases": [
                        {
                            "date_added": "2020-01-01T00:00:00-08:00",
                            "basic_information": {"title": "A", "artists": [{"name": "X"}]}
                        },
                        {
                            "date_added": "2020-02-02T00:00:00-08:00",
                            "basic_information": {"title": "B", "artists": [{"name": "Y"}]}
                        }
                    ]
                }"#,
            ))
        });

        let connector = DiscogsConnector::new(Arc::new(mock_http), None);
        let page = connector.fetch_page("rodney", 1).await.unwrap();

        assert_eq!(page.pagination.pages, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "2020-01-01T00:00:00-08:00");
        assert_eq!(page.items[1].title, "B");
    }

    #[tokio::test]
    async fn test_fetch_page_retries_transient_error_then_succeeds() {
        let mut mock_http = MockHttpClient::new();
        let mut calls = 0u32;
        mock_http.expect_execute().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(response(503, ""))
            } else {
                Ok(response(
                    200,
                    r#"{
                        "pagination": {"page": 1, "pages": 1, "per_page": 100, "items": 0},
                        "releases": []
                    }"#,
                ))
            }
        });

        let connector = DiscogsConnector::new(Arc::new(mock_http), None)
            .with_retry_policy(fast_retries());
        let page = connector.fetch_page("rodney", 1).await.unwrap();

        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_bounded_retry_exhaustion() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(3)
            .returning(|_| Err(HttpError::Transport("connection refused".to_string())));

        let connector = DiscogsConnector::new(Arc::new(mock_http), None)
            .with_retry_policy(fast_retries());
        let err = connector.fetch_page("rodney", 1).await.unwrap_err();

        assert!(matches!(err, DiscogsError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_client_error_not_retried() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(403, r#"{"message": "You cannot view this collection"}"#)));

        let connector = DiscogsConnector::new(Arc::new(mock_http), None)
            .with_retry_policy(fast_retries());
        let err = connector.fetch_page("rodney", 1).await.unwrap_err();

        match err {
            DiscogsError::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 403);
                assert!(message.contains("cannot view"));
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }
}
