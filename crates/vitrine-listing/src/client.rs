//! HTTP client for the remote product-listing service.
//!
//! Wraps `reqwest` with listing-specific error handling, retry with
//! back-off, and normalization of wire records into `vitrine_core` types.
//! The client only ever *constructs* requests from parameter lists built
//! upstream — it performs no filtering or sorting of its own.

use std::time::Duration;

use reqwest::{Client, Url};
use vitrine_core::{AppConfig, Category, ListingPage, Param};

use crate::error::ListingError;
use crate::normalize::{normalize_category, normalize_product};
use crate::retry::retry_with_backoff;
use crate::types::{CategoriesEnvelope, CategoryRecord, ProductRecord, ProductsEnvelope};

/// Client for the product-listing REST service.
///
/// Cheap to clone; clones share the underlying connection pool. Use
/// [`ListingClient::from_config`] for production or [`ListingClient::new`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ListingClient {
    /// Creates a client against the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ListingError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ListingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends endpoint segments instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ListingError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ListingClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ListingError> {
        Self::new(
            &config.listing_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// Fetches one page of products for the given request parameters.
    ///
    /// Individual malformed product entries are skipped with a warning;
    /// the page fails only if the envelope itself is unusable.
    ///
    /// # Errors
    ///
    /// - [`ListingError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ListingError::UnexpectedStatus`] — non-2xx status (5xx retried, 4xx not).
    /// - [`ListingError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`ListingError::Deserialize`] — envelope is not valid JSON of the expected shape.
    pub async fn search_products(&self, params: &[Param]) -> Result<ListingPage, ListingError> {
        let url = self.endpoint_url("products", params)?;
        let body = self.request_json(&url).await?;

        let envelope: ProductsEnvelope =
            serde_json::from_value(body).map_err(|e| ListingError::Deserialize {
                context: format!("products page from {url}"),
                source: e,
            })?;

        let items = envelope
            .items
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<ProductRecord>(value)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "search_products: skipping malformed product entry");
                    })
                    .ok()
            })
            .filter_map(|record| {
                let id = record.id.clone();
                normalize_product(record)
                    .map_err(|reason| {
                        tracing::warn!(product_id = %id, %reason, "search_products: skipping unnormalizable product");
                    })
                    .ok()
            })
            .collect();

        Ok(ListingPage {
            items,
            count: envelope.count,
        })
    }

    /// Fetches the full flat category list used to build the taxonomy.
    ///
    /// Takes no parameters; the service returns every category in one shot.
    /// Malformed individual records are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ListingClient::search_products`].
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ListingError> {
        let url = self.endpoint_url("categories", &[])?;
        let body = self.request_json(&url).await?;

        let envelope: CategoriesEnvelope =
            serde_json::from_value(body).map_err(|e| ListingError::Deserialize {
                context: format!("categories from {url}"),
                source: e,
            })?;

        Ok(envelope
            .categories
            .into_iter()
            .filter_map(|value| {
                serde_json::from_value::<CategoryRecord>(value)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "fetch_categories: skipping malformed category entry");
                    })
                    .ok()
            })
            .map(normalize_category)
            .collect())
    }

    /// Builds the full endpoint URL with properly percent-encoded query
    /// parameters, preserving the caller's parameter order.
    fn endpoint_url(&self, endpoint: &str, params: &[Param]) -> Result<Url, ListingError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ListingError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in params {
                pairs.append_pair(param.key, &param.value);
            }
        }
        Ok(url)
    }

    /// Sends a GET request with retry, maps non-2xx statuses to typed
    /// errors, and parses the response body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, ListingError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ListingError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(ListingError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| ListingError::Deserialize {
                    context: url.to_string(),
                    source: e,
                })
            }
        })
        .await
    }
}
