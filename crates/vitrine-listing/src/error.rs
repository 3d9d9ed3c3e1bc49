use thiserror::Error;

/// Errors returned by the listing-service client.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid listing base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP 429; the service has asked us to back off.
    #[error("rate limited by the listing service (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
