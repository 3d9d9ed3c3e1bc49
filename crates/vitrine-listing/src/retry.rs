//! Retry with exponential back-off and jitter for the listing client.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Everything else — 4xx,
//! malformed bodies, invalid configuration — is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ListingError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - [`ListingError::RateLimited`] — HTTP 429; the service asked us to back off.
/// - [`ListingError::UnexpectedStatus`] with a 5xx status.
///
/// **Not retriable (hard stop):**
/// - [`ListingError::UnexpectedStatus`] with a 4xx status — retrying won't fix it.
/// - [`ListingError::Deserialize`] — malformed response; retrying won't fix it.
/// - [`ListingError::InvalidBaseUrl`] — configuration error.
pub(crate) fn is_retriable(err: &ListingError) -> bool {
    match err {
        ListingError::Http(e) => e.is_timeout() || e.is_connect(),
        ListingError::RateLimited { .. } => true,
        ListingError::UnexpectedStatus { status, .. } => *status >= 500,
        ListingError::InvalidBaseUrl { .. } | ListingError::Deserialize { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before the n-th retry is `backoff_base_ms × 2ⁿ⁻¹ ± 25 % jitter`,
/// capped at 60 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ListingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ListingError>>,
{
    const MAX_DELAY_MS: u64 = 60_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "listing service transient error — retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deserialize_err() -> ListingError {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        ListingError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
    }

    #[test]
    fn rate_limited_is_retriable() {
        assert!(is_retriable(&ListingError::RateLimited {
            retry_after_secs: 5
        }));
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&ListingError::UnexpectedStatus {
            status: 503,
            url: "https://shop.example.com/products".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ListingError::UnexpectedStatus {
            status: 403,
            url: "https://shop.example.com/products".to_owned(),
        }));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        assert!(!is_retriable(&deserialize_err()));
    }

    #[test]
    fn invalid_base_url_is_not_retriable() {
        assert!(!is_retriable(&ListingError::InvalidBaseUrl {
            url: "not a url".to_owned(),
            reason: "parse failure".to_owned(),
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ListingError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_then_succeeds() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err::<u32, _>(ListingError::RateLimited {
                        retry_after_secs: 0,
                    })
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99, "should succeed after retries");
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "should have been called 3 times (2 failures + 1 success)"
        );
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_errors() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(deserialize_err())
            }
        })
        .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            1,
            "Deserialize must not be retried"
        );
        assert!(matches!(result, Err(ListingError::Deserialize { .. })));
    }

    #[tokio::test]
    async fn stops_after_max_retries() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ListingError::UnexpectedStatus {
                    status: 500,
                    url: "https://shop.example.com/products".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(
            calls.load(Ordering::SeqCst),
            3,
            "initial attempt plus two retries"
        );
        assert!(matches!(
            result,
            Err(ListingError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
