use crate::config::ScraperConfig;
use crate::fetch::Backoff;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Delay before the first retry; doubles per attempt up to the cap.
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const RETRY_DELAY_CAP: Duration = Duration::from_secs(30);

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchSuccess {
    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,
}

/// Classified fetch failure
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Retryable failure (timeout, connect error, 5xx, 429), surfaced only
    /// after the retry budget is exhausted
    #[error("transient failure after {attempts} attempt(s): {reason}")]
    Transient { reason: String, attempts: u32 },

    /// Non-retryable failure (4xx other than 429, malformed URL)
    #[error("permanent failure: {reason}")]
    Permanent { reason: String },
}

/// How a response status or request error should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Success,
    Retry,
    Abort,
}

/// Classifies an HTTP status code per the retry policy
///
/// | Condition           | Disposition |
/// |---------------------|-------------|
/// | 2xx                 | Success     |
/// | 429                 | Retry       |
/// | 5xx                 | Retry       |
/// | other 4xx           | Abort       |
/// | 3xx (not followed)  | Abort       |
fn classify_status(status: StatusCode) -> Disposition {
    if status.is_success() {
        Disposition::Success
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Disposition::Retry
    } else {
        Disposition::Abort
    }
}

/// HTTP fetcher with rate limiting and bounded retries
///
/// Every request is preceded by a randomized delay drawn from the
/// configured range. Transient failures are retried with exponential
/// backoff inside `fetch_page`; the caller only ever sees the final
/// classification.
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    delay_range_ms: (u64, u64),
}

impl Fetcher {
    /// Creates a fetcher from a built client and the scraper configuration
    pub fn new(client: Client, config: &ScraperConfig) -> Self {
        Self {
            client,
            max_attempts: config.max_retries,
            delay_range_ms: (config.delay_min_ms, config.delay_max_ms),
        }
    }

    /// Fetches a single URL, retrying transient failures
    ///
    /// # Returns
    ///
    /// * `Ok(FetchSuccess)` - 2xx response with its body
    /// * `Err(FetchFailure::Transient)` - retry budget exhausted
    /// * `Err(FetchFailure::Permanent)` - non-retryable failure
    pub async fn fetch_page(&self, url: &str) -> Result<FetchSuccess, FetchFailure> {
        // A URL that does not parse will never succeed; fail before
        // spending any delay or network time on it.
        if let Err(e) = Url::parse(url) {
            return Err(FetchFailure::Permanent {
                reason: format!("malformed URL: {}", e),
            });
        }

        let mut backoff = Backoff::new(self.max_attempts, INITIAL_RETRY_DELAY, RETRY_DELAY_CAP);

        loop {
            self.pause().await;

            let reason = match self.attempt(url).await {
                Ok(success) => return Ok(success),
                Err(AttemptFailure::Retryable(reason)) => reason,
                Err(AttemptFailure::Fatal(reason)) => {
                    return Err(FetchFailure::Permanent { reason })
                }
            };

            match backoff.after_failure() {
                Some(delay) => {
                    tracing::debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        backoff.attempts(),
                        url,
                        reason,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(FetchFailure::Transient {
                        reason,
                        attempts: backoff.attempts(),
                    })
                }
            }
        }
    }

    /// Issues one GET request and classifies the outcome
    async fn attempt(&self, url: &str) -> Result<FetchSuccess, AttemptFailure> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    format!("connection error: {}", e)
                } else {
                    e.to_string()
                };
                return Err(AttemptFailure::Retryable(reason));
            }
        };

        let status = response.status();
        match classify_status(status) {
            Disposition::Success => match response.text().await {
                Ok(body) => Ok(FetchSuccess {
                    status: status.as_u16(),
                    body,
                }),
                // Body read failures are connection-level, same as a timeout
                Err(e) => Err(AttemptFailure::Retryable(format!("body read error: {}", e))),
            },
            Disposition::Retry => Err(AttemptFailure::Retryable(format!("HTTP {}", status))),
            Disposition::Abort => Err(AttemptFailure::Fatal(format!("HTTP {}", status))),
        }
    }

    /// Sleeps for a random duration within the configured delay range
    async fn pause(&self) {
        let (min, max) = self.delay_range_ms;
        if max == 0 {
            return;
        }
        let delay_ms = rand::thread_rng().gen_range(min..=max);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

/// Per-attempt failure, before retry accounting
enum AttemptFailure {
    Retryable(String),
    Fatal(String),
}
