use crate::config::{HttpConfig, ScraperConfig};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Arguments
///
/// * `http` - The HTTP client configuration
/// * `scraper` - The scraper configuration (per-request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    http: &HttpConfig,
    scraper: &ScraperConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(http.user_agent.clone())
        .timeout(Duration::from_secs(scraper.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_configs() -> (HttpConfig, ScraperConfig) {
        (
            HttpConfig {
                user_agent: "Mozilla/5.0 (compatible; test)".to_string(),
            },
            ScraperConfig {
                max_pages: 5,
                delay_min_ms: 0,
                delay_max_ms: 0,
                max_retries: 3,
                timeout_secs: 30,
                chunk_size: 10,
                min_review_length: 20,
            },
        )
    }

    #[test]
    fn test_build_http_client() {
        let (http, scraper) = test_configs();
        assert!(build_http_client(&http, &scraper).is_ok());
    }
}
