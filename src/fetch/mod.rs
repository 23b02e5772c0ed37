//! HTTP fetching with retry, backoff, and rate limiting
//!
//! This module contains everything that touches the network:
//! - Building the HTTP client with the configured user agent and timeouts
//! - A bounded exponential backoff state machine for transient failures
//! - The fetcher itself, which paces requests with a randomized delay and
//!   classifies failures as transient (retried) or permanent (immediate)

mod backoff;
mod client;
mod fetcher;

pub use backoff::Backoff;
pub use client::build_http_client;
pub use fetcher::{FetchFailure, FetchSuccess, Fetcher};
