//! Output module for the review record stream
//!
//! Accepted reviews buffer in memory and append to a JSON Lines file at
//! chunk boundaries. The stream is append-only; the writer also reloads
//! fingerprints from an existing stream so deduplication spans prior runs.

mod stats;
mod writer;

pub use stats::{load_stats, print_stats, RunStats};
pub use writer::{load_existing_fingerprints, ReviewWriter};

use thiserror::Error;

/// Errors from the output stream
///
/// These are the only errors (besides checkpoint saves) that abort an
/// entire run: losing the record stream is unrecoverable.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
