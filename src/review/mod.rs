//! Review records, text normalization, and deduplication
//!
//! A raw candidate becomes a `ReviewRecord` only after passing the
//! validator: non-empty, long enough, and carrying a content fingerprint
//! not seen before in this run or any prior checkpointed run.

mod normalize;
mod validator;

pub use normalize::{clean_text, fingerprint, normalize_text};
pub use validator::{Rejection, Validator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An accepted review, immutable once appended to the output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// URL of the target page the review came from
    pub target_url: String,

    /// Page number within the target's review listing
    pub page: u32,

    /// Cleaned review text
    pub text: String,

    /// Character count of the cleaned text
    pub length: usize,

    /// When the review was first seen
    pub discovered_at: DateTime<Utc>,

    /// Content fingerprint used for deduplication
    pub fingerprint: String,
}
