use crate::extract::RawCandidate;
use crate::review::{clean_text, fingerprint, ReviewRecord};
use std::collections::HashSet;

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Empty, whitespace-only, or no alphabetic content at all
    Empty,

    /// Below the configured minimum length
    TooShort { length: usize },

    /// Fingerprint already recorded in this run or a prior one
    Duplicate,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty or non-textual"),
            Self::TooShort { length } => write!(f, "too short ({} chars)", length),
            Self::Duplicate => write!(f, "duplicate fingerprint"),
        }
    }
}

/// Validates candidates and enforces global fingerprint uniqueness
///
/// The seen-set spans the entire run and, when seeded from the existing
/// output stream, all prior checkpointed runs, so reprocessing a target
/// after a crash can never duplicate a record.
pub struct Validator {
    min_length: usize,
    seen: HashSet<String>,
}

impl Validator {
    /// Creates a validator with an empty seen-set
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            seen: HashSet::new(),
        }
    }

    /// Creates a validator seeded with fingerprints from prior runs
    pub fn with_seen(min_length: usize, seen: HashSet<String>) -> Self {
        Self { min_length, seen }
    }

    /// Validates one candidate against the filter chain
    ///
    /// # Returns
    ///
    /// * `Ok(ReviewRecord)` - accepted; its fingerprint is now recorded
    /// * `Err(Rejection)` - rejected with the reason
    pub fn validate(
        &mut self,
        candidate: &RawCandidate,
        target_url: &str,
    ) -> Result<ReviewRecord, Rejection> {
        let text = clean_text(&candidate.text);

        if text.is_empty() || !text.chars().any(|c| c.is_alphabetic()) {
            return Err(Rejection::Empty);
        }

        let length = text.chars().count();
        if length < self.min_length {
            return Err(Rejection::TooShort { length });
        }

        let fingerprint = fingerprint(&text, target_url);
        if !self.seen.insert(fingerprint.clone()) {
            return Err(Rejection::Duplicate);
        }

        Ok(ReviewRecord {
            target_url: target_url.to_string(),
            page: candidate.page,
            text,
            length,
            discovered_at: candidate.extracted_at,
            fingerprint,
        })
    }

    /// Number of distinct fingerprints recorded so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
