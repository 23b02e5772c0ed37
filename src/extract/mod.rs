//! Review candidate extraction
//!
//! This module turns fetched markup into raw review candidates. Extraction
//! is driven by an ordered list of named strategies; the first strategy
//! that yields at least one non-empty candidate wins for a page, so a
//! layout change that breaks the primary selector degrades to the next
//! fallback instead of silently dropping reviews.

mod extractor;
mod strategy;

pub use extractor::{extract_candidates, RawCandidate};
pub use strategy::Strategy;
