//! Run statistics from the review record stream
//!
//! A terminal summary over the collected output, printed by the `--stats`
//! mode and logged at the end of a run.

use crate::output::OutputError;
use crate::review::ReviewRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Summary of the collected review stream
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Total review records in the stream
    pub total_reviews: u64,

    /// Distinct targets with at least one review
    pub unique_targets: u64,

    /// Average reviews per target
    pub avg_reviews_per_target: f64,

    /// Shortest review length (characters)
    pub min_review_length: usize,

    /// Longest review length (characters)
    pub max_review_length: usize,

    /// Average review length (characters)
    pub avg_review_length: f64,
}

/// Computes statistics from the record stream on disk
///
/// An absent stream yields all-zero stats rather than an error.
pub fn load_stats(path: &Path) -> Result<RunStats, OutputError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RunStats::default()),
        Err(e) => return Err(e.into()),
    };

    let mut total: u64 = 0;
    let mut targets = HashSet::new();
    let mut length_sum: u64 = 0;
    let mut min_length = usize::MAX;
    let mut max_length = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<ReviewRecord>(&line) else {
            continue;
        };

        total += 1;
        targets.insert(record.target_url);
        length_sum += record.length as u64;
        min_length = min_length.min(record.length);
        max_length = max_length.max(record.length);
    }

    if total == 0 {
        return Ok(RunStats::default());
    }

    Ok(RunStats {
        total_reviews: total,
        unique_targets: targets.len() as u64,
        avg_reviews_per_target: total as f64 / targets.len() as f64,
        min_review_length: min_length,
        max_review_length: max_length,
        avg_review_length: length_sum as f64 / total as f64,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_stats(stats: &RunStats) {
    println!("=== Review Collection Statistics ===\n");

    println!("Overview:");
    println!("  Total reviews collected: {}", stats.total_reviews);
    println!("  Targets with reviews: {}", stats.unique_targets);
    println!(
        "  Average reviews per target: {:.2}",
        stats.avg_reviews_per_target
    );
    println!();

    println!("Review Length (characters):");
    println!("  Min: {}", stats.min_review_length);
    println!("  Max: {}", stats.max_review_length);
    println!("  Average: {:.1}", stats.avg_review_length);
}
