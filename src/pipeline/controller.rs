//! Pipeline controller - main run orchestration logic
//!
//! The controller drives every target through the pagination loop, one
//! target at a time with no overlapping fetches. Progress becomes durable
//! only at chunk boundaries, output flush first and checkpoint save
//! second, so an interruption at any point is safe to resume from.

use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::config::Config;
use crate::extract::{extract_candidates, Strategy};
use crate::fetch::{build_http_client, Fetcher};
use crate::output::{load_existing_fingerprints, ReviewWriter};
use crate::pipeline::{Target, TargetStatus};
use crate::review::Validator;
use crate::MorselError;
use std::path::Path;

/// Final state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
}

/// Summary of what a run accomplished
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Targets that reached a terminal state this run
    pub processed: usize,

    /// Targets marked done this run
    pub done: usize,

    /// Targets marked failed this run
    pub failed: usize,

    /// Targets skipped because the checkpoint already covers them
    pub skipped: usize,

    /// Review records written this run
    pub reviews_written: u64,

    pub status: RunStatus,
}

/// Main pipeline controller
///
/// Owns every collaborator: the fetcher, the compiled strategy list, the
/// validator with its global seen-set, the buffered writer, and the
/// checkpoint store.
pub struct Controller {
    config: Config,
    fetcher: Fetcher,
    strategies: Vec<Strategy>,
    validator: Validator,
    writer: ReviewWriter,
    store: CheckpointStore,
    checkpoint: Checkpoint,
    retry_failed: bool,
}

impl Controller {
    /// Creates a controller, loading checkpoint and prior output state
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `fresh` - Clear checkpoint and output, forcing a full re-run
    /// * `retry_failed` - Re-queue targets a previous run marked failed
    pub fn new(config: Config, fresh: bool, retry_failed: bool) -> Result<Self, MorselError> {
        let store = CheckpointStore::new(&config.output.checkpoint_path);

        if fresh {
            tracing::info!("Fresh run requested, clearing checkpoint and output stream");
            store.clear()?;
            remove_if_exists(Path::new(&config.output.reviews_path))?;
        }

        let checkpoint = store.load();

        // Seed deduplication from records already on disk so resumed runs
        // never re-emit a review.
        let existing = load_existing_fingerprints(Path::new(&config.output.reviews_path))?;
        if !existing.is_empty() {
            tracing::info!(
                "Reloaded {} fingerprint(s) from existing output",
                existing.len()
            );
        }

        // The stream itself is the authority on how many records exist;
        // after a crash it can be ahead of the checkpoint's count.
        let writer = ReviewWriter::new(&config.output.reviews_path, existing.len() as u64);
        let validator = Validator::with_seen(config.scraper.min_review_length, existing);

        let client = build_http_client(&config.http, &config.scraper)?;
        let fetcher = Fetcher::new(client, &config.scraper);

        let strategies = Strategy::compile_all(&config.selectors)?;

        Ok(Self {
            config,
            fetcher,
            strategies,
            validator,
            writer,
            store,
            checkpoint,
            retry_failed,
        })
    }

    /// Runs the pipeline over the target list
    ///
    /// Targets already covered by the checkpoint are skipped. Per-target
    /// failures are isolated; only output or checkpoint I/O errors abort
    /// the run.
    pub async fn run(&mut self, targets: Vec<Target>) -> Result<RunReport, MorselError> {
        let total = targets.len();
        let start = std::time::Instant::now();
        let reviews_at_start = self.writer.total_written();

        let mut report = RunReport {
            processed: 0,
            done: 0,
            failed: 0,
            skipped: 0,
            reviews_written: 0,
            status: RunStatus::Completed,
        };
        let mut in_chunk = 0usize;

        for (index, mut target) in targets.into_iter().enumerate() {
            if self.checkpoint.is_completed(&target.url) {
                tracing::debug!("Skipping already completed target: {}", target.url);
                report.skipped += 1;
                continue;
            }
            if self.checkpoint.is_failed(&target.url) && !self.retry_failed {
                tracing::debug!("Skipping previously failed target: {}", target.url);
                report.skipped += 1;
                continue;
            }

            target.status = TargetStatus::InProgress;
            tracing::info!("Processing {}/{}: {}", index + 1, total, target.url);

            self.scrape_target(&mut target).await;

            match target.status {
                TargetStatus::Done => {
                    self.checkpoint.mark_completed(&target.url);
                    report.done += 1;
                    tracing::info!(
                        "Completed {}: {} review(s) from {} page(s)",
                        target.url,
                        target.reviews_collected,
                        target.pages_fetched
                    );
                }
                TargetStatus::Failed => {
                    self.checkpoint.mark_failed(&target.url);
                    report.failed += 1;
                    tracing::warn!(
                        "Failed {}: {}",
                        target.url,
                        target.failure.as_deref().unwrap_or("unknown reason")
                    );
                }
                // scrape_target always leaves a terminal status
                other => {
                    tracing::error!("Target {} ended in non-terminal state {}", target.url, other);
                }
            }

            self.checkpoint.last_index = index;
            report.processed += 1;
            in_chunk += 1;

            if in_chunk >= self.config.scraper.chunk_size {
                self.persist_chunk()?;
                in_chunk = 0;
            }
        }

        // Final flush covers any partial chunk
        self.persist_chunk()?;

        report.reviews_written = self.writer.total_written() - reviews_at_start;
        tracing::info!(
            "Run complete: {} processed ({} done, {} failed), {} skipped, {} review(s) in {:?}",
            report.processed,
            report.done,
            report.failed,
            report.skipped,
            report.reviews_written,
            start.elapsed()
        );

        Ok(report)
    }

    /// Paginates one target, leaving it in a terminal state
    ///
    /// Pagination stops at the first page where every strategy comes up
    /// empty (the normal end of a review listing) or at `max-pages`.
    /// A fetch failure before any page succeeded fails the target; after
    /// a successful page it only ends pagination, keeping what was
    /// collected.
    async fn scrape_target(&mut self, target: &mut Target) {
        let listing_url = review_listing_url(&target.url);

        for page in 1..=self.config.scraper.max_pages {
            let page_url = format!("{}?page={}", listing_url, page);

            let success = match self.fetcher.fetch_page(&page_url).await {
                Ok(success) => success,
                Err(failure) => {
                    if target.pages_fetched > 0 {
                        tracing::warn!(
                            "Stopping pagination for {} at page {}: {}",
                            target.url,
                            page,
                            failure
                        );
                        break;
                    }
                    target.status = TargetStatus::Failed;
                    target.failure = Some(failure.to_string());
                    return;
                }
            };

            target.pages_fetched += 1;

            let candidates = extract_candidates(&success.body, page, &self.strategies);
            if candidates.is_empty() {
                tracing::debug!("No candidates on page {} of {}, stopping", page, target.url);
                break;
            }

            // Candidates stand or fall individually; one reject never
            // fails the page.
            for candidate in &candidates {
                match self.validator.validate(candidate, &target.url) {
                    Ok(record) => {
                        target.reviews_collected += 1;
                        self.writer.push(record);
                    }
                    Err(rejection) => {
                        tracing::trace!("Rejected candidate from {}: {}", target.url, rejection);
                    }
                }
            }
        }

        target.status = TargetStatus::Done;
    }

    /// Makes the current chunk durable: output flush, then checkpoint save
    ///
    /// The checkpoint must never claim targets whose records are still in
    /// memory, so the flush always comes first.
    fn persist_chunk(&mut self) -> Result<(), MorselError> {
        self.writer.flush()?;
        self.checkpoint.total_reviews = self.writer.total_written();
        self.store.save(&mut self.checkpoint)?;

        tracing::info!(
            "Checkpoint saved: {} completed, {} failed, {} review(s) written",
            self.checkpoint.completed.len(),
            self.checkpoint.failed.len(),
            self.checkpoint.total_reviews
        );

        Ok(())
    }

    /// The loaded checkpoint state (primarily for reporting and tests)
    pub fn checkpoint(&self) -> &Checkpoint {
        &self.checkpoint
    }
}

/// Derives the review listing URL for a target page
fn review_listing_url(target_url: &str) -> String {
    format!("{}/reviews", target_url.trim_end_matches('/'))
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_listing_url() {
        assert_eq!(
            review_listing_url("https://example.com/r/cafe"),
            "https://example.com/r/cafe/reviews"
        );
    }

    #[test]
    fn test_review_listing_url_trims_trailing_slash() {
        assert_eq!(
            review_listing_url("https://example.com/r/cafe/"),
            "https://example.com/r/cafe/reviews"
        );
    }
}
