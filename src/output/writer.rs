use crate::output::OutputError;
use crate::review::ReviewRecord;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered append-only writer for the review record stream
///
/// Records accumulate in memory and hit disk only on `flush`, one JSON
/// object per line. The pipeline flushes at chunk boundaries, always
/// before the matching checkpoint save.
pub struct ReviewWriter {
    path: PathBuf,
    buffer: Vec<ReviewRecord>,
    total_written: u64,
}

impl ReviewWriter {
    /// Creates a writer; `existing` is the record count already in the
    /// stream from prior runs
    pub fn new(path: impl Into<PathBuf>, existing: u64) -> Self {
        Self {
            path: path.into(),
            buffer: Vec::new(),
            total_written: existing,
        }
    }

    /// Buffers an accepted record
    pub fn push(&mut self, record: ReviewRecord) {
        self.buffer.push(record);
    }

    /// Number of records waiting in the buffer
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Total records durably written, including prior runs
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Appends the buffer to the stream and syncs it to disk
    ///
    /// Returns the number of records written. An empty buffer is a no-op.
    pub fn flush(&mut self) -> Result<u64, OutputError> {
        if self.buffer.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for record in &self.buffer {
            let line = serde_json::to_string(record)?;
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
        // The checkpoint save that follows must never land before these
        // records are durable.
        writer.get_ref().sync_all()?;

        let written = self.buffer.len() as u64;
        self.total_written += written;
        self.buffer.clear();

        tracing::debug!(
            "Flushed {} record(s) to {} ({} total)",
            written,
            self.path.display(),
            self.total_written
        );

        Ok(written)
    }
}

/// Reloads fingerprints from an existing record stream
///
/// Called once at startup so the validator's seen-set spans prior runs.
/// A truncated final line (crash mid-flush) is skipped with a warning;
/// the interrupted chunk will be re-processed and re-written cleanly.
pub fn load_existing_fingerprints(path: &Path) -> Result<HashSet<String>, OutputError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut fingerprints = HashSet::new();
    let mut skipped = 0usize;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ReviewRecord>(&line) {
            Ok(record) => {
                fingerprints.insert(record.fingerprint);
            }
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} unparseable line(s) in {} while reloading fingerprints",
            skipped,
            path.display()
        );
    }

    Ok(fingerprints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn record(text: &str, fingerprint: &str) -> ReviewRecord {
        ReviewRecord {
            target_url: "https://example.com/r/cafe".to_string(),
            page: 1,
            text: text.to_string(),
            length: text.chars().count(),
            discovered_at: Utc::now(),
            fingerprint: fingerprint.to_string(),
        }
    }

    #[test]
    fn test_flush_appends_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviews.jsonl");

        let mut writer = ReviewWriter::new(&path, 0);
        writer.push(record("first review", "fp1"));
        writer.push(record("second review", "fp2"));
        assert_eq!(writer.buffered(), 2);

        let written = writer.flush().unwrap();
        assert_eq!(written, 2);
        assert_eq!(writer.buffered(), 0);
        assert_eq!(writer.total_written(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        // Second flush appends rather than truncates
        writer.push(record("third review", "fp3"));
        writer.flush().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_flush_empty_buffer_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviews.jsonl");

        let mut writer = ReviewWriter::new(&path, 0);
        assert_eq!(writer.flush().unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_existing_fingerprints() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviews.jsonl");

        let mut writer = ReviewWriter::new(&path, 0);
        writer.push(record("first", "fp1"));
        writer.push(record("second", "fp2"));
        writer.flush().unwrap();

        let fingerprints = load_existing_fingerprints(&path).unwrap();
        assert_eq!(fingerprints.len(), 2);
        assert!(fingerprints.contains("fp1"));
        assert!(fingerprints.contains("fp2"));
    }

    #[test]
    fn test_load_fingerprints_missing_file() {
        let dir = TempDir::new().unwrap();
        let fingerprints =
            load_existing_fingerprints(&dir.path().join("nope.jsonl")).unwrap();
        assert!(fingerprints.is_empty());
    }

    #[test]
    fn test_load_fingerprints_skips_truncated_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reviews.jsonl");

        let mut writer = ReviewWriter::new(&path, 0);
        writer.push(record("whole record", "fp1"));
        writer.flush().unwrap();

        // Simulate a crash mid-write: a torn trailing line
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("{\"target_url\":\"https://example.com");
        std::fs::write(&path, content).unwrap();

        let fingerprints = load_existing_fingerprints(&path).unwrap();
        assert_eq!(fingerprints.len(), 1);
        assert!(fingerprints.contains("fp1"));
    }
}
