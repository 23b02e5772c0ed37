//! Target list loading
//!
//! Targets arrive as a tabular text file with a header line naming a
//! `url` column (the usual source is a spreadsheet export). The loader
//! pulls that column, drops blanks, and de-duplicates while preserving
//! input order. Quoted fields containing commas are not supported.

use crate::pipeline::Target;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors from loading the target list
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read targets file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Targets file is empty")]
    Empty,

    #[error("Targets file has no 'url' column")]
    MissingUrlColumn,
}

/// Loads the ordered target list from a tabular file
pub fn load_targets(path: &Path) -> Result<Vec<Target>, InputError> {
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().ok_or(InputError::Empty)?;
    let url_column = header
        .split(',')
        .position(|field| field.trim().trim_matches('"').eq_ignore_ascii_case("url"))
        .ok_or(InputError::MissingUrlColumn)?;

    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for line in lines {
        let Some(field) = line.split(',').nth(url_column) else {
            continue;
        };
        let url = field.trim().trim_matches('"');
        if url.is_empty() {
            continue;
        }
        if seen.insert(url.to_string()) {
            targets.push(Target::new(url));
        }
    }

    tracing::info!(
        "Loaded {} unique target(s) from {}",
        targets.len(),
        path.display()
    );

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_targets(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_url_column() {
        let file = write_targets(
            "name,url,rating\n\
             Cafe One,https://example.com/r/one,4.2\n\
             Cafe Two,https://example.com/r/two,3.9\n",
        );

        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].url, "https://example.com/r/one");
        assert_eq!(targets[1].url, "https://example.com/r/two");
    }

    #[test]
    fn test_dedupes_preserving_order() {
        let file = write_targets(
            "url\n\
             https://example.com/r/b\n\
             https://example.com/r/a\n\
             https://example.com/r/b\n",
        );

        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].url, "https://example.com/r/b");
        assert_eq!(targets[1].url, "https://example.com/r/a");
    }

    #[test]
    fn test_skips_blank_url_cells() {
        let file = write_targets("name,url\nempty,\nfine,https://example.com/r/x\n");
        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn test_quoted_urls_unwrapped() {
        let file = write_targets("\"url\"\n\"https://example.com/r/q\"\n");
        let targets = load_targets(file.path()).unwrap();
        assert_eq!(targets[0].url, "https://example.com/r/q");
    }

    #[test]
    fn test_missing_url_column() {
        let file = write_targets("name,link\nCafe,https://example.com\n");
        assert!(matches!(
            load_targets(file.path()),
            Err(InputError::MissingUrlColumn)
        ));
    }

    #[test]
    fn test_empty_file() {
        let file = write_targets("");
        assert!(matches!(load_targets(file.path()), Err(InputError::Empty)));
    }
}
