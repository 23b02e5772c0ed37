use crate::extract::Strategy;
use chrono::{DateTime, Utc};
use scraper::Html;

/// A raw review candidate pulled from a page, before validation
#[derive(Debug, Clone)]
pub struct RawCandidate {
    /// Extracted text, trimmed but otherwise untouched
    pub text: String,

    /// Page number the candidate came from
    pub page: u32,

    /// When the candidate was extracted
    pub extracted_at: DateTime<Utc>,
}

/// Extracts review candidates from fetched markup
///
/// Strategies are tried in order; the first one yielding at least one
/// non-empty candidate wins for this page. An empty result from every
/// strategy means the page carries no reviews; the caller treats that as
/// the end of pagination, not as an error.
pub fn extract_candidates(html: &str, page: u32, strategies: &[Strategy]) -> Vec<RawCandidate> {
    let document = Html::parse_document(html);

    for strategy in strategies {
        let texts = strategy.apply(&document, html);
        if texts.is_empty() {
            continue;
        }

        tracing::debug!(
            "Strategy '{}' matched {} candidate(s) on page {}",
            strategy.name,
            texts.len(),
            page
        );

        let extracted_at = Utc::now();
        return texts
            .into_iter()
            .map(|text| RawCandidate {
                text,
                page,
                extracted_at,
            })
            .collect();
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SelectorEntry, SelectorRule};

    fn strategies(queries: &[&str]) -> Vec<Strategy> {
        let entries: Vec<SelectorEntry> = queries
            .iter()
            .map(|query| SelectorEntry {
                name: query.to_string(),
                rule: SelectorRule::Css {
                    query: query.to_string(),
                },
            })
            .collect();
        Strategy::compile_all(&entries).unwrap()
    }

    #[test]
    fn test_first_strategy_wins() {
        let html = r#"<html><body>
            <p class="primary">From primary</p>
            <p class="secondary">From secondary</p>
        </body></html>"#;

        let strategies = strategies(&["p.primary", "p.secondary"]);
        let candidates = extract_candidates(html, 1, &strategies);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "From primary");
    }

    #[test]
    fn test_falls_back_when_primary_empty() {
        let html = r#"<html><body>
            <p class="secondary">One</p>
            <p class="secondary">Two</p>
            <p class="secondary">Three</p>
        </body></html>"#;

        let strategies = strategies(&["p.primary", "p.secondary"]);
        let candidates = extract_candidates(html, 2, &strategies);

        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.page == 2));
    }

    #[test]
    fn test_no_strategy_matches() {
        let html = "<html><body><div>nothing relevant</div></body></html>";
        let strategies = strategies(&["p.primary", "p.secondary"]);
        assert!(extract_candidates(html, 1, &strategies).is_empty());
    }

    #[test]
    fn test_whitespace_only_does_not_win() {
        // Primary matches an element with no usable text; the fallback
        // must still get its chance.
        let html = r#"<html><body>
            <p class="primary">   </p>
            <p class="secondary">Real text</p>
        </body></html>"#;

        let strategies = strategies(&["p.primary", "p.secondary"]);
        let candidates = extract_candidates(html, 1, &strategies);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Real text");
    }
}
