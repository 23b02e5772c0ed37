use crate::config::{SelectorEntry, SelectorRule};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;

/// Regex locating the serialized state blob embedded in a page's markup.
/// The capture handles escaped quotes inside the JSON string literal.
const STATE_PATTERN: &str =
    r#"(?s)window\.__PRELOADED_STATE__\s*=\s*JSON\.parse\("((?:\\.|[^"\\])*)"\)"#;

/// A compiled extraction strategy
///
/// Strategies are compiled once at startup from the `[[selector]]` config
/// entries and tried in order for every fetched page.
pub struct Strategy {
    /// Strategy name, used in logs
    pub name: String,

    kind: StrategyKind,
}

enum StrategyKind {
    /// CSS selector over the parsed DOM
    Css(Selector),

    /// Field lookup inside the page's embedded serialized state
    ScriptState { field: String, pattern: Regex },
}

impl Strategy {
    /// Compiles a single config entry into a runnable strategy
    pub fn compile(entry: &SelectorEntry) -> Result<Self, ConfigError> {
        let kind = match &entry.rule {
            SelectorRule::Css { query } => {
                let selector =
                    Selector::parse(query).map_err(|e| ConfigError::InvalidSelector {
                        query: query.clone(),
                        message: e.to_string(),
                    })?;
                StrategyKind::Css(selector)
            }
            SelectorRule::ScriptState { field } => {
                let pattern =
                    Regex::new(STATE_PATTERN).map_err(|e| ConfigError::InvalidSelector {
                        query: STATE_PATTERN.to_string(),
                        message: e.to_string(),
                    })?;
                StrategyKind::ScriptState {
                    field: field.clone(),
                    pattern,
                }
            }
        };

        Ok(Self {
            name: entry.name.clone(),
            kind,
        })
    }

    /// Compiles the full ordered strategy list
    pub fn compile_all(entries: &[SelectorEntry]) -> Result<Vec<Self>, ConfigError> {
        entries.iter().map(Self::compile).collect()
    }

    /// Runs this strategy over a page, returning trimmed non-empty texts
    pub fn apply(&self, document: &scraper::Html, raw_html: &str) -> Vec<String> {
        match &self.kind {
            StrategyKind::Css(selector) => document
                .select(selector)
                .map(|element| element.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty())
                .collect(),
            StrategyKind::ScriptState { field, pattern } => {
                script_state_values(raw_html, field, pattern)
            }
        }
    }
}

/// Extracts string values for `field` from the embedded serialized state
///
/// Locates the `JSON.parse("…")` payload, unescapes the string literal,
/// parses it, and walks the resulting tree collecting every non-empty
/// string stored under the given key.
fn script_state_values(html: &str, field: &str, pattern: &Regex) -> Vec<String> {
    let Some(captures) = pattern.captures(html) else {
        return Vec::new();
    };

    let blob = unescape_js_string(&captures[1]);
    let value: serde_json::Value = match serde_json::from_str(&blob) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Embedded state did not parse as JSON: {}", e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    collect_field_strings(&value, field, &mut found);
    found
}

/// Undoes JavaScript string-literal escaping for the captured payload
fn unescape_js_string(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            // Covers \" \\ \/ and anything else escaped verbatim
            Some(other) => out.push(other),
            None => break,
        }
    }
    out
}

/// Depth-first walk collecting non-empty strings under `field`
fn collect_field_strings(value: &serde_json::Value, field: &str, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                if key == field {
                    if let serde_json::Value::String(text) = child {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            out.push(trimmed.to_string());
                        }
                    }
                }
                collect_field_strings(child, field, out);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_field_strings(item, field, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn css_strategy(query: &str) -> Strategy {
        Strategy::compile(&SelectorEntry {
            name: "test".to_string(),
            rule: SelectorRule::Css {
                query: query.to_string(),
            },
        })
        .unwrap()
    }

    fn state_strategy(field: &str) -> Strategy {
        Strategy::compile(&SelectorEntry {
            name: "state".to_string(),
            rule: SelectorRule::ScriptState {
                field: field.to_string(),
            },
        })
        .unwrap()
    }

    #[test]
    fn test_css_strategy_collects_text() {
        let html = r#"<html><body>
            <p class="review-text">Great food</p>
            <p class="review-text">  Lovely place  </p>
            <p class="other">skip me</p>
        </body></html>"#;
        let document = Html::parse_document(html);

        let strategy = css_strategy("p.review-text");
        let texts = strategy.apply(&document, html);
        assert_eq!(texts, vec!["Great food", "Lovely place"]);
    }

    #[test]
    fn test_css_strategy_skips_empty_elements() {
        let html = r#"<html><body><p class="review-text">   </p></body></html>"#;
        let document = Html::parse_document(html);

        let strategy = css_strategy("p.review-text");
        assert!(strategy.apply(&document, html).is_empty());
    }

    #[test]
    fn test_script_state_strategy() {
        let html = r#"<html><script>
            window.__PRELOADED_STATE__ = JSON.parse("{\"entities\":{\"REVIEWS\":{\"1\":{\"reviewText\":\"Amazing pasta\"},\"2\":{\"reviewText\":\"Would come again\"}}}}");
        </script></html>"#;
        let document = Html::parse_document(html);

        let strategy = state_strategy("reviewText");
        let mut texts = strategy.apply(&document, html);
        texts.sort();
        assert_eq!(texts, vec!["Amazing pasta", "Would come again"]);
    }

    #[test]
    fn test_script_state_ignores_other_fields() {
        let html = r#"<script>window.__PRELOADED_STATE__ = JSON.parse("{\"userName\":\"someone\",\"reviewText\":\"The one\"}");</script>"#;
        let document = Html::parse_document(html);

        let strategy = state_strategy("reviewText");
        assert_eq!(strategy.apply(&document, html), vec!["The one"]);
    }

    #[test]
    fn test_script_state_missing_blob() {
        let html = "<html><body>no embedded state here</body></html>";
        let document = Html::parse_document(html);

        let strategy = state_strategy("reviewText");
        assert!(strategy.apply(&document, html).is_empty());
    }

    #[test]
    fn test_unescape_js_string() {
        assert_eq!(unescape_js_string(r#"{\"a\":1}"#), r#"{"a":1}"#);
        assert_eq!(unescape_js_string(r#"line\none"#), "line\none");
        assert_eq!(unescape_js_string(r#"back\\slash"#), r"back\slash");
    }
}
