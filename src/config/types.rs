use serde::Deserialize;

/// Main configuration structure for Morsel
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub http: HttpConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(rename = "selector")]
    pub selectors: Vec<SelectorEntry>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum pages to visit per target
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Lower bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "delay-min-ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the randomized delay before each request (milliseconds)
    #[serde(rename = "delay-max-ms")]
    pub delay_max_ms: u64,

    /// Maximum retries for a transient fetch failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Number of targets processed between checkpoint saves
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Minimum review text length; shorter candidates are rejected as noise
    #[serde(rename = "min-review-length")]
    pub min_review_length: usize,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the tabular target list (must carry a `url` column)
    #[serde(rename = "targets-path")]
    pub targets_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the append-only review record stream (JSON Lines)
    #[serde(rename = "reviews-path")]
    pub reviews_path: String,

    /// Path to the checkpoint file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,
}

/// A named extraction strategy entry, tried in file order
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorEntry {
    /// Strategy name used in logs
    pub name: String,

    #[serde(flatten)]
    pub rule: SelectorRule,
}

/// The extraction rule behind a strategy entry
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SelectorRule {
    /// CSS selector query over the page DOM
    Css { query: String },

    /// Field name looked up in the page's embedded serialized state
    ScriptState { field: String },
}
