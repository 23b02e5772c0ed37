use std::fmt;

/// Processing state of a single target
///
/// Targets move `Pending -> InProgress -> {Done, Failed}` and are never
/// deleted; a failed target stays visible in the checkpoint so a later
/// run can retry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetStatus {
    /// Not yet picked up by the controller
    Pending,

    /// Currently being paginated
    InProgress,

    /// At least one page fetched successfully (possibly zero reviews)
    Done,

    /// Aborted on a permanent error or after exhausting retries
    Failed,
}

impl TargetStatus {
    /// Returns true if no further processing will happen for this target
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One restaurant page to be scraped
#[derive(Debug, Clone)]
pub struct Target {
    /// The target page URL, also its identifier
    pub url: String,

    /// Current processing status
    pub status: TargetStatus,

    /// Pages fetched successfully for this target
    pub pages_fetched: u32,

    /// Reviews accepted from this target in this run
    pub reviews_collected: u64,

    /// Failure reason, when status is Failed
    pub failure: Option<String>,
}

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: TargetStatus::Pending,
            pages_fetched: 0,
            reviews_collected: 0,
            failure: None,
        }
    }
}
