use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Severity the model assigned to an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    /// Missing or outside `low|medium|high`. Never counts as high.
    Unknown,
}

impl Severity {
    /// Case-insensitive parse; anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("low") {
            Self::Low
        } else if raw.eq_ignore_ascii_case("medium") {
            Self::Medium
        } else if raw.eq_ignore_ascii_case("high") {
            Self::High
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problematic event about a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// `None` when the model's date was missing or not a calendar date.
    pub date: Option<NaiveDate>,
    pub description: String,
    pub severity: Severity,
}

impl IssueRecord {
    pub fn new(date: Option<NaiveDate>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            date,
            description: description.into(),
            severity,
        }
    }
}
