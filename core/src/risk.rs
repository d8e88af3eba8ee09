use std::fmt;

use serde::Serialize;

use crate::issues::IssueRecord;

/// Issue count at which the rating becomes high regardless of severity.
pub const HIGH_RISK_ISSUE_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Caution,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Caution => "caution",
            RiskLevel::High => "high",
        }
    }

    fn message(self) -> &'static str {
        match self {
            RiskLevel::None => "No known issues found.",
            RiskLevel::Caution => "Some issues found. Review recommended.",
            RiskLevel::High => "High risk: serious or numerous issues found.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskRating {
    pub level: RiskLevel,
    pub message: String,
}

impl From<RiskLevel> for RiskRating {
    fn from(level: RiskLevel) -> Self {
        Self {
            level,
            message: level.message().to_string(),
        }
    }
}

/// Rate a set of interpreted issues.
///
/// No issues is `None`; any high-severity issue, or at least
/// [`HIGH_RISK_ISSUE_COUNT`] issues of any severity, is `High`; anything else
/// is `Caution`.
pub fn classify(issues: &[IssueRecord]) -> RiskRating {
    let count = issues.len();
    let high_severity = issues
        .iter()
        .filter(|issue| issue.severity.is_high())
        .count();

    let level = if count == 0 {
        RiskLevel::None
    } else if high_severity > 0 || count >= HIGH_RISK_ISSUE_COUNT {
        RiskLevel::High
    } else {
        RiskLevel::Caution
    };
    level.into()
}
