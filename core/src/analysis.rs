//! The analyze action: fetch, interpret, classify, lay out the timeline.
//!
//! Every failure after the name check degrades to a report with an empty
//! issue set and a non-`Completed` status, so callers always have something
//! to show.

use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::RadarErr;
use crate::error::Result;
use crate::fetcher::IssueFetcher;
use crate::interpret::InterpretOutcome;
use crate::interpret::QuarantinedEntry;
use crate::interpret::interpret;
use crate::issues::IssueRecord;
use crate::risk::RiskRating;
use crate::risk::classify;
use crate::timeline::Timeline;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportStatus {
    /// The model answered with an interpretable issue list, possibly empty.
    Completed,
    /// The model answered but its completion could not be read as issues.
    Uninterpretable { detail: String },
    /// The provider could not be reached or rejected the request.
    FetchFailed { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub subject: String,
    /// Every interpreted issue; this is what the rating is computed over.
    pub total_issues: usize,
    /// Interpreted issues without a usable date, absent from the timeline.
    pub undated_issues: usize,
    pub quarantined: Vec<QuarantinedEntry>,
    pub rating: RiskRating,
    pub issues: Vec<IssueRecord>,
    pub timeline: Timeline,
    pub status: ReportStatus,
    pub cached: bool,
}

impl Report {
    /// Build a report from a raw model completion.
    pub fn from_completion(subject: &str, completion: &str) -> Self {
        let interpretation = interpret(completion);
        let status = match interpretation.outcome {
            InterpretOutcome::Parsed => ReportStatus::Completed,
            InterpretOutcome::Uninterpretable { detail } => {
                ReportStatus::Uninterpretable { detail }
            }
        };
        Self::from_records(
            subject,
            interpretation.records,
            interpretation.quarantined,
            status,
        )
    }

    pub fn fetch_failed(subject: &str, detail: impl Into<String>) -> Self {
        Self::from_records(
            subject,
            Vec::new(),
            Vec::new(),
            ReportStatus::FetchFailed {
                detail: detail.into(),
            },
        )
    }

    fn from_records(
        subject: &str,
        issues: Vec<IssueRecord>,
        quarantined: Vec<QuarantinedEntry>,
        status: ReportStatus,
    ) -> Self {
        let rating = classify(&issues);
        let timeline = Timeline::from_records(&issues);
        Self {
            subject: subject.to_string(),
            total_issues: issues.len(),
            undated_issues: issues.len() - timeline.len(),
            quarantined,
            rating,
            issues,
            timeline,
            status,
            cached: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReportStatus::Completed
    }
}

/// Runs analyses against one provider, memoizing completed reports.
pub struct Analyzer {
    fetcher: IssueFetcher,
    cache: Option<TtlCache<Report>>,
}

impl Analyzer {
    pub fn new(fetcher: IssueFetcher, cache: Option<TtlCache<Report>>) -> Self {
        Self { fetcher, cache }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = IssueFetcher::from_config(config)?;
        let cache = (!config.cache_ttl.is_zero())
            .then(|| TtlCache::new(config.cache_ttl, config.cache_capacity));
        Ok(Self::new(fetcher, cache))
    }

    /// Analyze `name`. Only a blank name or a missing API key is an error;
    /// provider and interpretation failures come back as a report.
    pub async fn analyze(&self, name: &str) -> Result<Report> {
        let subject = name.trim();
        if subject.is_empty() {
            return Err(RadarErr::EmptyName);
        }

        if let Some(cache) = &self.cache {
            if let Some(mut report) = cache.get(subject).await {
                info!("serving cached report for {subject:?}");
                report.subject = subject.to_string();
                report.cached = true;
                return Ok(report);
            }
        }

        let report = match self.fetcher.fetch(subject).await {
            Ok(completion) => Report::from_completion(subject, &completion),
            Err(err @ RadarErr::Api(radar_api_client::Error::MissingEnvVar { .. })) => {
                return Err(err);
            }
            Err(RadarErr::Api(err)) => {
                warn!("issue fetch for {subject:?} failed: {err}");
                Report::fetch_failed(subject, err.to_string())
            }
            Err(err) => return Err(err),
        };

        if let ReportStatus::Uninterpretable { detail } = &report.status {
            warn!("could not interpret model output for {subject:?}: {detail}");
        }

        if report.is_completed() {
            if let Some(cache) = &self.cache {
                cache.insert(subject, report.clone()).await;
            }
        }

        info!(
            model = self.fetcher.model(),
            total = report.total_issues,
            level = %report.rating.level,
            "analysis finished for {subject:?}"
        );
        Ok(report)
    }
}
