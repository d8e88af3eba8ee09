//! Date normalization and ordering for the issue timeline.
//!
//! The risk rating and the total-issues metric are computed over every
//! interpreted record. The timeline only holds the dated subset, so a record
//! whose date could not be normalized still counts toward the rating but
//! never appears as a point.

use chrono::DateTime;
use chrono::NaiveDate;
use serde::Serialize;

use crate::issues::IssueRecord;
use crate::issues::Severity;

/// Parse an ISO-like calendar date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (date part kept), `YYYY-MM`
/// (first of the month) and `YYYY` (January 1st). Anything else, including
/// impossible dates such as `2023-02-30`, yields `None`.
pub fn parse_issue_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    if let Some((year, month)) = raw.split_once('-') {
        if year.len() == 4 && (1..=2).contains(&month.len()) {
            let year = year.parse::<i32>().ok()?;
            let month = month.parse::<u32>().ok()?;
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
        return None;
    }
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub description: String,
    pub severity: Severity,
}

/// Dated issues in ascending date order. Issues sharing a date keep the
/// order the model listed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    points: Vec<TimelinePoint>,
}

impl Timeline {
    pub fn from_records(records: &[IssueRecord]) -> Self {
        let mut points = records
            .iter()
            .filter_map(|record| {
                record.date.map(|date| TimelinePoint {
                    date,
                    description: record.description.clone(),
                    severity: record.severity,
                })
            })
            .collect::<Vec<_>>();
        points.sort_by_key(|point| point.date);
        Self { points }
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last dates covered, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_supported_shapes() {
        assert_eq!(parse_issue_date("2020-01-01"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_issue_date(" 2019-07-04 "), Some(ymd(2019, 7, 4)));
        assert_eq!(
            parse_issue_date("2021-03-15T10:30:00Z"),
            Some(ymd(2021, 3, 15))
        );
        assert_eq!(parse_issue_date("2018-06"), Some(ymd(2018, 6, 1)));
        assert_eq!(parse_issue_date("2015"), Some(ymd(2015, 1, 1)));
    }

    #[test]
    fn malformed_dates_are_none() {
        for raw in [
            "",
            "YYYY-MM-DD",
            "2023-02-30",
            "2023-13-01",
            "2018-00",
            "March 2020",
            "unknown",
            "２０２０",
            "2020-01-01-01",
        ] {
            assert_eq!(parse_issue_date(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn drops_undated_and_sorts_ascending() {
        let records = vec![
            IssueRecord::new(Some(ymd(2023, 5, 1)), "c", Severity::Low),
            IssueRecord::new(None, "undated", Severity::High),
            IssueRecord::new(Some(ymd(2021, 1, 1)), "a", Severity::Medium),
            IssueRecord::new(Some(ymd(2022, 3, 3)), "b", Severity::High),
        ];

        let timeline = Timeline::from_records(&records);

        let dates = timeline
            .points()
            .iter()
            .map(|point| point.date)
            .collect::<Vec<_>>();
        assert_eq!(dates, vec![ymd(2021, 1, 1), ymd(2022, 3, 3), ymd(2023, 5, 1)]);
        assert_eq!(timeline.span(), Some((ymd(2021, 1, 1), ymd(2023, 5, 1))));
    }

    #[test]
    fn equal_dates_keep_listing_order() {
        let records = vec![
            IssueRecord::new(Some(ymd(2020, 1, 1)), "first", Severity::Low),
            IssueRecord::new(Some(ymd(2020, 1, 1)), "second", Severity::Low),
        ];

        let timeline = Timeline::from_records(&records);

        assert_eq!(timeline.points()[0].description, "first");
        assert_eq!(timeline.points()[1].description, "second");
    }

    #[test]
    fn empty_input_has_no_span() {
        let timeline = Timeline::from_records(&[]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.span(), None);
    }
}
