//! Turns a model completion into issue records.
//!
//! Interpretation never fails past this boundary: malformed output yields an
//! empty record list together with an [`InterpretOutcome::Uninterpretable`]
//! diagnostic, and individual malformed entries are quarantined instead of
//! discarding the whole response.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::issues::IssueRecord;
use crate::issues::Severity;
use crate::timeline::parse_issue_date;

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InterpretOutcome {
    /// The completion was a JSON array; it may still have held zero issues.
    Parsed,
    Uninterpretable { detail: String },
}

/// An array entry that was dropped because it did not look like an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarantinedEntry {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub records: Vec<IssueRecord>,
    pub quarantined: Vec<QuarantinedEntry>,
    pub outcome: InterpretOutcome,
}

impl Interpretation {
    fn uninterpretable(detail: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            quarantined: Vec::new(),
            outcome: InterpretOutcome::Uninterpretable {
                detail: detail.into(),
            },
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.outcome == InterpretOutcome::Parsed
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
/// Anything after the closing fence is dropped. Text that does not start
/// with a fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.find(FENCE).map_or(rest, |end| &rest[..end]);
    rest.trim()
}

pub fn interpret(completion: &str) -> Interpretation {
    let body = strip_code_fence(completion);
    if body.is_empty() {
        warn!("model completion was empty");
        return Interpretation::uninterpretable("completion was empty");
    }

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            warn!("could not parse model completion as JSON: {err}");
            return Interpretation::uninterpretable(format!("invalid JSON: {err}"));
        }
    };

    let Value::Array(entries) = value else {
        let kind = json_kind(&value);
        warn!("model completion was a JSON {kind}, expected an array");
        return Interpretation::uninterpretable(format!("expected a JSON array, found {kind}"));
    };

    let mut records = Vec::with_capacity(entries.len());
    let mut quarantined = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match record_from_value(entry) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(index, "quarantined issue entry: {reason}");
                quarantined.push(QuarantinedEntry { index, reason });
            }
        }
    }

    Interpretation {
        records,
        quarantined,
        outcome: InterpretOutcome::Parsed,
    }
}

fn record_from_value(value: &Value) -> Result<IssueRecord, String> {
    let Value::Object(fields) = value else {
        return Err(format!("expected an object, found {}", json_kind(value)));
    };

    let description = match fields.get("description") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.trim().to_string(),
        Some(Value::String(_)) => return Err("description is empty".to_string()),
        Some(other) => {
            return Err(format!(
                "description must be a string, found {}",
                json_kind(other)
            ));
        }
        None => return Err("missing description".to_string()),
    };

    let severity = fields
        .get("severity")
        .and_then(Value::as_str)
        .map_or(Severity::Unknown, Severity::parse);

    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_issue_date);

    Ok(IssueRecord {
        date,
        description,
        severity,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
