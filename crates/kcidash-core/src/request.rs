//! Request parsing and validation. Everything here runs before any data is
//! fetched.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::{DashError, DashResult};
use crate::source::HardwareQuery;
use crate::trees::TreeSelection;

/// Body of a hardware details request.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareDetailsRequest {
    pub origin: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub selected_trees: TreeSelection,
}

impl HardwareDetailsRequest {
    /// Parses `{"origin", "startTimestampInSeconds", "endTimestampInSeconds",
    /// "selectedTrees"}`. Timestamps may be integers or integer strings.
    pub fn from_json(body: &str, default_origin: &str) -> DashResult<Self> {
        let v: Value = serde_json::from_str(body).map_err(|e| DashError::InvalidBody {
            detail: e.to_string(),
        })?;

        let origin = match v.get("origin") {
            None | Some(Value::Null) => default_origin.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(DashError::invalid_parameter(
                    "origin",
                    format!("expected a string, got {other}"),
                ))
            }
        };

        let start = timestamp_field(&v, "startTimestampInSeconds")?;
        let end = timestamp_field(&v, "endTimestampInSeconds")?;

        let selected_trees = match v.get("selectedTrees") {
            None | Some(Value::Null) => TreeSelection::default(),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                DashError::invalid_parameter("selectedTrees", e.to_string())
            })?,
        };

        Ok(Self {
            origin,
            start,
            end,
            selected_trees,
        })
    }

    pub fn query(&self, hardware_id: &str) -> HardwareQuery {
        HardwareQuery {
            hardware_id: hardware_id.to_string(),
            origin: self.origin.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

fn timestamp_field(v: &Value, name: &str) -> DashResult<DateTime<Utc>> {
    let invalid = |detail: String| DashError::InvalidTimestamp { detail };
    let secs = match v.get(name) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid(format!("{name} out of range")))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(format!("{name}: {e}")))?,
        Some(other) => return Err(invalid(format!("{name}: unexpected value {other}"))),
        None => return Err(invalid(format!("{name} is required"))),
    };
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| invalid(format!("{name} out of range")))
}

/// Validated parameters of an issue tests lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTestsRequest {
    pub issue_id: String,
    /// `None` resolves to the latest version of the issue.
    pub version: Option<i64>,
}

impl IssueTestsRequest {
    pub fn parse(issue_id: &str, version: Option<&str>) -> DashResult<Self> {
        let issue_id = issue_id.trim();
        if issue_id.is_empty() {
            return Err(DashError::invalid_parameter("issue_id", "must not be empty"));
        }
        let version = version
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|e| DashError::invalid_parameter("version", e.to_string()))
            })
            .transpose()?;
        Ok(Self {
            issue_id: issue_id.to_string(),
            version,
        })
    }
}
