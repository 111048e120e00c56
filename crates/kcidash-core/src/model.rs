//! Row and status types shared by the store, the aggregation engine and the
//! response layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Summary-map key for rows without a status.
pub const NULL_STATUS_KEY: &str = "null";

/// Status reported for a single test or boot execution.
///
/// Serialized as the upper-case string stored by the CI systems. A missing
/// status serializes as `null`; summaries key it as `"null"` through
/// [`TestStatus::summary_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
    Miss,
    Skip,
    Done,
    /// No status was recorded.
    Null,
    /// Any status string not known to this crate, kept verbatim.
    Other(String),
}

impl TestStatus {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            None => TestStatus::Null,
            Some("PASS") => TestStatus::Pass,
            Some("FAIL") => TestStatus::Fail,
            Some("ERROR") => TestStatus::Error,
            Some("MISS") => TestStatus::Miss,
            Some("SKIP") => TestStatus::Skip,
            Some("DONE") => TestStatus::Done,
            Some("NULL") => TestStatus::Null,
            Some(other) => TestStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Error => "ERROR",
            TestStatus::Miss => "MISS",
            TestStatus::Skip => "SKIP",
            TestStatus::Done => "DONE",
            TestStatus::Null => "NULL",
            TestStatus::Other(s) => s,
        }
    }

    /// Key under which the status is counted in the summary maps.
    pub fn summary_key(&self) -> &str {
        match self {
            TestStatus::Null => NULL_STATUS_KEY,
            other => other.as_str(),
        }
    }

    /// ERROR, FAIL and MISS feed the fail-reason and failing-platform summaries.
    pub fn is_failing(&self) -> bool {
        matches!(self, TestStatus::Error | TestStatus::Fail | TestStatus::Miss)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TestStatus {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TestStatus::Null => s.serialize_none(),
            other => s.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for TestStatus {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(TestStatus::parse(raw.as_deref()))
    }
}

/// One test execution joined with its build, its checkout and (at most) one
/// incident of the build. A build shows up once per test row, and once more
/// per additional incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub id: String,
    pub status: TestStatus,
    pub path: Option<String>,
    pub duration: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub log_url: Option<String>,
    pub comment: Option<String>,
    pub misc: Option<serde_json::Value>,
    pub environment_misc: Option<serde_json::Value>,
    #[serde(default)]
    pub environment_compatible: Vec<String>,

    pub build_id: String,
    pub build_architecture: Option<String>,
    pub build_compiler: Option<String>,
    pub build_config_name: Option<String>,
    pub build_config_url: Option<String>,
    pub build_log_url: Option<String>,
    pub build_misc: Option<serde_json::Value>,
    pub build_valid: Option<bool>,
    pub build_duration: Option<f64>,
    pub build_start_time: Option<DateTime<Utc>>,

    pub checkout_tree_name: Option<String>,
    pub checkout_git_repository_url: Option<String>,
    pub checkout_git_repository_branch: Option<String>,
    pub checkout_git_commit_name: Option<String>,
    pub checkout_git_commit_hash: Option<String>,

    pub issue_id: Option<String>,
    pub issue_version: Option<i64>,
    pub issue_comment: Option<String>,
    pub issue_report_url: Option<String>,
}

impl JoinedRow {
    /// A boot row has the path `boot` or a path under `boot.`.
    pub fn is_boot(&self) -> bool {
        self.path
            .as_deref()
            .is_some_and(|p| p == "boot" || p.starts_with("boot."))
    }
}

/// The (tree name, branch, repository URL) triple identifying a tree line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeIdentity {
    pub tree_name: Option<String>,
    pub git_repository_branch: Option<String>,
    pub git_repository_url: Option<String>,
}

impl TreeIdentity {
    /// Field-wise ordering with missing values sorted after present ones.
    pub fn cmp_nulls_last(&self, other: &Self) -> std::cmp::Ordering {
        fn field(a: &Option<String>, b: &Option<String>) -> std::cmp::Ordering {
            match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        }
        field(&self.tree_name, &other.tree_name)
            .then_with(|| field(&self.git_repository_branch, &other.git_repository_branch))
            .then_with(|| field(&self.git_repository_url, &other.git_repository_url))
    }
}

/// A checkout seen for a hardware within the query window; input of tree
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeCheckoutRow {
    pub identity: TreeIdentity,
    pub git_commit_name: Option<String>,
    pub git_commit_hash: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

/// A test linked to an issue through an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueTest {
    pub id: String,
    pub duration: Option<f64>,
    pub status: TestStatus,
    pub path: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub environment_compatible: Vec<String>,
}
