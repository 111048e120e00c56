//! Records written to the store, one struct per table. A [`Fixture`] bundles
//! them for bulk import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRecord {
    pub id: String,
    pub origin: String,
    pub tree_name: Option<String>,
    pub git_repository_url: Option<String>,
    pub git_repository_branch: Option<String>,
    pub git_commit_hash: Option<String>,
    pub git_commit_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: String,
    pub checkout_id: String,
    pub origin: String,
    pub architecture: Option<String>,
    pub compiler: Option<String>,
    pub config_name: Option<String>,
    pub config_url: Option<String>,
    pub log_url: Option<String>,
    pub valid: Option<bool>,
    pub duration: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub misc: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub build_id: String,
    pub origin: String,
    pub path: Option<String>,
    pub status: Option<String>,
    pub duration: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub log_url: Option<String>,
    pub comment: Option<String>,
    pub misc: Option<serde_json::Value>,
    pub environment_misc: Option<serde_json::Value>,
    #[serde(default)]
    pub environment_compatible: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: String,
    pub version: i64,
    pub origin: String,
    pub comment: Option<String>,
    pub report_url: Option<String>,
}

/// Links an issue version to a build and/or a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub id: String,
    pub issue_id: String,
    pub issue_version: i64,
    pub build_id: Option<String>,
    pub test_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub checkouts: Vec<CheckoutRecord>,
    pub builds: Vec<BuildRecord>,
    pub tests: Vec<TestRecord>,
    pub issues: Vec<IssueRecord>,
    pub incidents: Vec<IncidentRecord>,
}

/// Row counts written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub checkouts: usize,
    pub builds: usize,
    pub tests: usize,
    pub issues: usize,
    pub incidents: usize,
}

impl Fixture {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
