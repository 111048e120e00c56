//! Typed sub-views of a [`JoinedRow`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{JoinedRow, TestStatus, TreeIdentity};

/// One deduplicated build, as listed in `builds.items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildItem {
    pub id: String,
    pub architecture: Option<String>,
    pub config_name: Option<String>,
    pub misc: Option<serde_json::Value>,
    pub config_url: Option<String>,
    pub compiler: Option<String>,
    pub valid: Option<bool>,
    pub duration: Option<f64>,
    pub log_url: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub git_repository_url: Option<String>,
    pub git_repository_branch: Option<String>,
    pub tree_name: Option<String>,
    pub tree_index: String,
}

/// One accepted row in a bucket's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub status: TestStatus,
    pub path: Option<String>,
    pub duration: Option<f64>,
    #[serde(rename = "startTime")]
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentsInfo {
    #[serde(rename = "incidentsCount")]
    pub incidents_count: u64,
}

/// An issue referenced by at least one accepted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEntry {
    pub id: String,
    pub version: Option<i64>,
    pub comment: Option<String>,
    pub report_url: Option<String>,
    pub incidents_info: IncidentsInfo,
}

pub fn build_item(row: &JoinedRow, tree_index: &str) -> BuildItem {
    BuildItem {
        id: row.build_id.clone(),
        architecture: row.build_architecture.clone(),
        config_name: row.build_config_name.clone(),
        misc: row.build_misc.clone(),
        config_url: row.build_config_url.clone(),
        compiler: row.build_compiler.clone(),
        valid: row.build_valid,
        duration: row.build_duration,
        log_url: row.build_log_url.clone(),
        start_time: row.build_start_time,
        git_repository_url: row.checkout_git_repository_url.clone(),
        git_repository_branch: row.checkout_git_repository_branch.clone(),
        tree_name: row.checkout_tree_name.clone(),
        tree_index: tree_index.to_string(),
    }
}

pub fn history_entry(row: &JoinedRow) -> HistoryEntry {
    HistoryEntry {
        id: row.id.clone(),
        status: row.status.clone(),
        path: row.path.clone(),
        duration: row.duration,
        start_time: row.start_time,
    }
}

/// The issue carried by the row, seeded with a single incident. `None` when
/// the row is not linked to an issue.
pub fn issue_entry(row: &JoinedRow) -> Option<IssueEntry> {
    let id = row.issue_id.as_ref()?;
    Some(IssueEntry {
        id: id.clone(),
        version: row.issue_version,
        comment: row.issue_comment.clone(),
        report_url: row.issue_report_url.clone(),
        incidents_info: IncidentsInfo { incidents_count: 1 },
    })
}

pub fn tree_identity(row: &JoinedRow) -> TreeIdentity {
    TreeIdentity {
        tree_name: row.checkout_tree_name.clone(),
        git_repository_branch: row.checkout_git_repository_branch.clone(),
        git_repository_url: row.checkout_git_repository_url.clone(),
    }
}
