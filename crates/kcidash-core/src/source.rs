//! The row-fetching boundary. Joins and server-side filtering happen behind
//! this trait; the aggregation engine only sees materialized rows.

use chrono::{DateTime, Utc};

use crate::model::{IssueTest, JoinedRow, TreeCheckoutRow};

/// Hardware, origin and inclusive checkout start-time window of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareQuery {
    pub hardware_id: String,
    pub origin: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub trait RowSource: Send + Sync {
    /// One row per matching test with its checkout identity, commit and
    /// checkout start time, unordered.
    fn fetch_tree_checkouts(&self, query: &HardwareQuery) -> anyhow::Result<Vec<TreeCheckoutRow>>;

    /// Tests of the hardware joined with build, checkout and build incidents.
    fn fetch_hardware_rows(&self, query: &HardwareQuery) -> anyhow::Result<Vec<JoinedRow>>;

    fn latest_issue_version(&self, issue_id: &str) -> anyhow::Result<Option<i64>>;

    fn fetch_issue_tests(&self, issue_id: &str, version: i64) -> anyhow::Result<Vec<IssueTest>>;
}
