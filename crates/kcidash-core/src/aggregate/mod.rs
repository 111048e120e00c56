//! The record aggregation fold.
//!
//! Rows are bound to a selected tree head, then split into the "tests" and
//! "boots" buckets while builds are deduplicated by id and issues are merged
//! into a build-scoped and a bucket-scoped map.

pub mod bucket;
pub mod build_summary;
pub mod issues;

pub use bucket::{ArchSummary, BucketAccumulator, StatusCounts, TestsSummary};
pub use build_summary::{
    ArchBuildSummary, BuildStatusCount, BuildSummarizer, BuildSummaryTotals,
    ValidityBuildSummarizer,
};
pub use issues::IssueMap;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::extract::MessageExtractor;
use crate::head_filter::head_tree;
use crate::model::JoinedRow;
use crate::normalize::{build_item, issue_entry, BuildItem, IssueEntry};
use crate::trees::Tree;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsSummary {
    pub items: Vec<BuildItem>,
    pub issues: Vec<IssueEntry>,
    pub summary: BuildSummaryTotals,
    pub failed_with_unknown_issues: u64,
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareAggregation {
    pub builds: BuildsSummary,
    pub tests: TestsSummary,
    pub boots: TestsSummary,
}

/// Request-scoped fold state. Feed rows in order with [`push`], then call
/// [`finish`].
///
/// [`push`]: RecordAggregator::push
/// [`finish`]: RecordAggregator::finish
pub struct RecordAggregator<'a> {
    trees: &'a [Tree],
    extractor: &'a dyn MessageExtractor,
    processed_builds: HashSet<String>,
    builds_with_issue: HashSet<String>,
    builds: Vec<BuildItem>,
    build_issues: IssueMap,
    tests: BucketAccumulator,
    boots: BucketAccumulator,
    accepted: usize,
    rejected: usize,
}

impl<'a> RecordAggregator<'a> {
    pub fn new(trees: &'a [Tree], extractor: &'a dyn MessageExtractor) -> Self {
        Self {
            trees,
            extractor,
            processed_builds: HashSet::new(),
            builds_with_issue: HashSet::new(),
            builds: Vec::new(),
            build_issues: IssueMap::new(),
            tests: BucketAccumulator::new(),
            boots: BucketAccumulator::new(),
            accepted: 0,
            rejected: 0,
        }
    }

    /// Folds one row. Returns `false` when the row was dropped because it is
    /// not on the head commit of a selected tree.
    pub fn push(&mut self, row: &JoinedRow) -> bool {
        let Some(tree) = head_tree(row, self.trees) else {
            self.rejected += 1;
            return false;
        };
        self.accepted += 1;

        let bucket = if row.is_boot() {
            &mut self.boots
        } else {
            &mut self.tests
        };
        bucket.record(row, self.extractor);

        if self.processed_builds.insert(row.build_id.clone()) {
            self.builds.push(build_item(row, &tree.index));
        }

        if let Some(issue) = issue_entry(row) {
            self.build_issues.merge(&issue);
            bucket.merge_issue(&issue);
            self.builds_with_issue.insert(row.build_id.clone());
        }
        true
    }

    pub fn finish(self, summarizer: &dyn BuildSummarizer) -> HardwareAggregation {
        tracing::debug!(
            accepted = self.accepted,
            rejected = self.rejected,
            builds = self.builds.len(),
            "aggregated hardware rows"
        );

        let failed_with_unknown_issues = self
            .builds
            .iter()
            .filter(|b| b.valid == Some(false) && !self.builds_with_issue.contains(&b.id))
            .count() as u64;

        HardwareAggregation {
            builds: BuildsSummary {
                summary: summarizer.summarize(&self.builds),
                items: self.builds,
                issues: self.build_issues.into_vec(),
                failed_with_unknown_issues,
            },
            tests: self.tests.finish(),
            boots: self.boots.finish(),
        }
    }
}

/// Runs a complete fold over `rows`, consuming the iterator once and in order.
pub fn aggregate_records<'r, I>(
    rows: I,
    trees: &[Tree],
    extractor: &dyn MessageExtractor,
    summarizer: &dyn BuildSummarizer,
) -> HardwareAggregation
where
    I: IntoIterator<Item = &'r JoinedRow>,
{
    let mut fold = RecordAggregator::new(trees, extractor);
    for row in rows {
        fold.push(row);
    }
    fold.finish(summarizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::MiscExtractor;
    use crate::model::TestStatus;
    use crate::testutil::{row, tree_for};
    use serde_json::json;

    fn run(rows: &[JoinedRow], trees: &[Tree]) -> HardwareAggregation {
        aggregate_records(rows, trees, &MiscExtractor, &ValidityBuildSummarizer)
    }

    #[test]
    fn shared_build_is_listed_once_across_buckets() {
        let mut boot = row("t1", "b1");
        boot.path = Some("boot.sh".into());
        let mut test = row("t2", "b1");
        test.status = TestStatus::Fail;
        test.path = Some("suite/x".into());
        let trees = vec![tree_for(&boot, "0")];

        let out = run(&[boot, test], &trees);

        assert_eq!(out.builds.items.len(), 1);
        assert_eq!(out.builds.items[0].id, "b1");
        assert_eq!(out.builds.items[0].tree_index, "0");
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["boots"]["statusSummary"], json!({"PASS": 1}));
        assert_eq!(v["tests"]["statusSummary"], json!({"FAIL": 1}));
    }

    #[test]
    fn stale_commit_rows_leave_no_trace() {
        let head = row("t1", "b1");
        let mut stale = row("t2", "b2");
        stale.checkout_git_commit_hash = Some("0ld".into());
        stale.status = TestStatus::Fail;
        stale.issue_id = Some("i1".into());
        let trees = vec![tree_for(&head, "0")];

        let out = run(&[head.clone()], &trees);
        let with_stale = run(&[head, stale], &trees);
        assert_eq!(out, with_stale);
    }

    #[test]
    fn issues_are_counted_per_scope() {
        let mut boot = row("t1", "b1");
        boot.path = Some("boot".into());
        boot.issue_id = Some("i1".into());
        let mut t2 = row("t2", "b1");
        t2.issue_id = Some("i1".into());
        let mut t3 = row("t3", "b1");
        t3.issue_id = Some("i1".into());
        let trees = vec![tree_for(&boot, "0")];

        let out = run(&[boot, t2, t3], &trees);

        assert_eq!(out.builds.issues.len(), 1);
        assert_eq!(out.builds.issues[0].incidents_info.incidents_count, 3);
        assert_eq!(out.tests.issues[0].incidents_info.incidents_count, 2);
        assert_eq!(out.boots.issues[0].incidents_info.incidents_count, 1);
    }

    #[test]
    fn invalid_builds_without_issue_are_counted_once() {
        let mut a1 = row("t1", "b1");
        a1.build_valid = Some(false);
        let a2 = JoinedRow {
            id: "t2".into(),
            ..a1.clone()
        };
        let mut b = row("t3", "b2");
        b.build_valid = Some(false);
        b.issue_id = Some("known".into());
        let trees = vec![tree_for(&a1, "0")];

        let out = run(&[a1, a2, b], &trees);
        assert_eq!(out.builds.failed_with_unknown_issues, 1);
        assert_eq!(out.builds.summary.builds.invalid, 2);
    }

    #[test]
    fn push_reports_rejection() {
        let r = row("t1", "b1");
        let trees: Vec<Tree> = Vec::new();
        let mut fold = RecordAggregator::new(&trees, &MiscExtractor);
        assert!(!fold.push(&r));
        let out = fold.finish(&ValidityBuildSummarizer);
        assert!(out.builds.items.is_empty());
        assert!(out.tests.history.is_empty());
    }
}
