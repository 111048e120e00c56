//! The per-kind ("tests" or "boots") accumulator and its serialized form.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::issues::IssueMap;
use crate::extract::MessageExtractor;
use crate::model::{JoinedRow, TestStatus};
use crate::normalize::{history_entry, HistoryEntry, IssueEntry};

/// Status counts keyed by [`TestStatus::summary_key`].
pub type StatusCounts = BTreeMap<String, u64>;

/// Key used for rows whose build has no config name.
pub const NULL_CONFIG_KEY: &str = "null";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchSummary {
    pub arch: Option<String>,
    pub compiler: Option<String>,
    pub status: StatusCounts,
}

/// Running totals for one bucket during the fold.
#[derive(Debug, Default)]
pub struct BucketAccumulator {
    history: Vec<HistoryEntry>,
    status_summary: StatusCounts,
    fail_reasons: BTreeMap<String, u64>,
    platforms_failing: BTreeSet<String>,
    configs: BTreeMap<String, StatusCounts>,
    arch_summary: Vec<ArchSummary>,
    arch_index: HashMap<String, usize>,
    issues: IssueMap,
    failed_with_unknown_issues: u64,
}

fn bump(counts: &mut BTreeMap<String, u64>, key: &str) {
    match counts.get_mut(key) {
        Some(n) => *n += 1,
        None => {
            counts.insert(key.to_string(), 1);
        }
    }
}

/// Architecture and compiler concatenated; a missing part contributes nothing.
fn arch_key(row: &JoinedRow) -> String {
    format!(
        "{}{}",
        row.build_architecture.as_deref().unwrap_or_default(),
        row.build_compiler.as_deref().unwrap_or_default()
    )
}

impl BucketAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one accepted row into the bucket. Issue merging is left to the
    /// caller, which also feeds the build-level issue map.
    pub fn record(&mut self, row: &JoinedRow, extractor: &dyn MessageExtractor) {
        let status = &row.status;
        let key = status.summary_key();

        self.history.push(history_entry(row));
        bump(&mut self.status_summary, key);

        let config = row
            .build_config_name
            .clone()
            .unwrap_or_else(|| NULL_CONFIG_KEY.to_string());
        bump(self.configs.entry(config).or_default(), key);

        if status.is_failing() {
            self.platforms_failing
                .insert(extractor.platform(row.environment_misc.as_ref()));
            bump(
                &mut self.fail_reasons,
                &extractor.error_message(row.misc.as_ref()),
            );
        }

        let arch = arch_key(row);
        let pos = match self.arch_index.get(&arch).copied() {
            Some(pos) => pos,
            None => {
                self.arch_summary.push(ArchSummary {
                    arch: row.build_architecture.clone(),
                    compiler: row.build_compiler.clone(),
                    status: StatusCounts::new(),
                });
                self.arch_index.insert(arch, self.arch_summary.len() - 1);
                self.arch_summary.len() - 1
            }
        };
        bump(&mut self.arch_summary[pos].status, key);

        if *status == TestStatus::Fail && row.issue_id.is_none() {
            self.failed_with_unknown_issues += 1;
        }
    }

    pub fn merge_issue(&mut self, issue: &IssueEntry) {
        self.issues.merge(issue);
    }

    pub fn finish(self) -> TestsSummary {
        TestsSummary {
            history: self.history,
            arch_summary: self.arch_summary,
            platforms_failing: self.platforms_failing.into_iter().collect(),
            status_summary: self.status_summary,
            fail_reasons: self.fail_reasons,
            configs: self.configs,
            issues: self.issues.into_vec(),
            failed_with_unknown_issues: self.failed_with_unknown_issues,
        }
    }
}

/// Serialized bucket. Sets and keyed maps become lists here: failing
/// platforms are sorted, arch summaries and issues keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestsSummary {
    pub history: Vec<HistoryEntry>,
    pub arch_summary: Vec<ArchSummary>,
    pub platforms_failing: Vec<String>,
    pub status_summary: StatusCounts,
    pub fail_reasons: BTreeMap<String, u64>,
    pub configs: BTreeMap<String, StatusCounts>,
    pub issues: Vec<IssueEntry>,
    pub failed_with_unknown_issues: u64,
}
