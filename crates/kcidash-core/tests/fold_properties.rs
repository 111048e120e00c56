use kcidash_core::{
    aggregate_records, HardwareAggregation, JoinedRow, MiscExtractor, TestStatus, Tree,
    ValidityBuildSummarizer,
};
use kcidash_core::normalize::{HistoryEntry, IssueEntry};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

const TREES: [&str; 2] = ["mainline", "next"];

fn tree(i: usize) -> Tree {
    Tree {
        tree_name: Some(TREES[i].to_string()),
        git_repository_branch: Some("master".to_string()),
        git_repository_url: Some(format!("https://git.kernel.org/{}.git", TREES[i])),
        head_git_commit_name: None,
        head_git_commit_hash: Some(format!("{}-head", TREES[i])),
        index: i.to_string(),
    }
}

fn status(i: u8) -> TestStatus {
    match i % 7 {
        0 => TestStatus::Pass,
        1 => TestStatus::Fail,
        2 => TestStatus::Error,
        3 => TestStatus::Miss,
        4 => TestStatus::Skip,
        5 => TestStatus::Done,
        _ => TestStatus::Null,
    }
}

#[derive(Debug, Clone)]
struct Shape {
    build: u8,
    on_head: bool,
    boot: bool,
    status: u8,
    issue: Option<u8>,
}

fn shape() -> impl Strategy<Value = Shape> {
    (0u8..6, any::<bool>(), any::<bool>(), 0u8..7, proptest::option::of(0u8..3))
        .prop_map(|(build, on_head, boot, status, issue)| Shape {
            build,
            on_head,
            boot,
            status,
            issue,
        })
}

// Builds are bound to one tree: build `n` lives on tree `n % 2`.
fn joined(i: usize, s: &Shape) -> JoinedRow {
    let name = TREES[(s.build as usize) % 2];
    let hash = if s.on_head {
        format!("{name}-head")
    } else {
        format!("{name}-old")
    };
    JoinedRow {
        id: format!("t{i}"),
        status: status(s.status),
        path: Some(if s.boot { "boot.nfs" } else { "kselftest.net" }.to_string()),
        duration: None,
        start_time: None,
        log_url: None,
        comment: None,
        misc: None,
        environment_misc: Some(serde_json::json!({"platform": format!("board-{}", s.build)})),
        environment_compatible: vec!["google,juniper".to_string()],
        build_id: format!("b{}", s.build),
        build_architecture: Some(if s.build % 3 == 0 { "arm64" } else { "x86_64" }.to_string()),
        build_compiler: Some("gcc-12".to_string()),
        build_config_name: Some("defconfig".to_string()),
        build_config_url: None,
        build_log_url: None,
        build_misc: None,
        build_valid: Some(s.build % 2 == 0),
        build_duration: None,
        build_start_time: None,
        checkout_tree_name: Some(name.to_string()),
        checkout_git_repository_url: Some(format!("https://git.kernel.org/{name}.git")),
        checkout_git_repository_branch: Some("master".to_string()),
        checkout_git_commit_name: None,
        checkout_git_commit_hash: Some(hash),
        issue_id: s.issue.map(|n| format!("i{n}")),
        issue_version: s.issue.map(|_| 1),
        issue_comment: None,
        issue_report_url: None,
    }
}

fn fold(rows: &[JoinedRow], trees: &[Tree]) -> HardwareAggregation {
    aggregate_records(rows, trees, &MiscExtractor, &ValidityBuildSummarizer)
}

fn total(counts: &BTreeMap<String, u64>) -> u64 {
    counts.values().sum()
}

/// Accepted rows carrying each issue, looked up through the bucket history.
fn issue_counts(
    history: &[HistoryEntry],
    by_id: &HashMap<&str, &JoinedRow>,
) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for entry in history {
        if let Some(issue) = by_id.get(entry.id.as_str()).and_then(|r| r.issue_id.clone()) {
            *counts.entry(issue).or_insert(0) += 1;
        }
    }
    counts
}

fn issue_map(issues: &[IssueEntry]) -> BTreeMap<String, u64> {
    issues
        .iter()
        .map(|i| (i.id.clone(), i.incidents_info.incidents_count))
        .collect()
}

proptest! {
    #[test]
    fn builds_are_unique_and_carry_their_tree_index(shapes in proptest::collection::vec(shape(), 0..40)) {
        let rows: Vec<_> = shapes.iter().enumerate().map(|(i, s)| joined(i, s)).collect();
        let trees = vec![tree(0), tree(1)];
        let out = fold(&rows, &trees);

        let mut seen = HashSet::new();
        for item in &out.builds.items {
            prop_assert!(seen.insert(item.id.clone()), "duplicate build {}", item.id);
            let n: usize = item.id[1..].parse().unwrap();
            prop_assert_eq!(&item.tree_index, &(n % 2).to_string());
        }
    }

    #[test]
    fn fold_is_deterministic(shapes in proptest::collection::vec(shape(), 0..40)) {
        let rows: Vec<_> = shapes.iter().enumerate().map(|(i, s)| joined(i, s)).collect();
        let trees = vec![tree(0), tree(1)];
        prop_assert_eq!(fold(&rows, &trees), fold(&rows, &trees));
    }

    #[test]
    fn only_head_rows_are_counted(shapes in proptest::collection::vec(shape(), 0..40)) {
        let rows: Vec<_> = shapes.iter().enumerate().map(|(i, s)| joined(i, s)).collect();
        let trees = vec![tree(0), tree(1)];
        let out = fold(&rows, &trees);

        let head: Vec<_> = rows
            .iter()
            .filter(|r| r.checkout_git_commit_hash.as_deref().is_some_and(|h| h.ends_with("-head")))
            .collect();
        let counted = out.tests.history.len() + out.boots.history.len();
        prop_assert_eq!(counted, head.len());

        let on_head_only: Vec<JoinedRow> = head.into_iter().cloned().collect();
        prop_assert_eq!(fold(&on_head_only, &trees), out);
    }

    #[test]
    fn fail_reasons_track_failing_rows(shapes in proptest::collection::vec(shape(), 0..40)) {
        let rows: Vec<_> = shapes.iter().enumerate().map(|(i, s)| joined(i, s)).collect();
        let trees = vec![tree(0), tree(1)];
        let out = fold(&rows, &trees);

        for bucket in [&out.tests, &out.boots] {
            let failing = bucket.history.iter().filter(|h| h.status.is_failing()).count() as u64;
            prop_assert_eq!(total(&bucket.fail_reasons), failing);
            if failing == 0 {
                prop_assert!(bucket.platforms_failing.is_empty());
            }
            let status_total: u64 = bucket.status_summary.values().sum();
            prop_assert_eq!(status_total, bucket.history.len() as u64);
        }
    }

    #[test]
    fn issue_counts_match_accepted_rows_per_scope(shapes in proptest::collection::vec(shape(), 0..40)) {
        let rows: Vec<_> = shapes.iter().enumerate().map(|(i, s)| joined(i, s)).collect();
        let trees = vec![tree(0), tree(1)];
        let out = fold(&rows, &trees);
        let by_id: HashMap<&str, &JoinedRow> = rows.iter().map(|r| (r.id.as_str(), r)).collect();

        let tests_expected = issue_counts(&out.tests.history, &by_id);
        let boots_expected = issue_counts(&out.boots.history, &by_id);
        let mut build_expected = tests_expected.clone();
        for (id, k) in &boots_expected {
            *build_expected.entry(id.clone()).or_insert(0) += k;
        }

        prop_assert_eq!(issue_map(&out.builds.issues), build_expected);
        prop_assert_eq!(issue_map(&out.tests.issues), tests_expected);
        prop_assert_eq!(issue_map(&out.boots.issues), boots_expected);
    }
}
