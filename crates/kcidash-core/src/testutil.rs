use chrono::{TimeZone, Utc};

use crate::model::{JoinedRow, TestStatus};
use crate::trees::Tree;

/// A passing, non-boot row on the `mainline/master` head commit.
pub(crate) fn row(id: &str, build_id: &str) -> JoinedRow {
    JoinedRow {
        id: id.to_string(),
        status: TestStatus::Pass,
        path: Some("baseline.login".to_string()),
        duration: Some(1.5),
        start_time: Utc.timestamp_opt(1_700_000_100, 0).single(),
        log_url: None,
        comment: None,
        misc: None,
        environment_misc: None,
        environment_compatible: vec!["google,juniper".to_string()],
        build_id: build_id.to_string(),
        build_architecture: Some("x86_64".to_string()),
        build_compiler: Some("gcc-12".to_string()),
        build_config_name: Some("defconfig".to_string()),
        build_config_url: None,
        build_log_url: None,
        build_misc: None,
        build_valid: Some(true),
        build_duration: Some(300.0),
        build_start_time: Utc.timestamp_opt(1_700_000_000, 0).single(),
        checkout_tree_name: Some("mainline".to_string()),
        checkout_git_repository_url: Some(
            "https://git.kernel.org/pub/scm/linux/kernel/git/torvalds/linux.git".to_string(),
        ),
        checkout_git_repository_branch: Some("master".to_string()),
        checkout_git_commit_name: Some("v6.12-rc1".to_string()),
        checkout_git_commit_hash: Some("9852d85ec9d4".to_string()),
        issue_id: None,
        issue_version: None,
        issue_comment: None,
        issue_report_url: None,
    }
}

/// The tree whose head is exactly the row's checkout.
pub(crate) fn tree_for(row: &JoinedRow, index: &str) -> Tree {
    Tree {
        tree_name: row.checkout_tree_name.clone(),
        git_repository_branch: row.checkout_git_repository_branch.clone(),
        git_repository_url: row.checkout_git_repository_url.clone(),
        head_git_commit_name: row.checkout_git_commit_name.clone(),
        head_git_commit_hash: row.checkout_git_commit_hash.clone(),
        index: index.to_string(),
    }
}
