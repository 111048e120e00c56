//! Read paths and row mapping for the store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use crate::model::{IssueTest, JoinedRow, TestStatus, TreeCheckoutRow, TreeIdentity};
use crate::source::HardwareQuery;

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that string
/// comparison in SQL is chronological.
pub(crate) fn encode_ts(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
}

pub(crate) fn decode_ts(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Stored JSON blobs are returned as parsed values; text that is not JSON is
/// kept as a string for the extractors to deal with.
pub(crate) fn decode_json(raw: Option<String>) -> Option<serde_json::Value> {
    raw.map(|s| serde_json::from_str(&s).unwrap_or(serde_json::Value::String(s)))
}

pub(crate) fn decode_string_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

const HARDWARE_FILTER: &str = "
    t.origin = ?2
    AND c.start_time >= ?3
    AND c.start_time <= ?4
    AND EXISTS (
        SELECT 1 FROM json_each(t.environment_compatible) WHERE json_each.value = ?1
    )";

pub(crate) fn fetch_tree_checkouts_impl(
    conn: &Connection,
    query: &HardwareQuery,
) -> anyhow::Result<Vec<TreeCheckoutRow>> {
    let sql = format!(
        "SELECT DISTINCT c.tree_name, c.git_repository_branch, c.git_repository_url,
                c.git_commit_name, c.git_commit_hash, c.start_time
         FROM tests t
         JOIN builds b ON t.build_id = b.id
         JOIN checkouts c ON b.checkout_id = c.id
         WHERE {HARDWARE_FILTER}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(window_params(query), |row| {
            Ok(TreeCheckoutRow {
                identity: TreeIdentity {
                    tree_name: row.get(0)?,
                    git_repository_branch: row.get(1)?,
                    git_repository_url: row.get(2)?,
                },
                git_commit_name: row.get(3)?,
                git_commit_hash: row.get(4)?,
                start_time: decode_ts(row.get(5)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn fetch_hardware_rows_impl(
    conn: &Connection,
    query: &HardwareQuery,
) -> anyhow::Result<Vec<JoinedRow>> {
    let sql = format!(
        "SELECT t.id, t.status, t.path, t.duration, t.start_time, t.log_url, t.comment,
                t.misc, t.environment_misc, t.environment_compatible,
                b.id, b.architecture, b.compiler, b.config_name, b.config_url, b.log_url,
                b.misc, b.valid, b.duration, b.start_time,
                c.tree_name, c.git_repository_url, c.git_repository_branch,
                c.git_commit_name, c.git_commit_hash,
                inc.issue_id, inc.issue_version, i.comment, i.report_url
         FROM tests t
         JOIN builds b ON t.build_id = b.id
         JOIN checkouts c ON b.checkout_id = c.id
         LEFT JOIN incidents inc ON inc.build_id = b.id
         LEFT JOIN issues i ON i.id = inc.issue_id AND i.version = inc.issue_version
         WHERE {HARDWARE_FILTER}
         ORDER BY t.start_time ASC, t.id ASC, inc.issue_id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(window_params(query), row_to_joined_impl)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn row_to_joined_impl(row: &rusqlite::Row<'_>) -> rusqlite::Result<JoinedRow> {
    Ok(JoinedRow {
        id: row.get(0)?,
        status: TestStatus::parse(row.get::<_, Option<String>>(1)?.as_deref()),
        path: row.get(2)?,
        duration: row.get(3)?,
        start_time: decode_ts(row.get(4)?),
        log_url: row.get(5)?,
        comment: row.get(6)?,
        misc: decode_json(row.get(7)?),
        environment_misc: decode_json(row.get(8)?),
        environment_compatible: decode_string_list(row.get(9)?),
        build_id: row.get(10)?,
        build_architecture: row.get(11)?,
        build_compiler: row.get(12)?,
        build_config_name: row.get(13)?,
        build_config_url: row.get(14)?,
        build_log_url: row.get(15)?,
        build_misc: decode_json(row.get(16)?),
        build_valid: row.get(17)?,
        build_duration: row.get(18)?,
        build_start_time: decode_ts(row.get(19)?),
        checkout_tree_name: row.get(20)?,
        checkout_git_repository_url: row.get(21)?,
        checkout_git_repository_branch: row.get(22)?,
        checkout_git_commit_name: row.get(23)?,
        checkout_git_commit_hash: row.get(24)?,
        issue_id: row.get(25)?,
        issue_version: row.get(26)?,
        issue_comment: row.get(27)?,
        issue_report_url: row.get(28)?,
    })
}

fn window_params(query: &HardwareQuery) -> [String; 4] {
    [
        query.hardware_id.clone(),
        query.origin.clone(),
        query.start.to_rfc3339_opts(SecondsFormat::Micros, true),
        query.end.to_rfc3339_opts(SecondsFormat::Micros, true),
    ]
}

pub(crate) fn latest_issue_version_impl(
    conn: &Connection,
    issue_id: &str,
) -> anyhow::Result<Option<i64>> {
    let version = conn.query_row(
        "SELECT MAX(version) FROM issues WHERE id = ?1",
        params![issue_id],
        |row| row.get::<_, Option<i64>>(0),
    )?;
    Ok(version)
}

pub(crate) fn fetch_issue_tests_impl(
    conn: &Connection,
    issue_id: &str,
    version: i64,
) -> anyhow::Result<Vec<IssueTest>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.duration, t.status, t.path, t.start_time, t.environment_compatible
         FROM incidents inc
         JOIN tests t ON inc.test_id = t.id
         WHERE inc.issue_id = ?1 AND inc.issue_version = ?2
         ORDER BY t.start_time ASC, t.id ASC",
    )?;
    let rows = stmt
        .query_map(params![issue_id, version], |row| {
            Ok(IssueTest {
                id: row.get(0)?,
                duration: row.get(1)?,
                status: TestStatus::parse(row.get::<_, Option<String>>(2)?.as_deref()),
                path: row.get(3)?,
                start_time: decode_ts(row.get(4)?),
                environment_compatible: decode_string_list(row.get(5)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
