use anyhow::{anyhow, Context};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use super::queries::{
    encode_ts, fetch_hardware_rows_impl, fetch_issue_tests_impl, fetch_tree_checkouts_impl,
    latest_issue_version_impl,
};
use super::rows::{
    BuildRecord, CheckoutRecord, Fixture, ImportStats, IncidentRecord, IssueRecord, TestRecord,
};
use crate::model::{IssueTest, JoinedRow, TreeCheckoutRow};
use crate::source::{HardwareQuery, RowSource};

#[derive(Clone)]
pub struct Store {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(super::schema::DDL)
            .context("failed to create schema")?;
        Ok(())
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("sqlite connection mutex poisoned"))
    }

    pub fn insert_checkout(&self, rec: &CheckoutRecord) -> anyhow::Result<()> {
        let conn = self.lock()?;
        insert_checkout_impl(&conn, rec)
    }

    pub fn insert_build(&self, rec: &BuildRecord) -> anyhow::Result<()> {
        let conn = self.lock()?;
        insert_build_impl(&conn, rec)
    }

    pub fn insert_test(&self, rec: &TestRecord) -> anyhow::Result<()> {
        let conn = self.lock()?;
        insert_test_impl(&conn, rec)
    }

    pub fn insert_issue(&self, rec: &IssueRecord) -> anyhow::Result<()> {
        let conn = self.lock()?;
        insert_issue_impl(&conn, rec)
    }

    pub fn insert_incident(&self, rec: &IncidentRecord) -> anyhow::Result<()> {
        let conn = self.lock()?;
        insert_incident_impl(&conn, rec)
    }

    /// Writes every record of the fixture in a single transaction.
    pub fn import_fixture(&self, fixture: &Fixture) -> anyhow::Result<ImportStats> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for rec in &fixture.checkouts {
            insert_checkout_impl(&tx, rec)?;
        }
        for rec in &fixture.builds {
            insert_build_impl(&tx, rec)?;
        }
        for rec in &fixture.tests {
            insert_test_impl(&tx, rec)?;
        }
        for rec in &fixture.issues {
            insert_issue_impl(&tx, rec)?;
        }
        for rec in &fixture.incidents {
            insert_incident_impl(&tx, rec)?;
        }
        tx.commit().context("failed to commit import")?;

        let stats = ImportStats {
            checkouts: fixture.checkouts.len(),
            builds: fixture.builds.len(),
            tests: fixture.tests.len(),
            issues: fixture.issues.len(),
            incidents: fixture.incidents.len(),
        };
        tracing::info!(?stats, "imported fixture");
        Ok(stats)
    }
}

fn json_text(v: &Option<serde_json::Value>) -> anyhow::Result<Option<String>> {
    v.as_ref()
        .map(serde_json::to_string)
        .transpose()
        .context("failed to encode json column")
}

fn insert_checkout_impl(conn: &Connection, rec: &CheckoutRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO checkouts(id, origin, tree_name, git_repository_url,
            git_repository_branch, git_commit_hash, git_commit_name, start_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            rec.id,
            rec.origin,
            rec.tree_name,
            rec.git_repository_url,
            rec.git_repository_branch,
            rec.git_commit_hash,
            rec.git_commit_name,
            encode_ts(rec.start_time),
        ],
    )
    .with_context(|| format!("insert checkout {}", rec.id))?;
    Ok(())
}

fn insert_build_impl(conn: &Connection, rec: &BuildRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO builds(id, checkout_id, origin, architecture, compiler,
            config_name, config_url, log_url, valid, duration, start_time, misc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            rec.id,
            rec.checkout_id,
            rec.origin,
            rec.architecture,
            rec.compiler,
            rec.config_name,
            rec.config_url,
            rec.log_url,
            rec.valid,
            rec.duration,
            encode_ts(rec.start_time),
            json_text(&rec.misc)?,
        ],
    )
    .with_context(|| format!("insert build {}", rec.id))?;
    Ok(())
}

fn insert_test_impl(conn: &Connection, rec: &TestRecord) -> anyhow::Result<()> {
    let compatible = serde_json::to_string(&rec.environment_compatible)?;
    conn.execute(
        "INSERT OR REPLACE INTO tests(id, build_id, origin, path, status, duration, start_time,
            log_url, comment, misc, environment_misc, environment_compatible)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            rec.id,
            rec.build_id,
            rec.origin,
            rec.path,
            rec.status,
            rec.duration,
            encode_ts(rec.start_time),
            rec.log_url,
            rec.comment,
            json_text(&rec.misc)?,
            json_text(&rec.environment_misc)?,
            compatible,
        ],
    )
    .with_context(|| format!("insert test {}", rec.id))?;
    Ok(())
}

fn insert_issue_impl(conn: &Connection, rec: &IssueRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO issues(id, version, origin, comment, report_url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![rec.id, rec.version, rec.origin, rec.comment, rec.report_url],
    )
    .with_context(|| format!("insert issue {}@{}", rec.id, rec.version))?;
    Ok(())
}

fn insert_incident_impl(conn: &Connection, rec: &IncidentRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO incidents(id, issue_id, issue_version, build_id, test_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rec.id,
            rec.issue_id,
            rec.issue_version,
            rec.build_id,
            rec.test_id
        ],
    )
    .with_context(|| format!("insert incident {}", rec.id))?;
    Ok(())
}

impl RowSource for Store {
    fn fetch_tree_checkouts(&self, query: &HardwareQuery) -> anyhow::Result<Vec<TreeCheckoutRow>> {
        let conn = self.lock()?;
        fetch_tree_checkouts_impl(&conn, query)
    }

    fn fetch_hardware_rows(&self, query: &HardwareQuery) -> anyhow::Result<Vec<JoinedRow>> {
        let conn = self.lock()?;
        fetch_hardware_rows_impl(&conn, query)
    }

    fn latest_issue_version(&self, issue_id: &str) -> anyhow::Result<Option<i64>> {
        let conn = self.lock()?;
        latest_issue_version_impl(&conn, issue_id)
    }

    fn fetch_issue_tests(&self, issue_id: &str, version: i64) -> anyhow::Result<Vec<IssueTest>> {
        let conn = self.lock()?;
        fetch_issue_tests_impl(&conn, issue_id, version)
    }
}
