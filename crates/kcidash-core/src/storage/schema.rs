pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS checkouts (
  id TEXT PRIMARY KEY,
  origin TEXT NOT NULL,
  tree_name TEXT,
  git_repository_url TEXT,
  git_repository_branch TEXT,
  git_commit_hash TEXT,
  git_commit_name TEXT,
  start_time TEXT
);

CREATE TABLE IF NOT EXISTS builds (
  id TEXT PRIMARY KEY,
  checkout_id TEXT NOT NULL REFERENCES checkouts(id),
  origin TEXT NOT NULL,
  architecture TEXT,
  compiler TEXT,
  config_name TEXT,
  config_url TEXT,
  log_url TEXT,
  valid INTEGER,
  duration REAL,
  start_time TEXT,
  misc TEXT
);

CREATE TABLE IF NOT EXISTS tests (
  id TEXT PRIMARY KEY,
  build_id TEXT NOT NULL REFERENCES builds(id),
  origin TEXT NOT NULL,
  path TEXT,
  status TEXT,
  duration REAL,
  start_time TEXT,
  log_url TEXT,
  comment TEXT,
  misc TEXT,
  environment_misc TEXT,
  -- JSON array of compatible hardware names
  environment_compatible TEXT
);

CREATE TABLE IF NOT EXISTS issues (
  id TEXT NOT NULL,
  version INTEGER NOT NULL,
  origin TEXT NOT NULL,
  comment TEXT,
  report_url TEXT,
  PRIMARY KEY (id, version)
);

CREATE TABLE IF NOT EXISTS incidents (
  id TEXT PRIMARY KEY,
  issue_id TEXT NOT NULL,
  issue_version INTEGER NOT NULL,
  build_id TEXT REFERENCES builds(id),
  test_id TEXT REFERENCES tests(id),
  FOREIGN KEY(issue_id, issue_version) REFERENCES issues(id, version)
);

CREATE INDEX IF NOT EXISTS idx_checkouts_start ON checkouts(start_time);
CREATE INDEX IF NOT EXISTS idx_builds_checkout ON builds(checkout_id);
CREATE INDEX IF NOT EXISTS idx_tests_build ON tests(build_id);
CREATE INDEX IF NOT EXISTS idx_tests_origin ON tests(origin);
CREATE INDEX IF NOT EXISTS idx_incidents_build ON incidents(build_id);
CREATE INDEX IF NOT EXISTS idx_incidents_issue ON incidents(issue_id, issue_version);
"#;
