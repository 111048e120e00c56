#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use kcidash_core::storage::{
    BuildRecord, CheckoutRecord, Fixture, IncidentRecord, IssueRecord, TestRecord,
};
use kcidash_core::Store;
use serde_json::json;

pub const HW: &str = "google,juniper";
pub const T0: i64 = 1_700_000_000;

pub fn ts(offset: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(T0 + offset, 0).unwrap()
}

pub fn body(start: i64, end: i64) -> String {
    json!({
        "startTimestampInSeconds": T0 + start,
        "endTimestampInSeconds": T0 + end,
    })
    .to_string()
}

pub fn checkout(id: &str, tree: &str, hash: &str, offset: i64) -> CheckoutRecord {
    CheckoutRecord {
        id: id.into(),
        origin: "maestro".into(),
        tree_name: Some(tree.into()),
        git_repository_url: Some(format!("https://git.kernel.org/{tree}.git")),
        git_repository_branch: Some("master".into()),
        git_commit_hash: Some(hash.into()),
        git_commit_name: Some(format!("{tree}-{hash}")),
        start_time: Some(ts(offset)),
    }
}

pub fn build(id: &str, checkout_id: &str, arch: &str, valid: Option<bool>) -> BuildRecord {
    BuildRecord {
        id: id.into(),
        checkout_id: checkout_id.into(),
        origin: "maestro".into(),
        architecture: Some(arch.into()),
        compiler: Some("gcc-12".into()),
        config_name: Some("defconfig".into()),
        config_url: None,
        log_url: Some(format!("https://storage.kernelci.org/{id}/build.log")),
        valid,
        duration: Some(420.0),
        start_time: None,
        misc: None,
    }
}

pub fn test(id: &str, build_id: &str, path: &str, status: &str, offset: i64) -> TestRecord {
    TestRecord {
        id: id.into(),
        build_id: build_id.into(),
        origin: "maestro".into(),
        path: Some(path.into()),
        status: Some(status.into()),
        duration: Some(12.0),
        start_time: Some(ts(offset)),
        log_url: None,
        comment: None,
        misc: None,
        environment_misc: None,
        environment_compatible: vec![HW.into()],
    }
}

pub fn issue(id: &str, version: i64) -> IssueRecord {
    IssueRecord {
        id: id.into(),
        version,
        origin: "maestro".into(),
        comment: Some(format!("{id} v{version}")),
        report_url: None,
    }
}

pub fn incident(
    id: &str,
    issue_id: &str,
    version: i64,
    build: Option<&str>,
    test: Option<&str>,
) -> IncidentRecord {
    IncidentRecord {
        id: id.into(),
        issue_id: issue_id.into(),
        issue_version: version,
        build_id: build.map(String::from),
        test_id: test.map(String::from),
    }
}

/// Two mainline checkouts (head `m-new`, stale `m-old`), one `next` checkout
/// and one mainline checkout outside every window used by the tests.
pub fn scenario() -> Fixture {
    let mut t2 = test("t2", "b1", "baseline.login", "FAIL", 1002);
    t2.misc = Some(json!({"error_msg": "login timeout"}));
    t2.environment_misc = Some(json!({"platform": "juniper-a"}));

    let mut t3 = test("t3", "b2", "boot.nfs", "FAIL", 1003);
    t3.environment_misc = Some(json!({"platform": "juniper-b"}));

    let mut t6 = test("t6", "b1", "kselftest", "PASS", 1004);
    t6.environment_compatible = vec!["google,kevin".into()];

    let mut t7 = test("t7", "b1", "kselftest.x", "PASS", 1005);
    t7.origin = "microsoft".into();

    Fixture {
        checkouts: vec![
            checkout("c1", "mainline", "m-new", 1000),
            checkout("c0", "mainline", "m-old", 500),
            checkout("c2", "next", "n1", 800),
            checkout("c3", "mainline", "m-ancient", -100_000),
        ],
        builds: vec![
            build("b1", "c1", "x86_64", Some(true)),
            build("b2", "c1", "arm64", Some(false)),
            build("b0", "c0", "x86_64", Some(true)),
            build("b3", "c2", "x86_64", Some(true)),
            build("b9", "c3", "x86_64", Some(true)),
        ],
        tests: vec![
            test("t1", "b1", "boot", "PASS", 1001),
            t2,
            t3,
            test("t4", "b0", "boot", "PASS", 501),
            test("t5", "b3", "ltp.syscalls", "PASS", 801),
            t6,
            t7,
            test("t9", "b9", "boot", "FAIL", -99_000),
        ],
        issues: vec![issue("i1", 1), issue("i1", 2), issue("i2", 1)],
        incidents: vec![
            incident("inc1", "i1", 2, Some("b2"), None),
            incident("inc2", "i1", 2, None, Some("t3")),
            incident("inc3", "i2", 1, None, Some("t2")),
        ],
    }
}

pub fn seeded_store(fixture: &Fixture) -> Store {
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    store.import_fixture(fixture).unwrap();
    store
}
