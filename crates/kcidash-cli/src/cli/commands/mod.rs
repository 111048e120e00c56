use kcidash_core::{DashConfig, DashError, DashResult, Store};
use serde::Serialize;

use super::args::*;
use crate::exit_codes::{EXIT_SUCCESS, INTERNAL_ERROR, INVALID_INPUT};

pub mod hardware;
pub mod import;
pub mod init_db;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let cfg = match resolve_config(&cli.global) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config error: {e:#}");
            return Ok(INVALID_INPUT);
        }
    };
    match cli.cmd {
        Command::InitDb => init_db::run(&cfg),
        Command::Import(args) => import::run(args, &cfg),
        Command::Hardware(args) => hardware::run(args, &cfg),
        Command::IssueTests(args) => issue_tests::run(args, &cfg),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}

/// File, then environment, then flags.
pub fn resolve_config(global: &GlobalArgs) -> anyhow::Result<DashConfig> {
    let mut cfg = match &global.config {
        Some(path) => DashConfig::load(path)?,
        None => DashConfig::default(),
    };
    cfg.apply_env();
    if let Some(db) = &global.db {
        cfg.db_path = db.clone();
    }
    tracing::debug!(db = %cfg.db_path.display(), origin = %cfg.default_origin, "resolved config");
    Ok(cfg)
}

/// Opens the configured store, creating missing tables.
pub(crate) fn open_store(cfg: &DashConfig) -> DashResult<Store> {
    let store = Store::open(&cfg.db_path)?;
    store.init_schema()?;
    Ok(store)
}

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> DashResult<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

/// Prints the `{"error": ...}` body and maps the error to an exit code.
pub(crate) fn report_error(err: &DashError) -> i32 {
    println!("{}", err.error_body());
    if err.is_client_error() {
        tracing::warn!(error = %err, "request rejected");
        INVALID_INPUT
    } else {
        tracing::error!(error = ?err, "request failed");
        INTERNAL_ERROR
    }
}

pub(crate) fn exit_code(result: DashResult<i32>) -> i32 {
    result.unwrap_or_else(|e| report_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_exit_internal() {
        let err = DashError::from(anyhow::anyhow!("unable to open database file"));
        assert_eq!(exit_code(Err(err)), INTERNAL_ERROR);
    }

    #[test]
    fn rejected_requests_exit_invalid_input() {
        let err = DashError::invalid_parameter("version", "not an integer");
        assert_eq!(exit_code(Err(err)), INVALID_INPUT);
        assert_eq!(exit_code(Ok(EXIT_SUCCESS)), EXIT_SUCCESS);
    }

    #[test]
    fn serialization_failures_are_internal() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DashError::from(bad);
        assert!(matches!(err, DashError::Internal { .. }));
        assert_eq!(exit_code(Err(err)), INTERNAL_ERROR);
    }
}
