use anyhow::Context;
use kcidash_core::{DashConfig, DashResult, Fixture};

use crate::cli::args::ImportArgs;
use crate::exit_codes::{EXIT_SUCCESS, INVALID_INPUT};

pub fn run(args: ImportArgs, cfg: &DashConfig) -> anyhow::Result<i32> {
    let fixture = match read_fixture(&args) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("import error: {e:#}");
            return Ok(INVALID_INPUT);
        }
    };
    Ok(super::exit_code(write_fixture(&fixture, cfg)))
}

fn read_fixture(args: &ImportArgs) -> anyhow::Result<Fixture> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    Fixture::from_json(&raw).with_context(|| format!("failed to parse {}", args.file.display()))
}

fn write_fixture(fixture: &Fixture, cfg: &DashConfig) -> DashResult<i32> {
    let stats = super::open_store(cfg)?.import_fixture(fixture)?;
    super::print_json(&stats, false)?;
    Ok(EXIT_SUCCESS)
}
