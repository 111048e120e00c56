use kcidash_core::DashConfig;

use crate::exit_codes::EXIT_SUCCESS;

pub fn run(cfg: &DashConfig) -> anyhow::Result<i32> {
    let result = super::open_store(cfg).map(|_| {
        eprintln!("initialized {}", cfg.db_path.display());
        EXIT_SUCCESS
    });
    Ok(super::exit_code(result))
}
