use kcidash_core::{Dashboard, DashConfig, DashResult, TreeSelection};
use serde_json::{json, Value};

use crate::cli::args::HardwareArgs;
use crate::exit_codes::EXIT_SUCCESS;

pub fn run(args: HardwareArgs, cfg: &DashConfig) -> anyhow::Result<i32> {
    Ok(super::exit_code(details(&args, cfg)))
}

fn details(args: &HardwareArgs, cfg: &DashConfig) -> DashResult<i32> {
    let body = match &args.body {
        Some(raw) => raw.clone(),
        None => request_body(args).to_string(),
    };
    let dashboard = Dashboard::from_config(cfg)?;
    let details = dashboard.hardware_details_json(&args.hardware_id, &body)?;
    super::print_json(&details.to_json()?, args.pretty)?;
    Ok(EXIT_SUCCESS)
}

/// Window flags are passed through as strings so the request parser applies
/// the same timestamp validation as for a raw body.
fn request_body(args: &HardwareArgs) -> Value {
    let mut body = json!({
        "startTimestampInSeconds": args.start,
        "endTimestampInSeconds": args.end,
    });
    if let Some(origin) = &args.origin {
        body["origin"] = json!(origin);
    }
    if !args.select.is_empty() {
        body["selectedTrees"] = json!(TreeSelection::select(args.select.iter().cloned()));
    }
    body
}
