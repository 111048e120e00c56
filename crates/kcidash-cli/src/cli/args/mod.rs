use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kcidash",
    version,
    about = "KernelCI dashboard aggregation: hardware details and issue tests from a local store"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML config file; KCIDASH_* variables and flags override it
    #[arg(long, global = true, env = "KCIDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store tables
    InitDb,
    /// Load checkouts, builds, tests, issues and incidents from a JSON file
    Import(ImportArgs),
    /// Aggregate hardware details for a time window
    Hardware(HardwareArgs),
    /// List the tests linked to an issue version
    IssueTests(IssueTestsArgs),
    Version,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct HardwareArgs {
    /// Hardware identifier as listed in environment_compatible
    pub hardware_id: String,

    /// Raw request body; overrides the window flags
    #[arg(long, conflicts_with_all = ["start", "end", "origin", "select"])]
    pub body: Option<String>,

    /// Window start, seconds since the epoch
    #[arg(long, required_unless_present = "body")]
    pub start: Option<String>,

    /// Window end, seconds since the epoch
    #[arg(long, required_unless_present = "body")]
    pub end: Option<String>,

    #[arg(long)]
    pub origin: Option<String>,

    /// Tree index to keep; repeat to keep several
    #[arg(long = "select", value_name = "INDEX")]
    pub select: Vec<String>,

    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct IssueTestsArgs {
    pub issue_id: String,

    /// Issue version; the latest one when omitted
    #[arg(long)]
    pub version: Option<String>,

    #[arg(long)]
    pub pretty: bool,
}
