//! Hardware and issue result aggregation for the KernelCI dashboard.
//!
//! Test rows joined with their build, checkout and build incidents are folded
//! into the summaries shown on a hardware page:
//!
//! - trees seen for the hardware in a time window, each with its head commit
//! - builds, deduplicated by id, with validity totals and linked issues
//! - "tests" and "boots" buckets with history, status, config, architecture,
//!   failure-reason and failing-platform summaries plus linked issues
//!
//! Only rows on the head commit of a selected tree are summarized.
//!
//! # Quick Start
//!
//! ```no_run
//! use kcidash_core::{Dashboard, DashConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let dashboard = Dashboard::from_config(&DashConfig::from_env())?;
//! let details = dashboard.hardware_details_json(
//!     "google,juniper",
//!     r#"{"startTimestampInSeconds": 1700000000, "endTimestampInSeconds": 1700259200}"#,
//! )?;
//! println!("{} builds", details.builds.items.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `KCIDASH_DB` | SQLite database path (default: `kcidash.db`) |
//! | `KCIDASH_ORIGIN` | Origin used when a request names none (default: `maestro`) |
//! | `KCIDASH_CACHE_TTL_SECS` | Query-result cache TTL (default: 60) |
//! | `KCIDASH_CACHE_MAX_ENTRIES` | Query-result cache capacity (default: 256) |
//! | `KCIDASH_CACHE_DISABLED` | Disable the query-result cache |

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod head_filter;
pub mod model;
pub mod normalize;
pub mod request;
pub mod response;
pub mod service;
pub mod source;
pub mod storage;
pub mod trees;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregate::{
    aggregate_records, BuildSummarizer, BuildSummaryTotals, BuildsSummary, HardwareAggregation,
    RecordAggregator, TestsSummary, ValidityBuildSummarizer,
};
pub use cache::{query_key, NoCache, QueryCache, ResultCache};
pub use config::{DashConfig, DEFAULT_ORIGIN};
pub use error::{DashError, DashResult};
pub use extract::{MessageExtractor, MiscExtractor, UNKNOWN_STRING};
pub use model::{
    IssueTest, JoinedRow, TestStatus, TreeCheckoutRow, TreeIdentity, NULL_STATUS_KEY,
};
pub use request::{HardwareDetailsRequest, IssueTestsRequest};
pub use response::{HardwareDetailsResponse, IssueTestsOutcome};
pub use service::Dashboard;
pub use source::{HardwareQuery, RowSource};
pub use storage::{Fixture, Store};
pub use trees::{resolve_trees, select_trees, Tree, TreeSelection, SELECTED_VALUE};
