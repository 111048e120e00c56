pub(crate) mod queries;
pub mod rows;
pub mod schema;
pub mod store;

pub use rows::{
    BuildRecord, CheckoutRecord, Fixture, ImportStats, IncidentRecord, IssueRecord, TestRecord,
};
pub use store::Store;
