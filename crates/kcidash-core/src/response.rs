use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aggregate::{BuildsSummary, HardwareAggregation, TestsSummary};
use crate::error::{error_body, DashResult};
use crate::model::IssueTest;
use crate::trees::Tree;

/// Message returned when an issue id has no version at all.
pub const ISSUE_NOT_FOUND: &str = "Issue not found";
/// Message returned when an issue version has no linked tests.
pub const NO_TESTS_FOUND: &str = "No tests found for this issue";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareDetailsResponse {
    pub builds: BuildsSummary,
    pub tests: TestsSummary,
    pub boots: TestsSummary,
    /// Every resolved tree, selected or not.
    pub trees: Vec<Tree>,
    pub configs: Vec<String>,
    pub archs: Vec<String>,
    pub compilers: Vec<String>,
}

impl HardwareDetailsResponse {
    pub fn new(aggregation: HardwareAggregation, trees: Vec<Tree>) -> Self {
        let mut configs = BTreeSet::new();
        let mut archs = BTreeSet::new();
        let mut compilers = BTreeSet::new();
        for build in &aggregation.builds.items {
            configs.extend(build.config_name.iter().cloned());
            archs.extend(build.architecture.iter().cloned());
            compilers.extend(build.compiler.iter().cloned());
        }

        Self {
            builds: aggregation.builds,
            tests: aggregation.tests,
            boots: aggregation.boots,
            trees,
            configs: configs.into_iter().collect(),
            archs: archs.into_iter().collect(),
            compilers: compilers.into_iter().collect(),
        }
    }

    pub fn to_json(&self) -> DashResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Result of an issue tests lookup. An unknown issue or an issue without
/// tests is an empty result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueTestsOutcome {
    Found(Vec<IssueTest>),
    Empty { message: String },
}

impl IssueTestsOutcome {
    pub fn empty(message: &str) -> Self {
        Self::Empty {
            message: message.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn to_json(&self) -> DashResult<serde_json::Value> {
        match self {
            Self::Found(tests) => Ok(serde_json::to_value(tests)?),
            Self::Empty { message } => Ok(error_body(message)),
        }
    }
}
