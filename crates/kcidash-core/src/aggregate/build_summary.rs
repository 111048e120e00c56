use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::normalize::BuildItem;

/// Builds counted by validity; `null` counts builds with no verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatusCount {
    pub valid: u64,
    pub invalid: u64,
    pub null: u64,
}

impl BuildStatusCount {
    fn add(&mut self, valid: Option<bool>) {
        match valid {
            Some(true) => self.valid += 1,
            Some(false) => self.invalid += 1,
            None => self.null += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchBuildSummary {
    #[serde(flatten)]
    pub counts: BuildStatusCount,
    pub compilers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummaryTotals {
    pub builds: BuildStatusCount,
    pub configs: BTreeMap<String, BuildStatusCount>,
    pub architectures: BTreeMap<String, ArchBuildSummary>,
}

/// Turns the deduplicated build list into the `builds.summary` block.
pub trait BuildSummarizer: Send + Sync {
    fn summarize(&self, builds: &[BuildItem]) -> BuildSummaryTotals;
}

/// Counts validity overall, per config name and per architecture. Builds
/// without a config name or architecture only count towards the overall
/// totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidityBuildSummarizer;

impl BuildSummarizer for ValidityBuildSummarizer {
    fn summarize(&self, builds: &[BuildItem]) -> BuildSummaryTotals {
        let mut totals = BuildSummaryTotals::default();
        let mut compilers: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for build in builds {
            totals.builds.add(build.valid);

            if let Some(config) = &build.config_name {
                totals
                    .configs
                    .entry(config.clone())
                    .or_default()
                    .add(build.valid);
            }

            if let Some(arch) = &build.architecture {
                totals
                    .architectures
                    .entry(arch.clone())
                    .or_default()
                    .counts
                    .add(build.valid);
                let seen = compilers.entry(arch.clone()).or_default();
                if let Some(compiler) = &build.compiler {
                    seen.insert(compiler.clone());
                }
            }
        }

        for (arch, seen) in compilers {
            if let Some(summary) = totals.architectures.get_mut(&arch) {
                summary.compilers = seen.into_iter().collect();
            }
        }
        totals
    }
}
