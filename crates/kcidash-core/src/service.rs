//! Request orchestration: validation, tree resolution, read-through caching
//! and the aggregation fold.

use std::sync::Arc;

use crate::aggregate::{aggregate_records, BuildSummarizer, ValidityBuildSummarizer};
use crate::cache::{
    query_key, CachedRows, NoCache, QueryCache, ResultCache, HARDWARE_DETAILS_SCOPE,
};
use crate::config::DashConfig;
use crate::error::{DashError, DashResult};
use crate::extract::{MessageExtractor, MiscExtractor};
use crate::request::{HardwareDetailsRequest, IssueTestsRequest};
use crate::response::{
    HardwareDetailsResponse, IssueTestsOutcome, ISSUE_NOT_FOUND, NO_TESTS_FOUND,
};
use crate::source::{HardwareQuery, RowSource};
use crate::storage::Store;
use crate::trees::{resolve_trees, select_trees};

pub struct Dashboard {
    source: Arc<dyn RowSource>,
    cache: Arc<dyn ResultCache>,
    extractor: Box<dyn MessageExtractor>,
    summarizer: Box<dyn BuildSummarizer>,
    default_origin: String,
}

impl Dashboard {
    pub fn new(source: Arc<dyn RowSource>, cache: Arc<dyn ResultCache>) -> Self {
        Self {
            source,
            cache,
            extractor: Box::new(MiscExtractor),
            summarizer: Box::new(ValidityBuildSummarizer),
            default_origin: crate::config::DEFAULT_ORIGIN.to_string(),
        }
    }

    /// Opens the configured SQLite store (creating missing tables) and the
    /// configured cache. Store failures are [`DashError::Source`].
    pub fn from_config(cfg: &DashConfig) -> DashResult<Self> {
        let store = Store::open(&cfg.db_path)?;
        store.init_schema()?;
        let cache: Arc<dyn ResultCache> = if cfg.cache_enabled {
            Arc::new(QueryCache::new(cfg.cache_max_entries, cfg.cache_ttl()))
        } else {
            Arc::new(NoCache)
        };
        Ok(Self::new(Arc::new(store), cache).with_default_origin(&cfg.default_origin))
    }

    pub fn with_extractor(mut self, extractor: impl MessageExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_summarizer(mut self, summarizer: impl BuildSummarizer + 'static) -> Self {
        self.summarizer = Box::new(summarizer);
        self
    }

    pub fn with_default_origin(mut self, origin: &str) -> Self {
        self.default_origin = origin.to_string();
        self
    }

    pub fn default_origin(&self) -> &str {
        &self.default_origin
    }

    /// Parses a JSON request body, then runs [`Dashboard::hardware_details`].
    pub fn hardware_details_json(
        &self,
        hardware_id: &str,
        body: &str,
    ) -> DashResult<HardwareDetailsResponse> {
        let request = HardwareDetailsRequest::from_json(body, &self.default_origin)?;
        self.hardware_details(hardware_id, &request)
    }

    pub fn hardware_details(
        &self,
        hardware_id: &str,
        request: &HardwareDetailsRequest,
    ) -> DashResult<HardwareDetailsResponse> {
        if hardware_id.trim().is_empty() {
            return Err(DashError::invalid_parameter("hardware_id", "must not be empty"));
        }
        let query = request.query(hardware_id);

        let trees = resolve_trees(self.source.fetch_tree_checkouts(&query)?);
        let selected = select_trees(&trees, &request.selected_trees);
        let rows = self.rows(&query)?;

        let aggregation = aggregate_records(
            rows.iter(),
            &selected,
            self.extractor.as_ref(),
            self.summarizer.as_ref(),
        );
        tracing::info!(
            hardware = %hardware_id,
            origin = %query.origin,
            trees = trees.len(),
            selected = selected.len(),
            rows = rows.len(),
            builds = aggregation.builds.items.len(),
            "hardware details aggregated"
        );
        Ok(HardwareDetailsResponse::new(aggregation, trees))
    }

    /// Read-through: a cache hit skips the row source entirely.
    fn rows(&self, query: &HardwareQuery) -> DashResult<CachedRows> {
        let key = query_key(HARDWARE_DETAILS_SCOPE, query);
        if let Some(rows) = self.cache.get(&key) {
            tracing::debug!(key = %key, rows = rows.len(), "query cache hit");
            return Ok(rows);
        }
        let rows: CachedRows = Arc::new(self.source.fetch_hardware_rows(query)?);
        tracing::debug!(key = %key, rows = rows.len(), "query cache miss");
        self.cache.set(&key, rows.clone());
        Ok(rows)
    }

    pub fn issue_tests(&self, request: &IssueTestsRequest) -> DashResult<IssueTestsOutcome> {
        let version = match request.version {
            Some(v) => v,
            None => match self.source.latest_issue_version(&request.issue_id)? {
                Some(v) => v,
                None => {
                    tracing::debug!(issue = %request.issue_id, "issue not found");
                    return Ok(IssueTestsOutcome::empty(ISSUE_NOT_FOUND));
                }
            },
        };

        let tests = self.source.fetch_issue_tests(&request.issue_id, version)?;
        if tests.is_empty() {
            return Ok(IssueTestsOutcome::empty(NO_TESTS_FOUND));
        }
        Ok(IssueTestsOutcome::Found(tests))
    }
}
