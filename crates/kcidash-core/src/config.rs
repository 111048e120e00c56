use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Origin used when a request does not name one.
pub const DEFAULT_ORIGIN: &str = "maestro";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashConfig {
    /// SQLite database holding checkouts, builds, tests and issues.
    pub db_path: PathBuf,

    /// Origin applied to hardware queries without an explicit `origin`.
    pub default_origin: String,

    /// Query-result cache. Disabling it makes every request hit the store.
    pub cache_enabled: bool,

    /// Seconds a cached row set stays valid.
    pub cache_ttl_secs: u64,

    pub cache_max_entries: u64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("kcidash.db"),
            default_origin: DEFAULT_ORIGIN.to_string(),
            cache_enabled: true,
            cache_ttl_secs: 60,
            cache_max_entries: 256,
        }
    }
}

impl DashConfig {
    /// Reads a YAML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Defaults overlaid with `KCIDASH_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Overlays `KCIDASH_*` environment variables. Unparseable numbers are
    /// ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var("KCIDASH_DB") {
            self.db_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("KCIDASH_ORIGIN") {
            if !v.trim().is_empty() {
                self.default_origin = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("KCIDASH_CACHE_TTL_SECS") {
            match v.parse() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid KCIDASH_CACHE_TTL_SECS"),
            }
        }
        if let Ok(v) = env::var("KCIDASH_CACHE_MAX_ENTRIES") {
            match v.parse() {
                Ok(n) => self.cache_max_entries = n,
                Err(_) => {
                    tracing::warn!(value = %v, "ignoring invalid KCIDASH_CACHE_MAX_ENTRIES")
                }
            }
        }
        if let Ok(v) = env::var("KCIDASH_CACHE_DISABLED") {
            self.cache_enabled = !matches!(v.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
