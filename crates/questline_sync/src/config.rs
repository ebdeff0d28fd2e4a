//! Sync configuration.

use crate::RetryPolicy;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use questline_cache::{Cache, CachePolicy, CacheResult, CacheStore, FileCacheStore};
use questline_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../questline.toml");

/// Where a remote service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct EndpointConfig {
    /// Base URL, without a trailing slash
    base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl EndpointConfig {
    /// Create an endpoint configuration.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_player() -> EndpointConfig {
    EndpointConfig::new("https://sync.runescape.wiki/runelite/player", 10)
}

fn default_wiki() -> EndpointConfig {
    EndpointConfig::new("https://oldschool.runescape.wiki/api.php", 10)
}

/// Retry settings shared by both sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    /// Delay unit in milliseconds
    #[serde(default = "default_base_delay_ms")]
    base_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RetryConfig {
    /// Create retry settings.
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// The retry policy these settings describe.
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }
}

/// Per-namespace cache overrides. Unset values inherit the cache defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceCacheConfig {
    /// Hard TTL in hours
    pub ttl_hours: Option<u32>,
    /// Staleness threshold in hours
    pub stale_after_hours: Option<u32>,
}

/// Where and how long to cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CacheConfig {
    /// Cache directory; defaults to the platform cache directory
    #[serde(default)]
    dir: Option<PathBuf>,
    /// Default hard TTL in hours
    #[serde(default = "default_ttl_hours")]
    ttl_hours: u32,
    /// Default staleness threshold in hours
    #[serde(default = "default_stale_after_hours")]
    stale_after_hours: u32,
    /// Overrides keyed by namespace
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceCacheConfig>,
}

fn default_ttl_hours() -> u32 {
    168
}

fn default_stale_after_hours() -> u32 {
    24
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_hours: default_ttl_hours(),
            stale_after_hours: default_stale_after_hours(),
            namespaces: BTreeMap::new(),
        }
    }
}

impl CacheConfig {
    /// Point the cache at a specific directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// The directory the filesystem cache will use.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|d| d.join("questline"))
                .unwrap_or_else(|| PathBuf::from(".questline-cache"))
        })
    }

    /// Policy used for namespaces without an override.
    pub fn default_policy(&self) -> CachePolicy {
        CachePolicy::from_hours(self.ttl_hours, self.stale_after_hours)
    }

    /// Policy in effect for `namespace`.
    pub fn policy_for(&self, namespace: &str) -> CachePolicy {
        match self.namespaces.get(namespace) {
            Some(overrides) => CachePolicy::from_hours(
                overrides.ttl_hours.unwrap_or(self.ttl_hours),
                overrides.stale_after_hours.unwrap_or(self.stale_after_hours),
            ),
            None => self.default_policy(),
        }
    }

    /// Wrap `store` in a cache using these policies.
    pub fn build_with_store(&self, store: Arc<dyn CacheStore>) -> Cache {
        self.namespaces.keys().fold(
            Cache::new(store).with_default_policy(self.default_policy()),
            |cache, namespace| cache.with_policy(namespace.clone(), self.policy_for(namespace)),
        )
    }

    /// Open the filesystem cache.
    ///
    /// # Errors
    ///
    /// Returns error if the cache directory cannot be created.
    pub fn build(&self) -> CacheResult<Cache> {
        let store = FileCacheStore::new(self.resolved_dir())?;
        Ok(self.build_with_store(Arc::new(store)))
    }
}

/// Everything the sync layer needs to know.
///
/// # Examples
///
/// ```
/// use questline_sync::SyncConfig;
///
/// let config = SyncConfig::default();
/// assert_eq!(config.retry().policy().max_retries, 3);
/// assert_eq!(*config.cache().stale_after_hours(), 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SyncConfig {
    /// Player status sync service
    #[serde(default = "default_player")]
    player: EndpointConfig,
    /// Wiki parse API
    #[serde(default = "default_wiki")]
    wiki: EndpointConfig,
    /// Retry settings
    #[serde(default)]
    retry: RetryConfig,
    /// Cache settings
    #[serde(default)]
    cache: CacheConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            wiki: default_wiki(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Replace the player endpoint.
    pub fn with_player(mut self, player: EndpointConfig) -> Self {
        self.player = player;
        self
    }

    /// Replace the wiki endpoint.
    pub fn with_wiki(mut self, wiki: EndpointConfig) -> Self {
        self.wiki = wiki;
        self
    }

    /// Replace the retry settings.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the cache settings.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Load configuration from a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// 1. Bundled defaults (`questline.toml` shipped with the library)
    /// 2. `~/.config/questline/questline.toml`
    /// 3. `./questline.toml`
    ///
    /// Missing user files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/questline/questline.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("questline").required(false));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse.
    pub fn bundled() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_matches_code_defaults() {
        assert_eq!(SyncConfig::bundled().unwrap(), SyncConfig::default());
    }

    #[test]
    fn namespace_overrides_inherit_unset_values() {
        let mut cache = CacheConfig::default();
        cache.namespaces.insert(
            "player-cache".to_string(),
            NamespaceCacheConfig {
                ttl_hours: None,
                stale_after_hours: Some(1),
            },
        );
        assert_eq!(
            cache.policy_for("player-cache"),
            CachePolicy::from_hours(168, 1)
        );
        assert_eq!(cache.policy_for("requirement-cache"), CachePolicy::default());
    }
}
