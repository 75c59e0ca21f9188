//! Storage configuration.
//!
//! Provides [`StorageConfig`] for tuning the ephemeral store and the client
//! façade built on top of it. Values can be loaded from environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default download chunk size in bytes (32 KiB).
pub const DEFAULT_DOWNLOAD_CHUNK_SIZE: usize = 32 * 1024;

/// Ephemeral storage configuration.
///
/// # Examples
///
/// ```
/// use ephemeral_storage_core::config::StorageConfig;
///
/// let config = StorageConfig::default();
/// assert_eq!(config.download_chunk_size, 32 * 1024);
/// assert_eq!(config.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Size in bytes of each chunk yielded by a download stream.
    #[builder(default = DEFAULT_DOWNLOAD_CHUNK_SIZE)]
    pub download_chunk_size: usize,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_chunk_size: DEFAULT_DOWNLOAD_CHUNK_SIZE,
            log_level: String::from("info"),
        }
    }
}

impl StorageConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `EPHEMERAL_DOWNLOAD_CHUNK_SIZE` | `32768` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// A chunk size that does not parse, or parses to zero, keeps the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("EPHEMERAL_DOWNLOAD_CHUNK_SIZE") {
            if let Some(n) = parse_chunk_size(&v) {
                config.download_chunk_size = n;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

fn parse_chunk_size(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
