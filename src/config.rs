use crate::error::ConfigError;
use crate::policy::{FeedCachePolicy, MAX_CACHE_AGE_DAYS};
use crate::store::file::{BincodeFormat, FileFeedStore, JsonFormat};
use crate::store::FeedStore;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk encoding of the cached feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    Bincode,
}

/// Settings for a file-backed feed cache.
///
/// ```json
/// { "store_path": "/var/cache/app/feed.store", "format": "bincode", "max_cache_age_days": 7 }
/// ```
///
/// Only `store_path` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    pub store_path: PathBuf,
    #[serde(default)]
    pub format: StoreFormat,
    #[serde(default = "default_max_cache_age_days")]
    pub max_cache_age_days: u64,
}

fn default_max_cache_age_days() -> u64 {
    MAX_CACHE_AGE_DAYS
}

impl CacheConfig {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            format: StoreFormat::default(),
            max_cache_age_days: MAX_CACHE_AGE_DAYS,
        }
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_cache_age_days(mut self, days: u64) -> Self {
        self.max_cache_age_days = days;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cache_age_days == 0 {
            return Err(ConfigError::ZeroMaxAge);
        }
        Ok(())
    }

    pub fn policy(&self) -> FeedCachePolicy {
        FeedCachePolicy::with_max_age_days(self.max_cache_age_days)
    }

    /// Opens the file store this config describes.
    pub fn open_store(&self) -> io::Result<Arc<dyn FeedStore>> {
        Ok(match self.format {
            StoreFormat::Json => Arc::new(FileFeedStore::<JsonFormat>::new(&self.store_path)?),
            StoreFormat::Bincode => Arc::new(FileFeedStore::<BincodeFormat>::new(&self.store_path)?),
        })
    }
}
