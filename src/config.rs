//! Configuration for dirkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Configuration for a Store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the bucket files. Created lazily on the first
    /// write; reads against a missing directory behave as an empty store.
    pub dir: PathBuf,

    // -------------------------------------------------------------------------
    // Versioning
    // -------------------------------------------------------------------------
    /// Caller-controlled cache-generation tag. A bucket file written
    /// under a different schema version is discarded wholesale on the
    /// next access — coarse invalidation, not data migration.
    pub schema_version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./dirkv_data"),
            schema_version: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store directory
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dir = path.into();
        self
    }

    /// Set the schema version tag
    pub fn schema_version(mut self, version: u32) -> Self {
        self.config.schema_version = version;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
