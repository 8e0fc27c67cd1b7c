//! Store configuration
//!
//! Settings for building a [`BlockStore`](crate::store::BlockStore), loadable
//! from a JSON string or file. Keys are camelCase:
//!
//! ```json
//! { "saveEndpoint": "/api/page/blocks", "seedBuiltins": true }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a block collection store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Endpoint the serialized sequence is posted to on save
    pub save_endpoint: Option<String>,
    /// Seed the type registry with the built-in templates at construction
    pub seed_builtins: bool,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_save_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.save_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_builtins(mut self) -> Self {
        self.seed_builtins = true;
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
