//! Application configuration
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use atlas_feed::FeedConfig;
use atlas_render::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Read when the config file carries no map token
pub const TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub feed: FeedConfig,
    pub viewport: ViewportConfig,
}

impl AtlasConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading config from {:?}", path);

        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// File config when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Fill the map token from the environment if it is still unset
    pub fn with_env_token(mut self) -> Self {
        if self.viewport.access_token.is_none() {
            self.viewport.access_token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        }
        self
    }
}
