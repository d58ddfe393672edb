//! TOML-driven engine configuration.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! ```toml
//! default_radius_km = 3.0
//! default_sort = "distance"
//! currency = "PEN"
//!
//! [search]
//! suggestion_limit = 3
//! min_similarity = 0.8
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compare::DEFAULT_RADIUS_KM;
use crate::models::{SortKey, DEFAULT_CURRENCY};
use crate::search::{DEFAULT_MIN_SIMILARITY, DEFAULT_SUGGESTION_LIMIT};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Engine defaults applied by callers that don't pass explicit values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Radius used when the caller gives none
    pub default_radius_km: f64,
    /// Ordering used when the caller gives none
    pub default_sort: SortKey,
    /// Currency assumed for display
    pub currency: String,
    pub search: SearchConfig,
}

/// Suggestion tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub suggestion_limit: usize,
    pub min_similarity: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            default_sort: SortKey::Price,
            currency: DEFAULT_CURRENCY.to_string(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl EngineConfig {
    /// Parse `s` as TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_radius_km.is_finite() || self.default_radius_km < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_radius_km must be a non-negative number, got {}",
                self.default_radius_km
            )));
        }
        if !(0.0..=1.0).contains(&self.search.min_similarity) {
            return Err(ConfigError::Invalid(format!(
                "search.min_similarity must be within 0.0..=1.0, got {}",
                self.search.min_similarity
            )));
        }
        Ok(())
    }
}
