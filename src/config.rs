use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "genreq";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "GENREQ_LOG";

/// URL parameter carrying the compact JSON document
pub const DATA_PARAM: &str = "data";
/// URL parameter carrying a password-encrypted compact document
pub const ENCRYPTED_PARAM: &str = "encrypted";

/// Default tracing filter when `GENREQ_LOG` is unset
pub fn default_log_filter() -> &'static str {
    "genreq_lib=info,genreq=info,warn"
}

/// Sharing behaviour that differs between deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareConfig {
    /// Panel id -> category, consulted only when an imported link names no
    /// category at all. First matching panel (in link order) wins.
    pub category_inference: BTreeMap<String, String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        let mut category_inference = BTreeMap::new();
        category_inference.insert("nephronophthise".to_string(), "nephrology".to_string());
        Self { category_inference }
    }
}

impl ShareConfig {
    /// No inference at all; links without a category stay uncategorized.
    pub fn without_inference() -> Self {
        Self {
            category_inference: BTreeMap::new(),
        }
    }

    /// Category implied by the first panel that has a mapping.
    pub fn infer_category(&self, panels: &[String]) -> Option<&str> {
        panels
            .iter()
            .find_map(|panel| self.category_inference.get(panel.trim()))
            .map(String::as_str)
    }

    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), "Share config loaded");
        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
