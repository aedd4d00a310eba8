use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const IMPORTED_CATEGORY: &str = "imported";

/// Settings for turning statement rows into group expenses.
///
/// ```toml
/// category = "imported"
/// preselect = true
/// auto_split = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Category given to every imported expense.
    pub category: String,
    /// Whether parsed transactions start out selected.
    pub preselect: bool,
    /// Split each imported expense evenly across the group instead of leaving
    /// shares for the user to fill in.
    pub auto_split: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            category: IMPORTED_CATEGORY.to_string(),
            preselect: true,
            auto_split: false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse import config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Import category must not be empty")]
    EmptyCategory,
}

impl ImportConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: ImportConfig = toml::from_str(toml_content)?;
        if config.category.trim().is_empty() {
            return Err(ConfigError::EmptyCategory);
        }
        Ok(config)
    }
}
