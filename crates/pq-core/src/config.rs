//! Compiler configuration
//!
//! Plain values handed to the emitters by the embedding application. Every
//! field has a default, so an empty document is a valid configuration.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cardinality bound for nearest-neighbor requests.
///
/// The vector store needs a concrete bound; its maximum integer exhausts the
/// store's memory, so a large finite value is used instead.
pub const DEFAULT_KNN_LIMIT: u32 = 1_000_000;

/// Top-level compiler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// SQL emission settings
    #[serde(default)]
    pub sql: SqlConfig,

    /// Pipeline-stage emission settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Predicate/kNN emission settings
    #[serde(default)]
    pub vector: VectorConfig,
}

/// SQL emission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlConfig {
    /// Prefix for aliases generated for sub-query FROM items
    #[serde(default = "default_from_alias_prefix")]
    pub from_alias_prefix: String,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            from_alias_prefix: default_from_alias_prefix(),
        }
    }
}

fn default_from_alias_prefix() -> String {
    "t".to_string()
}

/// Pipeline-stage emission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    /// Compile SINGLE_VALUE as a summation. When disabled the aggregate is
    /// rejected instead.
    #[serde(default = "default_true")]
    pub single_value_as_sum: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            single_value_as_sum: true,
        }
    }
}

/// Predicate/kNN emission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorConfig {
    /// Result cardinality bound used when the plan supplies none
    #[serde(default = "default_knn_limit")]
    pub default_knn_limit: u32,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            default_knn_limit: DEFAULT_KNN_LIMIT,
        }
    }
}

fn default_knn_limit() -> u32 {
    DEFAULT_KNN_LIMIT
}

impl CompilerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        // an empty document deserializes to unit, not to an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: CompilerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.vector.default_knn_limit == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "vector.default_knn_limit must be greater than zero".to_string(),
            });
        }
        if self.sql.from_alias_prefix.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "sql.from_alias_prefix cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
