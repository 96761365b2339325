//! Error types for pq-core

use crate::types::PolyType;
use crate::value::Value;
use thiserror::Error;

/// Core error type for polyquery
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Source type has no populated row in the coercion matrix
    #[error("[C001] Cannot convert from type: {from} (requested target {to})")]
    UnsupportedSourceType { from: PolyType, to: PolyType },

    /// C002: Source type is supported but the target cell is empty
    #[error("[C002] Cannot convert {from} to type: {to}")]
    UnsupportedConversion { from: PolyType, to: PolyType },

    /// C003: The value does not belong to its declared source type
    #[error("[C003] Value {value} does not match declared type {declared}")]
    ValueTypeMismatch { declared: PolyType, value: Value },

    /// C004: Configuration file not found
    #[error("[C004] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C005: Invalid configuration value
    #[error("[C005] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C006: YAML parse error
    #[error("[C006] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C007: IO error with file path context
    #[error("[C007] IO error on '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
