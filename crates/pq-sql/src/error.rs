//! Error types for pq-sql

use pq_core::{PolyType, TimeUnit};
use thiserror::Error;

/// SQL emission and validation errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Time unit with no truncation token in the dialect (S003)
    #[error("[S003] Time unit {unit} cannot be truncated in {dialect}")]
    UnsupportedTimeUnit { unit: TimeUnit, dialect: &'static str },

    /// Type with no cast target in the dialect (S004)
    #[error("[S004] Cannot cast to {poly_type} in {dialect}")]
    UnsupportedCastTarget {
        poly_type: PolyType,
        dialect: &'static str,
    },

    /// Construct the dialect lacks (S005)
    #[error("[S005] {feature} not supported by {dialect}")]
    UnsupportedFeature {
        feature: String,
        dialect: &'static str,
    },

    /// Malformed syntax tree handed to the writer (S006)
    #[error("[S006] Invalid SQL node: {0}")]
    InvalidNode(String),
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
