//! Error types for pq-vector

use pq_algebra::AlgebraError;
use pq_core::CoreError;
use thiserror::Error;

/// Vector request emission error type
#[derive(Error, Debug)]
pub enum VectorError {
    /// V001: Operator with no vector request equivalent
    #[error("[V001] Operator {op} cannot be compiled into a vector request")]
    UnsupportedOperator { op: &'static str },

    /// V002: Distance metric name not recognized
    #[error("[V002] Unknown distance metric: {name}")]
    UnknownDistance { name: String },

    /// V003: Literal with no wire representation
    #[error("[V003] Literal {value} cannot be sent to the vector store: {reason}")]
    UnsupportedLiteral { value: String, reason: &'static str },

    /// V004: Projection expression other than a field or a DISTANCE call
    #[error("[V004] Expression {expr} cannot be projected by the vector store")]
    UnsupportedExpression { expr: String },

    /// V005: Malformed DISTANCE call
    #[error("[V005] Invalid kNN request: {message}")]
    InvalidKnn { message: String },

    /// V006: Sort the store cannot honour
    #[error("[V006] Cannot sort on field '{field}'; only ascending distance order is supported")]
    UnsupportedSort { field: String },

    /// V007: Plan tagged for another store family
    #[error("[V007] Plan has convention '{convention}', expected 'VECTOR'")]
    WrongConvention { convention: String },

    /// V008: Relational IR error propagation
    #[error("[V008] Algebra error: {0}")]
    Algebra(#[from] AlgebraError),

    /// V009: Core error propagation
    #[error("[V009] Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for VectorError
pub type VectorResult<T> = Result<T, VectorError>;
