//! Error types for pq-document

use pq_algebra::AlgebraError;
use pq_core::CoreError;
use thiserror::Error;

/// Pipeline emission error type
#[derive(Error, Debug)]
pub enum DocumentError {
    /// D001: Operator with no pipeline stage
    #[error("[D001] Operator {op} cannot be compiled into a pipeline stage")]
    UnsupportedOperator { op: &'static str },

    /// D002: Aggregate function with no pipeline accumulator
    #[error("[D002] Aggregate function {function} has no pipeline accumulator")]
    UnsupportedAggregate { function: String },

    /// D003: Row expression with no pipeline equivalent
    #[error("[D003] Expression {expr} cannot be compiled into a pipeline expression")]
    UnsupportedExpression { expr: String },

    /// D004: Literal with no document encoding
    #[error("[D004] Literal {value} has no document encoding")]
    InvalidLiteral { value: String },

    /// D005: Plan tagged for another store family
    #[error("[D005] Plan has convention '{convention}', expected 'DOCUMENT'")]
    WrongConvention { convention: String },

    /// D006: Relational IR error propagation
    #[error("[D006] Algebra error: {0}")]
    Algebra(#[from] AlgebraError),

    /// D007: Core error propagation
    #[error("[D007] Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type alias for DocumentError
pub type DocumentResult<T> = Result<T, DocumentError>;
