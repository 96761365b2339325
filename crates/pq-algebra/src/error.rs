//! Error types for pq-algebra

use pq_core::PolyType;
use thiserror::Error;

/// Relational IR error type
///
/// A001 and A008 are unsupported-construct errors: the plan cannot be
/// compiled for the requested convention. The rest are invariant violations
/// raised when a caller builds or copies a node inconsistently.
#[derive(Error, Debug)]
pub enum AlgebraError {
    /// A001: Aggregate configuration unsupported by the node's convention
    #[error("[A001] Unsupported aggregate for convention '{convention}': {reason}")]
    UnsupportedAggregate { convention: String, reason: String },

    /// A002: Wrong number of inputs for an operator
    #[error("[A002] {op} expects {expected} input(s), got {actual}")]
    InputArity {
        op: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// A003: Input convention differs from the parent's
    #[error("[A003] Convention mismatch: {op} is '{parent}' but its input is '{input}'")]
    ConventionMismatch {
        op: &'static str,
        parent: String,
        input: String,
    },

    /// A004: Copy requested with a payload of another operator kind
    #[error("[A004] Cannot copy {expected} with a {actual} payload")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A005: Field index outside the input row type
    #[error("[A005] {op} references field ${index} but input has {width} field(s)")]
    ColumnOutOfRange {
        op: &'static str,
        index: usize,
        width: usize,
    },

    /// A006: Condition is not boolean
    #[error("[A006] {op} condition must be BOOLEAN, found {found}")]
    InvalidCondition { op: &'static str, found: PolyType },

    /// A007: Inputs with incompatible row types
    #[error("[A007] Row type mismatch in {op}: {message}")]
    SchemaMismatch { op: &'static str, message: String },

    /// A008: Expression cannot be expressed as a boolean predicate tree
    #[error("[A008] Unsupported predicate expression: {expr}")]
    UnsupportedPredicate { expr: String },

    /// A009: Grouping sets inconsistent with the group set
    #[error("[A009] Invalid grouping sets: {message}")]
    InvalidGroupingSet { message: String },

    /// A010: Aggregate call with wrong argument count
    #[error("[A010] Aggregate {function} expects {expected} argument(s), got {actual}")]
    InvalidAggregateCall {
        function: String,
        expected: &'static str,
        actual: usize,
    },
}

/// Result type alias for AlgebraError
pub type AlgebraResult<T> = Result<T, AlgebraError>;
