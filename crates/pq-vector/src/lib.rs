//! pq-vector - predicate and kNN requests for vector stores
//!
//! Lowers boolean predicate trees into the store's two-slot wire form and
//! compiles Vector-convention plans into complete requests, including the
//! nearest-neighbour search taken from a DISTANCE projection.

pub mod error;
pub mod lower;
pub mod query;
pub mod wire;

pub use error::{VectorError, VectorResult};
pub use lower::lower_predicate;
pub use query::QueryEmitter;
pub use wire::{
    AtomicLiteralBooleanPredicate, ComparisonOperator, CompoundBooleanPredicate, Data, Distance,
    Knn, KnnBuilder, LogicalOperator, PredicateNode, Query, VectorData, Where,
};
