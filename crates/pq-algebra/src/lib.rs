//! pq-algebra - relational IR for the polyquery store compilers
//!
//! Immutable operator trees tagged with a target convention, typed row
//! expressions, aggregate descriptors, and the boolean predicate trees
//! lowered from filter conditions.

pub mod aggregate;
pub mod convention;
pub mod error;
pub mod predicate;
pub mod relnode;
pub mod rex;
pub mod schema;

pub use aggregate::{AggFunction, AggregateCall, GroupType};
pub use convention::Convention;
pub use error::{AlgebraError, AlgebraResult};
pub use predicate::{AtomicPredicate, ComparisonOp, CompoundPredicate, LogicalOp, Predicate};
pub use relnode::{Direction, FieldCollation, JoinType, NullDirection, RelNode, RelOp};
pub use rex::{RexNode, RexOp};
pub use schema::{RelSchema, TypedColumn};
