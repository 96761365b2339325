//! Lowering of boolean predicate trees into wire predicates

use crate::error::VectorResult;
use crate::wire::{
    AtomicLiteralBooleanPredicate, ComparisonOperator, CompoundBooleanPredicate, Data,
    LogicalOperator, PredicateNode,
};
use pq_algebra::{AtomicPredicate, ComparisonOp, LogicalOp, Predicate};
use pq_core::coerce_literal;

/// Lower a predicate tree, routing every child of a compound node into the
/// slot of its own kind
pub fn lower_predicate(predicate: &Predicate) -> VectorResult<PredicateNode> {
    match predicate {
        Predicate::Atomic(atomic) => Ok(PredicateNode::Atomic(lower_atomic(atomic)?)),
        Predicate::Compound(compound) => {
            let op = match compound.op {
                LogicalOp::And => LogicalOperator::And,
                LogicalOp::Or => LogicalOperator::Or,
            };
            let left = lower_predicate(&compound.left)?;
            let right = lower_predicate(&compound.right)?;
            Ok(PredicateNode::Compound(CompoundBooleanPredicate::new(
                op, left, right,
            )))
        }
    }
}

fn lower_atomic(atomic: &AtomicPredicate) -> VectorResult<AtomicLiteralBooleanPredicate> {
    let data = atomic
        .values
        .iter()
        .map(|value| Data::from_value(&coerce_literal(value, &atomic.attribute_type)?))
        .collect::<VectorResult<Vec<_>>>()?;
    Ok(AtomicLiteralBooleanPredicate {
        attribute: atomic.attribute.clone(),
        not: atomic.negated,
        op: comparison_operator(atomic.op),
        data,
    })
}

fn comparison_operator(op: ComparisonOp) -> ComparisonOperator {
    match op {
        ComparisonOp::Equal => ComparisonOperator::Equal,
        ComparisonOp::Greater => ComparisonOperator::Greater,
        ComparisonOp::Less => ComparisonOperator::Less,
        ComparisonOp::GreaterOrEqual => ComparisonOperator::Gequal,
        ComparisonOp::LessOrEqual => ComparisonOperator::Lequal,
        ComparisonOp::In => ComparisonOperator::In,
        ComparisonOp::Between => ComparisonOperator::Between,
        ComparisonOp::IsNull => ComparisonOperator::Isnull,
        ComparisonOp::IsNotNull => ComparisonOperator::Isnotnull,
        ComparisonOp::Like => ComparisonOperator::Like,
    }
}

#[cfg(test)]
#[path = "lower_test.rs"]
mod tests;
