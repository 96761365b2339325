//! `$match` documents from boolean predicate trees

use crate::encode::{encode_value, like_to_regex};
use crate::error::{DocumentError, DocumentResult};
use pq_algebra::{AtomicPredicate, ComparisonOp, LogicalOp, Predicate};
use pq_core::{coerce_literal, Value};
use serde_json::{json, Map, Value as JsonValue};

/// Build the filter document of a `$match` stage
pub fn match_document(predicate: &Predicate) -> DocumentResult<JsonValue> {
    match predicate {
        Predicate::Atomic(atomic) => atomic_document(atomic),
        Predicate::Compound(compound) => {
            let key = match compound.op {
                LogicalOp::And => "$and",
                LogicalOp::Or => "$or",
            };
            let left = match_document(&compound.left)?;
            let right = match_document(&compound.right)?;
            Ok(json!({ key: [left, right] }))
        }
    }
}

fn atomic_document(atomic: &AtomicPredicate) -> DocumentResult<JsonValue> {
    let values = coerce_literals(atomic)?;
    let operand = |i: usize| -> DocumentResult<JsonValue> {
        values
            .get(i)
            .map(encode_value)
            .unwrap_or_else(|| Err(malformed(atomic)))
    };

    let condition = match (atomic.op, atomic.negated) {
        (ComparisonOp::Equal, false) => json!({ "$eq": operand(0)? }),
        (ComparisonOp::Equal, true) => json!({ "$ne": operand(0)? }),
        (ComparisonOp::In, negated) => {
            let list = values
                .iter()
                .map(encode_value)
                .collect::<DocumentResult<Vec<_>>>()?;
            let key = if negated { "$nin" } else { "$in" };
            json!({ key: list })
        }
        (ComparisonOp::IsNull, false) | (ComparisonOp::IsNotNull, true) => {
            json!({ "$eq": null })
        }
        (ComparisonOp::IsNull, true) | (ComparisonOp::IsNotNull, false) => {
            json!({ "$ne": null })
        }
        (op, negated) => {
            let positive = match op {
                ComparisonOp::Greater => json!({ "$gt": operand(0)? }),
                ComparisonOp::Less => json!({ "$lt": operand(0)? }),
                ComparisonOp::GreaterOrEqual => json!({ "$gte": operand(0)? }),
                ComparisonOp::LessOrEqual => json!({ "$lte": operand(0)? }),
                ComparisonOp::Between => {
                    json!({ "$gte": operand(0)?, "$lte": operand(1)? })
                }
                ComparisonOp::Like => match values.first() {
                    Some(Value::String(pattern)) => json!({ "$regex": like_to_regex(pattern) }),
                    _ => return Err(malformed(atomic)),
                },
                _ => return Err(malformed(atomic)),
            };
            if negated {
                json!({ "$not": positive })
            } else {
                positive
            }
        }
    };

    let mut document = Map::new();
    document.insert(atomic.attribute.clone(), condition);
    Ok(JsonValue::Object(document))
}

fn coerce_literals(atomic: &AtomicPredicate) -> DocumentResult<Vec<Value>> {
    atomic
        .values
        .iter()
        .map(|value| Ok(coerce_literal(value, &atomic.attribute_type)?))
        .collect()
}

fn malformed(atomic: &AtomicPredicate) -> DocumentError {
    DocumentError::UnsupportedExpression {
        expr: Predicate::Atomic(atomic.clone()).to_string(),
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
