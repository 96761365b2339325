//! Boolean predicate trees lowered from Filter conditions
//!
//! Native query emitters that cannot consume arbitrary row expressions work
//! on this restricted form instead: atomic comparisons between one attribute
//! and literal values, joined by binary AND/OR nodes.

use crate::error::{AlgebraError, AlgebraResult};
use crate::rex::{RexNode, RexOp};
use crate::schema::RelSchema;
use pq_core::{PolyType, Value};
use serde::{Deserialize, Serialize};

/// Comparison operator of an atomic predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equal,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    In,
    Between,
    IsNull,
    IsNotNull,
    Like,
}

impl std::fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::Greater => ">",
            ComparisonOp::Less => "<",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::In => "IN",
            ComparisonOp::Between => "BETWEEN",
            ComparisonOp::IsNull => "IS NULL",
            ComparisonOp::IsNotNull => "IS NOT NULL",
            ComparisonOp::Like => "LIKE",
        };
        f.write_str(s)
    }
}

/// Logical operator of a compound predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    fn dual(self) -> LogicalOp {
        match self {
            LogicalOp::And => LogicalOp::Or,
            LogicalOp::Or => LogicalOp::And,
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// `attribute op values`, optionally negated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicPredicate {
    pub attribute: String,
    /// Type of the attribute, used to coerce `values` for the target store
    pub attribute_type: PolyType,
    pub op: ComparisonOp,
    pub negated: bool,
    /// Literal operands: one for comparisons, two for BETWEEN, any number
    /// for IN, none for the null checks
    pub values: Vec<Value>,
}

/// `left op right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundPredicate {
    pub op: LogicalOp,
    pub left: Box<Predicate>,
    pub right: Box<Predicate>,
}

/// Boolean predicate tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Atomic(AtomicPredicate),
    Compound(CompoundPredicate),
}

impl Predicate {
    /// Binary compound node
    pub fn compound(op: LogicalOp, left: Predicate, right: Predicate) -> Predicate {
        Predicate::Compound(CompoundPredicate {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Number of compound levels above the deepest leaf (0 for a leaf)
    pub fn depth(&self) -> usize {
        match self {
            Predicate::Atomic(_) => 0,
            Predicate::Compound(c) => 1 + c.left.depth().max(c.right.depth()),
        }
    }

    /// Logical negation; compound nodes are pushed down with De Morgan's laws
    pub fn negate(self) -> Predicate {
        match self {
            Predicate::Atomic(atomic) => Predicate::Atomic(AtomicPredicate {
                negated: !atomic.negated,
                ..atomic
            }),
            Predicate::Compound(c) => {
                Predicate::compound(c.op.dual(), c.left.negate(), c.right.negate())
            }
        }
    }

    /// Lower a boolean row expression over `schema` into a predicate tree.
    ///
    /// N-ary AND/OR are folded left-deep. Comparisons must have an input
    /// reference on one side and a literal on the other; a literal on the
    /// left is mirrored onto the right.
    pub fn from_condition(condition: &RexNode, schema: &RelSchema) -> AlgebraResult<Predicate> {
        let op = match condition {
            RexNode::Call { op, .. } => op,
            _ => return Err(unsupported(condition)),
        };
        let operands = condition.operands();

        match op {
            RexOp::And | RexOp::Or => {
                let logical = if *op == RexOp::And {
                    LogicalOp::And
                } else {
                    LogicalOp::Or
                };
                let mut lowered = operands
                    .iter()
                    .map(|operand| Predicate::from_condition(operand, schema));
                let first = lowered.next().ok_or_else(|| unsupported(condition))??;
                lowered.try_fold(first, |acc, next| {
                    Ok(Predicate::compound(logical, acc, next?))
                })
            }
            RexOp::Not => match operands {
                [inner] => Ok(Predicate::from_condition(inner, schema)?.negate()),
                _ => Err(unsupported(condition)),
            },
            RexOp::IsNull | RexOp::IsNotNull => match operands {
                [field] => {
                    let cmp = if *op == RexOp::IsNull {
                        ComparisonOp::IsNull
                    } else {
                        ComparisonOp::IsNotNull
                    };
                    atomic(field, schema, cmp, false, Vec::new(), condition)
                }
                _ => Err(unsupported(condition)),
            },
            RexOp::In | RexOp::Between | RexOp::Like => {
                let (field, rest) = operands
                    .split_first()
                    .ok_or_else(|| unsupported(condition))?;
                let values = literal_values(rest, condition)?;
                let (cmp, expected) = match op {
                    RexOp::In => (ComparisonOp::In, None),
                    RexOp::Between => (ComparisonOp::Between, Some(2)),
                    _ => (ComparisonOp::Like, Some(1)),
                };
                if values.is_empty() || expected.is_some_and(|n| n != values.len()) {
                    return Err(unsupported(condition));
                }
                atomic(field, schema, cmp, false, values, condition)
            }
            op if op.is_comparison() => {
                let (field, literal, op) = match operands {
                    [left @ RexNode::InputRef { .. }, right] => (left, right, op.clone()),
                    [left, right @ RexNode::InputRef { .. }] => {
                        let mirrored = op.mirror().ok_or_else(|| unsupported(condition))?;
                        (right, left, mirrored)
                    }
                    _ => return Err(unsupported(condition)),
                };
                let values = literal_values(std::slice::from_ref(literal), condition)?;
                let (cmp, negated) = match op {
                    RexOp::Equals => (ComparisonOp::Equal, false),
                    RexOp::NotEquals => (ComparisonOp::Equal, true),
                    RexOp::LessThan => (ComparisonOp::Less, false),
                    RexOp::LessThanOrEqual => (ComparisonOp::LessOrEqual, false),
                    RexOp::GreaterThan => (ComparisonOp::Greater, false),
                    RexOp::GreaterThanOrEqual => (ComparisonOp::GreaterOrEqual, false),
                    _ => return Err(unsupported(condition)),
                };
                atomic(field, schema, cmp, negated, values, condition)
            }
            _ => Err(unsupported(condition)),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Atomic(a) => {
                if a.negated {
                    write!(f, "NOT ")?;
                }
                write!(f, "{} {}", a.attribute, a.op)?;
                for (i, value) in a.values.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{value}")?;
                }
                Ok(())
            }
            Predicate::Compound(c) => write!(f, "({} {} {})", c.left, c.op, c.right),
        }
    }
}

fn unsupported(expr: &RexNode) -> AlgebraError {
    AlgebraError::UnsupportedPredicate {
        expr: expr.to_string(),
    }
}

fn literal_values(operands: &[RexNode], condition: &RexNode) -> AlgebraResult<Vec<Value>> {
    operands
        .iter()
        .map(|operand| {
            operand
                .as_literal()
                .cloned()
                .ok_or_else(|| unsupported(condition))
        })
        .collect()
}

fn atomic(
    field: &RexNode,
    schema: &RelSchema,
    op: ComparisonOp,
    negated: bool,
    values: Vec<Value>,
    condition: &RexNode,
) -> AlgebraResult<Predicate> {
    let index = field
        .as_input_ref()
        .ok_or_else(|| unsupported(condition))?;
    let column = schema
        .column(index)
        .ok_or(AlgebraError::ColumnOutOfRange {
            op: "Filter",
            index,
            width: schema.len(),
        })?;
    Ok(Predicate::Atomic(AtomicPredicate {
        attribute: column.name.clone(),
        attribute_type: column.poly_type.clone(),
        op,
        negated,
        values,
    }))
}

#[cfg(test)]
#[path = "predicate_test.rs"]
mod tests;
