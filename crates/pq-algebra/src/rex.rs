//! Row expressions: typed scalar expressions over an operator's input row

use pq_core::{FloatBitWidth, PolyType, TimeUnit, Value};
use serde::{Deserialize, Serialize};

/// Closed set of row-expression operators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RexOp {
    /// Equality (=)
    Equals,
    /// Inequality (<>)
    NotEquals,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Logical AND, n-ary
    And,
    /// Logical OR, n-ary
    Or,
    /// Logical NOT
    Not,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// `x IN (v1, v2, ...)`: first operand is the tested value
    In,
    /// LIKE pattern match
    Like,
    /// `x BETWEEN low AND high`
    Between,
    /// Addition (+)
    Plus,
    /// Subtraction (-)
    Minus,
    /// Multiplication (*)
    Times,
    /// Division (/)
    Divide,
    /// Explicit CAST to the given type
    Cast(PolyType),
    /// FLOOR, optionally truncating a temporal value to a unit
    Floor(Option<TimeUnit>),
    /// CEIL, optionally rounding a temporal value up to a unit
    Ceil(Option<TimeUnit>),
    /// Vector distance: (column, query vector, metric name[, weights])
    Distance,
    /// Any other scalar function, with its declared return type
    Function { name: String, return_type: PolyType },
}

impl RexOp {
    /// Operator name as it appears in plan explain output
    pub fn name(&self) -> &str {
        match self {
            RexOp::Equals => "=",
            RexOp::NotEquals => "<>",
            RexOp::LessThan => "<",
            RexOp::LessThanOrEqual => "<=",
            RexOp::GreaterThan => ">",
            RexOp::GreaterThanOrEqual => ">=",
            RexOp::And => "AND",
            RexOp::Or => "OR",
            RexOp::Not => "NOT",
            RexOp::IsNull => "IS NULL",
            RexOp::IsNotNull => "IS NOT NULL",
            RexOp::In => "IN",
            RexOp::Like => "LIKE",
            RexOp::Between => "BETWEEN",
            RexOp::Plus => "+",
            RexOp::Minus => "-",
            RexOp::Times => "*",
            RexOp::Divide => "/",
            RexOp::Cast(_) => "CAST",
            RexOp::Floor(_) => "FLOOR",
            RexOp::Ceil(_) => "CEIL",
            RexOp::Distance => "DISTANCE",
            RexOp::Function { name, .. } => name,
        }
    }

    /// Check if this is a binary comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            RexOp::Equals
                | RexOp::NotEquals
                | RexOp::LessThan
                | RexOp::LessThanOrEqual
                | RexOp::GreaterThan
                | RexOp::GreaterThanOrEqual
        )
    }

    /// Check if this operator always yields BOOLEAN
    pub fn is_boolean(&self) -> bool {
        self.is_comparison()
            || matches!(
                self,
                RexOp::And
                    | RexOp::Or
                    | RexOp::Not
                    | RexOp::IsNull
                    | RexOp::IsNotNull
                    | RexOp::In
                    | RexOp::Like
                    | RexOp::Between
            )
    }

    /// Comparison with its operands swapped (`a < b` is `b > a`)
    pub fn mirror(&self) -> Option<RexOp> {
        match self {
            RexOp::Equals => Some(RexOp::Equals),
            RexOp::NotEquals => Some(RexOp::NotEquals),
            RexOp::LessThan => Some(RexOp::GreaterThan),
            RexOp::LessThanOrEqual => Some(RexOp::GreaterThanOrEqual),
            RexOp::GreaterThan => Some(RexOp::LessThan),
            RexOp::GreaterThanOrEqual => Some(RexOp::LessThanOrEqual),
            _ => None,
        }
    }
}

impl std::fmt::Display for RexOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed row expression. Every node carries its resolved type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RexNode {
    /// Reference to field `index` of the input row
    InputRef {
        index: usize,
        resolved_type: PolyType,
    },

    /// Constant value
    Literal {
        value: Value,
        resolved_type: PolyType,
    },

    /// Operator application
    Call {
        op: RexOp,
        operands: Vec<RexNode>,
        resolved_type: PolyType,
    },
}

impl RexNode {
    /// Reference to an input field
    pub fn input_ref(index: usize, resolved_type: PolyType) -> Self {
        RexNode::InputRef {
            index,
            resolved_type,
        }
    }

    /// Literal typed by its value's natural type
    pub fn literal(value: Value) -> Self {
        let resolved_type = value.poly_type();
        RexNode::Literal {
            value,
            resolved_type,
        }
    }

    /// Literal with an explicit type (e.g. a typed NULL or VARCHAR(10))
    pub fn typed_literal(value: Value, resolved_type: PolyType) -> Self {
        RexNode::Literal {
            value,
            resolved_type,
        }
    }

    /// Operator call with its result type inferred from the operands
    pub fn call(op: RexOp, operands: Vec<RexNode>) -> Self {
        let resolved_type = infer_call_type(&op, &operands);
        RexNode::Call {
            op,
            operands,
            resolved_type,
        }
    }

    /// CAST(expr AS target)
    pub fn cast(expr: RexNode, target: PolyType) -> Self {
        RexNode::Call {
            op: RexOp::Cast(target.clone()),
            operands: vec![expr],
            resolved_type: target,
        }
    }

    /// Get the resolved type of this expression
    pub fn resolved_type(&self) -> &PolyType {
        match self {
            RexNode::InputRef { resolved_type, .. } => resolved_type,
            RexNode::Literal { resolved_type, .. } => resolved_type,
            RexNode::Call { resolved_type, .. } => resolved_type,
        }
    }

    /// Operator of a call, `None` for leaves
    pub fn op(&self) -> Option<&RexOp> {
        match self {
            RexNode::Call { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Operands of a call, empty for leaves
    pub fn operands(&self) -> &[RexNode] {
        match self {
            RexNode::Call { operands, .. } => operands,
            _ => &[],
        }
    }

    /// Literal value, if this is a literal
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            RexNode::Literal { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Field index, if this is an input reference
    pub fn as_input_ref(&self) -> Option<usize> {
        match self {
            RexNode::InputRef { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Every input field referenced by this expression, in encounter order
    pub fn input_refs(&self) -> Vec<usize> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs(&self, refs: &mut Vec<usize>) {
        match self {
            RexNode::InputRef { index, .. } => refs.push(*index),
            RexNode::Literal { .. } => {}
            RexNode::Call { operands, .. } => {
                for operand in operands {
                    operand.collect_refs(refs);
                }
            }
        }
    }

    /// First input reference not below `width`, if any
    pub fn find_invalid_ref(&self, width: usize) -> Option<usize> {
        self.input_refs().into_iter().find(|index| *index >= width)
    }
}

impl std::fmt::Display for RexNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RexNode::InputRef { index, .. } => write!(f, "${index}"),
            RexNode::Literal { value, .. } => write!(f, "{value}"),
            RexNode::Call {
                op: RexOp::Cast(target),
                operands,
                ..
            } => match operands.first() {
                Some(expr) => write!(f, "CAST({expr}):{target}"),
                None => write!(f, "CAST():{target}"),
            },
            RexNode::Call { op, operands, .. } => {
                write!(f, "{op}(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{operand}")?;
                }
                match op {
                    RexOp::Floor(Some(unit)) | RexOp::Ceil(Some(unit)) => write!(f, " TO {unit})"),
                    _ => write!(f, ")"),
                }
            }
        }
    }
}

fn infer_call_type(op: &RexOp, operands: &[RexNode]) -> PolyType {
    if op.is_boolean() {
        return PolyType::Boolean;
    }
    match op {
        RexOp::Cast(target) => target.clone(),
        RexOp::Function { return_type, .. } => return_type.clone(),
        RexOp::Distance => PolyType::DOUBLE,
        RexOp::Plus | RexOp::Minus | RexOp::Times | RexOp::Divide => operands
            .iter()
            .map(RexNode::resolved_type)
            .fold(None, |acc: Option<PolyType>, ty| match acc {
                None => Some(ty.clone()),
                Some(prev) => Some(wider_numeric(&prev, ty)),
            })
            .unwrap_or(PolyType::Null),
        _ => operands
            .first()
            .map(|operand| operand.resolved_type().clone())
            .unwrap_or(PolyType::Null),
    }
}

/// Result type of arithmetic over two operand types
fn wider_numeric(left: &PolyType, right: &PolyType) -> PolyType {
    match (left, right) {
        (PolyType::Null, other) | (other, PolyType::Null) => other.clone(),
        (PolyType::Float { bits: a }, PolyType::Float { bits: b }) => PolyType::Float {
            bits: (*a).max(*b),
        },
        (PolyType::Float { .. }, _) | (_, PolyType::Float { .. }) => PolyType::Float {
            bits: FloatBitWidth::F64,
        },
        (PolyType::Decimal { .. }, _) => left.clone(),
        (_, PolyType::Decimal { .. }) => right.clone(),
        (PolyType::Integer { bits: a }, PolyType::Integer { bits: b }) => PolyType::Integer {
            bits: (*a).max(*b),
        },
        // temporal and interval arithmetic keep the left operand's type
        _ => left.clone(),
    }
}

#[cfg(test)]
#[path = "rex_test.rs"]
mod tests;
