//! Vector-store request structures
//!
//! These mirror the store's wire messages one to one, so an external
//! transport can encode them directly. Atomic and compound predicates are
//! distinct message types; a compound node has one atomic slot and one
//! compound slot per side and exactly one of each pair is populated.

use crate::error::{VectorError, VectorResult};
use pq_core::{Value, VectorConfig};
use serde::Serialize;
use std::str::FromStr;

/// Scalar or vector literal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Data {
    BooleanData(bool),
    IntData(i32),
    LongData(i64),
    FloatData(f32),
    DoubleData(f64),
    StringData(String),
    NullData,
    VectorData(VectorData),
}

/// Homogeneous vector literal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorData {
    BoolVector(Vec<bool>),
    IntVector(Vec<i32>),
    LongVector(Vec<i64>),
    FloatVector(Vec<f32>),
    DoubleVector(Vec<f64>),
}

impl Data {
    /// Encode a runtime value. Narrow integers travel as `int_data`.
    pub fn from_value(value: &Value) -> VectorResult<Data> {
        let data = match value {
            Value::Null => Data::NullData,
            Value::Boolean(b) => Data::BooleanData(*b),
            Value::TinyInt(v) => Data::IntData(i32::from(*v)),
            Value::SmallInt(v) => Data::IntData(i32::from(*v)),
            Value::Integer(v) => Data::IntData(*v),
            Value::BigInt(v) => Data::LongData(*v),
            Value::Real(v) => Data::FloatData(*v),
            Value::Double(v) => Data::DoubleData(*v),
            Value::String(s) => Data::StringData(s.clone()),
            Value::Array(items) => Data::VectorData(VectorData::from_values(items)?),
            Value::Decimal(_) | Value::Date(_) | Value::Time(_) | Value::Timestamp(_) => {
                return Err(VectorError::UnsupportedLiteral {
                    value: value.to_string(),
                    reason: "no wire type",
                })
            }
        };
        Ok(data)
    }

    /// Decode back into a runtime value
    pub fn to_value(&self) -> Value {
        match self {
            Data::BooleanData(b) => Value::Boolean(*b),
            Data::IntData(v) => Value::Integer(*v),
            Data::LongData(v) => Value::BigInt(*v),
            Data::FloatData(v) => Value::Real(*v),
            Data::DoubleData(v) => Value::Double(*v),
            Data::StringData(s) => Value::String(s.clone()),
            Data::NullData => Value::Null,
            Data::VectorData(vector) => vector.to_value(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::BooleanData(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Data::IntData(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Data::LongData(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Data::FloatData(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Data::DoubleData(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::StringData(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::NullData)
    }

    pub fn as_vector(&self) -> Option<&VectorData> {
        match self {
            Data::VectorData(v) => Some(v),
            _ => None,
        }
    }
}

impl VectorData {
    /// Encode an array literal; the first element decides the vector kind
    /// and every other element must have the same kind.
    pub fn from_values(items: &[Value]) -> VectorResult<VectorData> {
        fn collect<T>(
            items: &[Value],
            pick: impl Fn(&Value) -> Option<T>,
        ) -> VectorResult<Vec<T>> {
            items
                .iter()
                .map(|item| {
                    pick(item).ok_or_else(|| VectorError::UnsupportedLiteral {
                        value: item.to_string(),
                        reason: "vector elements must share one numeric or boolean kind",
                    })
                })
                .collect()
        }

        let vector = match items.first() {
            None => VectorData::DoubleVector(Vec::new()),
            Some(Value::Boolean(_)) => VectorData::BoolVector(collect(items, |v| match v {
                Value::Boolean(b) => Some(*b),
                _ => None,
            })?),
            Some(Value::TinyInt(_) | Value::SmallInt(_) | Value::Integer(_)) => {
                VectorData::IntVector(collect(items, |v| match v {
                    Value::TinyInt(x) => Some(i32::from(*x)),
                    Value::SmallInt(x) => Some(i32::from(*x)),
                    Value::Integer(x) => Some(*x),
                    _ => None,
                })?)
            }
            Some(Value::BigInt(_)) => VectorData::LongVector(collect(items, |v| match v {
                Value::BigInt(x) => Some(*x),
                _ => None,
            })?),
            Some(Value::Real(_)) => VectorData::FloatVector(collect(items, |v| match v {
                Value::Real(x) => Some(*x),
                _ => None,
            })?),
            Some(Value::Double(_)) => VectorData::DoubleVector(collect(items, |v| match v {
                Value::Double(x) => Some(*x),
                _ => None,
            })?),
            Some(other) => {
                return Err(VectorError::UnsupportedLiteral {
                    value: other.to_string(),
                    reason: "not a vector element",
                })
            }
        };
        Ok(vector)
    }

    pub fn len(&self) -> usize {
        match self {
            VectorData::BoolVector(v) => v.len(),
            VectorData::IntVector(v) => v.len(),
            VectorData::LongVector(v) => v.len(),
            VectorData::FloatVector(v) => v.len(),
            VectorData::DoubleVector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode into an array value
    pub fn to_value(&self) -> Value {
        let items = match self {
            VectorData::BoolVector(v) => v.iter().copied().map(Value::Boolean).collect(),
            VectorData::IntVector(v) => v.iter().copied().map(Value::Integer).collect(),
            VectorData::LongVector(v) => v.iter().copied().map(Value::BigInt).collect(),
            VectorData::FloatVector(v) => v.iter().copied().map(Value::Real).collect(),
            VectorData::DoubleVector(v) => v.iter().copied().map(Value::Double).collect(),
        };
        Value::Array(items)
    }
}

/// Comparison operator of an atomic predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Equal,
    Greater,
    Less,
    Gequal,
    Lequal,
    In,
    Between,
    Isnull,
    Isnotnull,
    Like,
}

/// Logical operator of a compound predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOperator {
    And,
    Or,
}

/// `attribute op data`, optionally negated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomicLiteralBooleanPredicate {
    pub attribute: String,
    pub not: bool,
    pub op: ComparisonOperator,
    pub data: Vec<Data>,
}

/// Binary predicate node with one atomic and one compound slot per side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundBooleanPredicate {
    pub op: LogicalOperator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aleft: Option<Box<AtomicLiteralBooleanPredicate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleft: Option<Box<CompoundBooleanPredicate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aright: Option<Box<AtomicLiteralBooleanPredicate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cright: Option<Box<CompoundBooleanPredicate>>,
}

/// Either kind of predicate node, before it is placed into a slot
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    Atomic(AtomicLiteralBooleanPredicate),
    Compound(CompoundBooleanPredicate),
}

impl CompoundBooleanPredicate {
    /// Place each child into the slot matching its kind
    pub fn new(op: LogicalOperator, left: PredicateNode, right: PredicateNode) -> Self {
        let (aleft, cleft) = split(left);
        let (aright, cright) = split(right);
        Self {
            op,
            aleft,
            cleft,
            aright,
            cright,
        }
    }
}

type Slots = (
    Option<Box<AtomicLiteralBooleanPredicate>>,
    Option<Box<CompoundBooleanPredicate>>,
);

fn split(node: PredicateNode) -> Slots {
    match node {
        PredicateNode::Atomic(a) => (Some(Box::new(a)), None),
        PredicateNode::Compound(c) => (None, Some(Box::new(c))),
    }
}

/// Root of a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Where {
    Atomic(AtomicLiteralBooleanPredicate),
    Compound(CompoundBooleanPredicate),
}

impl From<PredicateNode> for Where {
    fn from(node: PredicateNode) -> Self {
        match node {
            PredicateNode::Atomic(a) => Where::Atomic(a),
            PredicateNode::Compound(c) => Where::Compound(c),
        }
    }
}

impl From<Where> for PredicateNode {
    fn from(root: Where) -> Self {
        match root {
            Where::Atomic(a) => PredicateNode::Atomic(a),
            Where::Compound(c) => PredicateNode::Compound(c),
        }
    }
}

/// Distance metric of a kNN request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Distance {
    #[serde(rename = "L1")]
    L1,
    #[serde(rename = "L2")]
    L2,
    #[serde(rename = "L2SQUARED")]
    L2Squared,
    #[serde(rename = "CHISQUARED")]
    ChiSquared,
    #[serde(rename = "COSINE")]
    Cosine,
}

impl FromStr for Distance {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L1" => Ok(Distance::L1),
            "L2" => Ok(Distance::L2),
            "L2SQUARED" => Ok(Distance::L2Squared),
            "CHISQUARED" => Ok(Distance::ChiSquared),
            "COSINE" => Ok(Distance::Cosine),
            other => Err(VectorError::UnknownDistance {
                name: other.to_string(),
            }),
        }
    }
}

/// Nearest-neighbour request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Knn {
    pub attribute: String,
    /// Result cardinality bound; always set
    pub k: u32,
    pub distance: Distance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<VectorData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<VectorData>,
}

impl Knn {
    pub fn builder(attribute: impl Into<String>, distance: Distance) -> KnnBuilder {
        KnnBuilder {
            attribute: attribute.into(),
            k: None,
            distance,
            query: None,
            weights: None,
        }
    }
}

/// Builder for [`Knn`]; every setter returns a new builder
#[derive(Debug, Clone, PartialEq)]
pub struct KnnBuilder {
    attribute: String,
    k: Option<u32>,
    distance: Distance,
    query: Option<VectorData>,
    weights: Option<VectorData>,
}

impl KnnBuilder {
    pub fn k(self, k: u32) -> Self {
        Self { k: Some(k), ..self }
    }

    pub fn query(self, query: VectorData) -> Self {
        Self {
            query: Some(query),
            ..self
        }
    }

    pub fn weights(self, weights: VectorData) -> Self {
        Self {
            weights: Some(weights),
            ..self
        }
    }

    /// Finish the request. Without an explicit bound, `k` is the configured
    /// default; the store cannot take an unbounded request.
    pub fn build(self, config: &VectorConfig) -> Knn {
        Knn {
            attribute: self.attribute,
            k: self.k.unwrap_or(config.default_knn_limit),
            distance: self.distance,
            query: self.query,
            weights: self.weights,
        }
    }
}

/// Complete request against one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub entity: String,
    /// Projected attributes; empty means all
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projection: Vec<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<Where>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knn: Option<Knn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod tests;
