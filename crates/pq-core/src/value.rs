//! Runtime values carried by literals and coerced parameters

use crate::types::{FloatBitWidth, IntBitWidth, PolyType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single value in its canonical representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Decimal(Decimal),
    Real(f32),
    Double(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    /// Homogeneous ordered sequence (arrays and vectors)
    Array(Vec<Value>),
}

impl Value {
    /// Natural canonical type of this value.
    ///
    /// `Null` reports [`PolyType::Null`]; arrays report the type of their
    /// first element (or `NULL ARRAY` when empty).
    pub fn poly_type(&self) -> PolyType {
        match self {
            Value::Null => PolyType::Null,
            Value::Boolean(_) => PolyType::Boolean,
            Value::TinyInt(_) => PolyType::TINYINT,
            Value::SmallInt(_) => PolyType::SMALLINT,
            Value::Integer(_) => PolyType::INTEGER,
            Value::BigInt(_) => PolyType::BIGINT,
            Value::Decimal(_) => PolyType::Decimal {
                precision: None,
                scale: None,
            },
            Value::Real(_) => PolyType::REAL,
            Value::Double(_) => PolyType::DOUBLE,
            Value::String(_) => PolyType::VARCHAR,
            Value::Date(_) => PolyType::Date,
            Value::Time(_) => PolyType::Time,
            Value::Timestamp(_) => PolyType::Timestamp,
            Value::Array(items) => PolyType::array_of(
                items
                    .first()
                    .map(Value::poly_type)
                    .unwrap_or(PolyType::Null),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value's runtime kind belongs to the given canonical type
    pub fn matches_type(&self, ty: &PolyType) -> bool {
        match (self, ty) {
            (Value::Null, _) => true,
            (Value::Boolean(_), PolyType::Boolean) => true,
            (Value::TinyInt(_), PolyType::Integer { bits }) => *bits == IntBitWidth::I8,
            (Value::SmallInt(_), PolyType::Integer { bits }) => *bits == IntBitWidth::I16,
            (Value::Integer(_), PolyType::Integer { bits }) => *bits == IntBitWidth::I32,
            (Value::BigInt(_), PolyType::Integer { bits }) => *bits == IntBitWidth::I64,
            (Value::Decimal(_), PolyType::Decimal { .. }) => true,
            (Value::Real(_), PolyType::Float { bits }) => *bits == FloatBitWidth::F32,
            (Value::Double(_), PolyType::Float { bits }) => *bits == FloatBitWidth::F64,
            (Value::String(_), PolyType::String { .. } | PolyType::Char { .. }) => true,
            (Value::Date(_), PolyType::Date) => true,
            (Value::Time(_), PolyType::Time) => true,
            (Value::Timestamp(_), PolyType::Timestamp) => true,
            (Value::Array(items), PolyType::Array(component)) => {
                items.iter().all(|item| item.matches_type(component))
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::TinyInt(v) => write!(f, "{v}"),
            Value::SmallInt(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
