//! Type coercion matrix
//!
//! Converts a value declared as canonical source type S into the
//! representation required for canonical destination type D. Only an
//! explicit set of (S, D) cells is populated; every other pair is an error
//! naming both types. Conversions are scalar; sequences go through
//! [`Coercion::apply_each`].

use crate::error::{CoreError, CoreResult};
use crate::types::{FloatBitWidth, IntBitWidth, PolyType};
use crate::value::Value;
use rust_decimal::Decimal;

/// Source rows of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceRow {
    Boolean,
    Int(IntBitWidth),
}

/// Destination columns of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetColumn {
    Boolean,
    Int(IntBitWidth),
    Decimal,
    Float(FloatBitWidth),
    String,
}

fn source_row(ty: &PolyType) -> Option<SourceRow> {
    match ty {
        PolyType::Boolean => Some(SourceRow::Boolean),
        // BIGINT and wider sources are not part of the matrix
        PolyType::Integer { bits } if *bits < IntBitWidth::I64 => Some(SourceRow::Int(*bits)),
        _ => None,
    }
}

fn target_column(ty: &PolyType) -> Option<TargetColumn> {
    match ty {
        PolyType::Boolean => Some(TargetColumn::Boolean),
        PolyType::Integer { bits } => Some(TargetColumn::Int(*bits)),
        PolyType::Decimal { .. } => Some(TargetColumn::Decimal),
        PolyType::Float { bits } => Some(TargetColumn::Float(*bits)),
        PolyType::String { .. } => Some(TargetColumn::String),
        _ => None,
    }
}

fn is_populated(source: SourceRow, target: TargetColumn) -> bool {
    match (source, target) {
        (SourceRow::Boolean, _) => true,
        (SourceRow::Int(_), TargetColumn::Boolean) => false,
        // integers only widen
        (SourceRow::Int(from), TargetColumn::Int(to)) => to >= from,
        (SourceRow::Int(_), TargetColumn::Decimal)
        | (SourceRow::Int(_), TargetColumn::Float(_))
        | (SourceRow::Int(_), TargetColumn::String) => true,
    }
}

/// A resolved, populated cell of the coercion matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coercion {
    from: PolyType,
    to: PolyType,
    source: SourceRow,
    target: TargetColumn,
}

impl Coercion {
    /// Look up the (from, to) cell, failing when it is not populated
    pub fn resolve(from: &PolyType, to: &PolyType) -> CoreResult<Self> {
        let source = source_row(from).ok_or_else(|| CoreError::UnsupportedSourceType {
            from: from.clone(),
            to: to.clone(),
        })?;
        let target = target_column(to)
            .filter(|target| is_populated(source, *target))
            .ok_or_else(|| CoreError::UnsupportedConversion {
                from: from.clone(),
                to: to.clone(),
            })?;
        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            source,
            target,
        })
    }

    /// Declared source type
    pub fn from_type(&self) -> &PolyType {
        &self.from
    }

    /// Requested destination type
    pub fn to_type(&self) -> &PolyType {
        &self.to
    }

    /// Convert one scalar value. NULL passes through unchanged.
    pub fn apply(&self, value: &Value) -> CoreResult<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match (self.source, value) {
            (SourceRow::Boolean, Value::Boolean(b)) => Ok(self.from_bool(*b)),
            (SourceRow::Int(IntBitWidth::I8), Value::TinyInt(v)) => Ok(self.from_int(i64::from(*v))),
            (SourceRow::Int(IntBitWidth::I16), Value::SmallInt(v)) => {
                Ok(self.from_int(i64::from(*v)))
            }
            (SourceRow::Int(IntBitWidth::I32), Value::Integer(v)) => {
                Ok(self.from_int(i64::from(*v)))
            }
            _ => Err(CoreError::ValueTypeMismatch {
                declared: self.from.clone(),
                value: value.clone(),
            }),
        }
    }

    /// Element-wise conversion of a homogeneous sequence, preserving order
    pub fn apply_each(&self, values: &[Value]) -> CoreResult<Vec<Value>> {
        values.iter().map(|value| self.apply(value)).collect()
    }

    fn from_bool(&self, b: bool) -> Value {
        match self.target {
            TargetColumn::Boolean => Value::Boolean(b),
            TargetColumn::String => Value::String(if b { "true" } else { "false" }.to_string()),
            _ => self.from_int(i64::from(b)),
        }
    }

    // The matrix only admits widening cells, so the narrowing casts below
    // never see an out-of-range value.
    fn from_int(&self, n: i64) -> Value {
        match self.target {
            TargetColumn::Boolean => Value::Boolean(n != 0),
            TargetColumn::Int(IntBitWidth::I8) => Value::TinyInt(n as i8),
            TargetColumn::Int(IntBitWidth::I16) => Value::SmallInt(n as i16),
            TargetColumn::Int(IntBitWidth::I32) => Value::Integer(n as i32),
            TargetColumn::Int(IntBitWidth::I64) => Value::BigInt(n),
            TargetColumn::Decimal => Value::Decimal(Decimal::from(n)),
            TargetColumn::Float(FloatBitWidth::F32) => Value::Real(n as f32),
            TargetColumn::Float(FloatBitWidth::F64) => Value::Double(n as f64),
            TargetColumn::String => Value::String(n.to_string()),
        }
    }
}

/// Convert a scalar declared as `from` into the representation for `to`
pub fn convert_value(value: &Value, from: &PolyType, to: &PolyType) -> CoreResult<Value> {
    Coercion::resolve(from, to)?.apply(value)
}

/// Convert every element of a sequence declared with component type `from`
pub fn convert_each(values: &[Value], from: &PolyType, to: &PolyType) -> CoreResult<Vec<Value>> {
    Coercion::resolve(from, to)?.apply_each(values)
}

/// Bring a literal to the representation of the field it is compared with.
///
/// The literal's natural type is the source. Pairs without a populated cell
/// leave the literal unchanged; array literals against array fields convert
/// element-wise.
pub fn coerce_literal(value: &Value, to: &PolyType) -> CoreResult<Value> {
    if let (Value::Array(items), PolyType::Array(component)) = (value, to) {
        return items
            .iter()
            .map(|item| coerce_literal(item, component))
            .collect::<CoreResult<Vec<_>>>()
            .map(Value::Array);
    }
    let from = value.poly_type();
    if value.is_null() || &from == to {
        return Ok(value.clone());
    }
    match Coercion::resolve(&from, to) {
        Ok(coercion) => coercion.apply(value),
        Err(CoreError::UnsupportedSourceType { .. } | CoreError::UnsupportedConversion { .. }) => {
            Ok(value.clone())
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
#[path = "coerce_test.rs"]
mod tests;
