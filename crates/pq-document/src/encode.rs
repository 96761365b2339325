//! Literal encoding into document values
//!
//! Values map onto plain JSON where one exists and onto extended-JSON
//! wrappers (`$numberDecimal`, `$date`) where the document store would
//! otherwise lose precision or type.

use crate::error::{DocumentError, DocumentResult};
use chrono::{NaiveTime, SecondsFormat};
use pq_core::Value;
use serde_json::{json, Value as JsonValue};

/// Encode one runtime value as a document value
pub fn encode_value(value: &Value) -> DocumentResult<JsonValue> {
    let encoded = match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => json!(b),
        Value::TinyInt(v) => json!(v),
        Value::SmallInt(v) => json!(v),
        Value::Integer(v) => json!(v),
        Value::BigInt(v) => json!(v),
        Value::Decimal(d) => json!({ "$numberDecimal": d.to_string() }),
        Value::Real(v) => encode_float(f64::from(*v), value)?,
        Value::Double(v) => encode_float(*v, value)?,
        Value::String(s) => json!(s),
        Value::Date(d) => json!({
            "$date": d
                .and_time(NaiveTime::MIN)
                .and_utc()
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        }),
        Value::Time(t) => json!(t.format("%H:%M:%S%.f").to_string()),
        Value::Timestamp(ts) => json!({
            "$date": ts.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
        }),
        Value::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(encode_value)
                .collect::<DocumentResult<Vec<_>>>()?,
        ),
    };
    Ok(encoded)
}

fn encode_float(v: f64, original: &Value) -> DocumentResult<JsonValue> {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .ok_or_else(|| DocumentError::InvalidLiteral {
            value: original.to_string(),
        })
}

/// Anchored regular expression equivalent to a SQL LIKE pattern
pub fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');
    for c in pattern.chars() {
        match c {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');
    regex
}

#[cfg(test)]
#[path = "encode_test.rs"]
mod tests;
