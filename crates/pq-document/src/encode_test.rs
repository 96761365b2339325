use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_scalars() {
    assert_eq!(encode_value(&Value::Null).unwrap(), JsonValue::Null);
    assert_eq!(encode_value(&Value::Boolean(true)).unwrap(), json!(true));
    assert_eq!(encode_value(&Value::SmallInt(-3)).unwrap(), json!(-3));
    assert_eq!(encode_value(&Value::BigInt(1 << 40)).unwrap(), json!(1_i64 << 40));
    assert_eq!(encode_value(&Value::Double(2.5)).unwrap(), json!(2.5));
    assert_eq!(
        encode_value(&Value::String("abc".into())).unwrap(),
        json!("abc")
    );
}

#[test]
fn test_decimal_keeps_precision() {
    let d = Decimal::from_str("12.340").unwrap();
    assert_eq!(
        encode_value(&Value::Decimal(d)).unwrap(),
        json!({ "$numberDecimal": "12.340" })
    );
}

#[test]
fn test_temporal_values() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(
        encode_value(&Value::Date(date)).unwrap(),
        json!({ "$date": "2024-02-29T00:00:00.000Z" })
    );

    let ts = NaiveDateTime::parse_from_str("2024-02-29 13:45:10", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(
        encode_value(&Value::Timestamp(ts)).unwrap(),
        json!({ "$date": "2024-02-29T13:45:10.000Z" })
    );
}

#[test]
fn test_arrays() {
    let array = Value::Array(vec![Value::Integer(1), Value::Null, Value::Integer(3)]);
    assert_eq!(encode_value(&array).unwrap(), json!([1, null, 3]));
}

#[test]
fn test_nan_rejected() {
    assert!(matches!(
        encode_value(&Value::Double(f64::NAN)),
        Err(DocumentError::InvalidLiteral { .. })
    ));
}

#[test]
fn test_like_to_regex() {
    assert_eq!(like_to_regex("ab%"), "^ab.*$");
    assert_eq!(like_to_regex("a_c"), "^a.c$");
    assert_eq!(like_to_regex("1.5%"), "^1\\.5.*$");
    assert_eq!(like_to_regex("(x)"), "^\\(x\\)$");
}
