use super::*;
use crate::dialect::{ANSI, HSQLDB, POSTGRESQL};
use pq_core::IntervalQualifier;

fn nested_array(component: PolyType, depth: usize) -> PolyType {
    (0..depth).fold(component, |ty, _| PolyType::array_of(ty))
}

#[test]
fn test_array_brackets_per_depth() {
    for dialect in [&ANSI, &POSTGRESQL, &HSQLDB] {
        for depth in 1..=3 {
            let spec = cast_spec(dialect, &nested_array(PolyType::INTEGER, depth)).unwrap();
            let text = spec.unparse();
            assert_eq!(
                text.matches("[]").count(),
                depth,
                "{} at depth {depth}: {text}",
                dialect.name()
            );
            assert!(text.starts_with("INTEGER"), "{}: {text}", dialect.name());
        }
    }
}

#[test]
fn test_array_component_uses_override() {
    let spec = cast_spec(&POSTGRESQL, &nested_array(PolyType::TINYINT, 2)).unwrap();
    assert_eq!(spec.unparse(), "smallint[][]");

    let spec = cast_spec(&POSTGRESQL, &PolyType::array_of(PolyType::DOUBLE)).unwrap();
    assert_eq!(spec.unparse(), "double precision[]");
}

#[test]
fn test_alien_sentinel_stripped() {
    let spec = cast_spec(&POSTGRESQL, &PolyType::array_of(PolyType::INTEGER)).unwrap();
    assert!(spec.is_alien());
    assert_eq!(spec.token(), "_INTEGER[]");
    assert_eq!(spec.unparse(), "INTEGER[]");
    assert_eq!(spec.to_string(), "INTEGER[]");

    let standard = CastSpec::standard("DATE");
    assert!(!standard.is_alien());
    assert_eq!(standard.unparse(), "DATE");
}

#[test]
fn test_postgresql_overrides() {
    let resolve = |ty: PolyType| cast_spec(&POSTGRESQL, &ty).unwrap().unparse().to_string();
    assert_eq!(resolve(PolyType::TINYINT), "smallint");
    assert_eq!(resolve(PolyType::DOUBLE), "double precision");
    assert_eq!(resolve(PolyType::Multimedia(MultimediaKind::Image)), "BYTEA");
    assert_eq!(resolve(PolyType::Interval(IntervalQualifier::DaySecond)), "interval");
    assert_eq!(resolve(PolyType::INTEGER), "INTEGER");
}

#[test]
fn test_hsqldb_overrides() {
    let resolve = |ty: PolyType| cast_spec(&HSQLDB, &ty).unwrap().unparse().to_string();
    assert_eq!(resolve(PolyType::Multimedia(MultimediaKind::Video)), "BLOB");
    assert_eq!(resolve(PolyType::Interval(IntervalQualifier::Year)), "INTERVAL");
    assert_eq!(resolve(PolyType::TINYINT), "TINYINT");
}

#[test]
fn test_default_resolver() {
    let resolve = |ty: PolyType| cast_spec(&ANSI, &ty).unwrap().unparse().to_string();
    assert_eq!(
        resolve(PolyType::Interval(IntervalQualifier::DaySecond)),
        "INTERVAL DAY TO SECOND"
    );
    assert_eq!(
        resolve(PolyType::Decimal {
            precision: Some(10),
            scale: Some(2)
        }),
        "DECIMAL(10, 2)"
    );
    assert_eq!(resolve(PolyType::Char { length: Some(3) }), "CHAR(3)");
    assert_eq!(resolve(PolyType::Timestamp), "TIMESTAMP");
}

#[test]
fn test_precision_clamped_per_dialect() {
    let wide = PolyType::String {
        max_length: Some(20_000_000),
    };
    assert_eq!(
        cast_spec(&POSTGRESQL, &wide).unwrap().unparse(),
        "VARCHAR(10485760)"
    );
    assert_eq!(cast_spec(&ANSI, &wide).unwrap().unparse(), "VARCHAR(65536)");

    let decimal = PolyType::Decimal {
        precision: Some(40),
        scale: None,
    };
    assert_eq!(cast_spec(&ANSI, &decimal).unwrap().unparse(), "DECIMAL(19)");
}

#[test]
fn test_null_has_no_cast_target() {
    assert!(matches!(
        cast_spec(&ANSI, &PolyType::Null),
        Err(SqlError::UnsupportedCastTarget { dialect: "ansi", .. })
    ));
    assert!(cast_spec(&POSTGRESQL, &PolyType::array_of(PolyType::Null)).is_err());
}
