use super::*;

#[test]
fn test_parse_basic_types() {
    assert_eq!(parse_poly_type("boolean"), Some(PolyType::Boolean));
    assert_eq!(parse_poly_type("TINYINT"), Some(PolyType::TINYINT));
    assert_eq!(parse_poly_type("int"), Some(PolyType::INTEGER));
    assert_eq!(parse_poly_type("bigint"), Some(PolyType::BIGINT));
    assert_eq!(parse_poly_type("REAL"), Some(PolyType::REAL));
    assert_eq!(parse_poly_type("double precision"), Some(PolyType::DOUBLE));
    assert_eq!(parse_poly_type("VARCHAR"), Some(PolyType::VARCHAR));
    assert_eq!(parse_poly_type("DATE"), Some(PolyType::Date));
    assert_eq!(
        parse_poly_type("image"),
        Some(PolyType::Multimedia(MultimediaKind::Image))
    );
}

#[test]
fn test_parse_parameterized_types() {
    assert_eq!(
        parse_poly_type("VARCHAR(255)"),
        Some(PolyType::String {
            max_length: Some(255)
        })
    );
    assert_eq!(
        parse_poly_type("DECIMAL(10,2)"),
        Some(PolyType::Decimal {
            precision: Some(10),
            scale: Some(2)
        })
    );
    assert_eq!(
        parse_poly_type("char(3)"),
        Some(PolyType::Char { length: Some(3) })
    );
}

#[test]
fn test_parse_arrays_and_intervals() {
    assert_eq!(
        parse_poly_type("INTEGER[][]"),
        Some(PolyType::array_of(PolyType::array_of(PolyType::INTEGER)))
    );
    assert_eq!(
        parse_poly_type("double ARRAY"),
        Some(PolyType::array_of(PolyType::DOUBLE))
    );
    assert_eq!(
        parse_poly_type("INTERVAL DAY TO SECOND"),
        Some(PolyType::Interval(IntervalQualifier::DaySecond))
    );
}

#[test]
fn test_parse_unknown_type() {
    assert_eq!(parse_poly_type("SOMECUSTOMTYPE"), None);
    assert_eq!(parse_poly_type("INTERVAL FORTNIGHT"), None);
}

#[test]
fn test_array_depth_and_innermost_component() {
    let nested = PolyType::array_of(PolyType::array_of(PolyType::array_of(PolyType::TINYINT)));
    assert_eq!(nested.array_depth(), 3);
    assert_eq!(nested.innermost_component(), &PolyType::TINYINT);
    assert_eq!(PolyType::Boolean.array_depth(), 0);
    assert_eq!(PolyType::Boolean.innermost_component(), &PolyType::Boolean);
}

#[test]
fn test_type_families() {
    assert!(PolyType::Interval(IntervalQualifier::Hour).is_interval());
    assert!(PolyType::Multimedia(MultimediaKind::Sound).is_multimedia());
    assert!(!PolyType::Binary.is_multimedia());
    assert!(PolyType::SMALLINT.is_integer());
    assert!(PolyType::Decimal {
        precision: None,
        scale: None
    }
    .is_numeric());
    assert!(PolyType::Timestamp.is_temporal());
}

#[test]
fn test_display_names() {
    assert_eq!(PolyType::INTEGER.display_name(), "INTEGER");
    assert_eq!(PolyType::DOUBLE.display_name(), "DOUBLE");
    assert_eq!(
        PolyType::String {
            max_length: Some(100)
        }
        .display_name(),
        "VARCHAR(100)"
    );
    assert_eq!(
        PolyType::array_of(PolyType::BIGINT).display_name(),
        "BIGINT ARRAY"
    );
    assert_eq!(
        PolyType::Interval(IntervalQualifier::YearMonth).display_name(),
        "INTERVAL YEAR TO MONTH"
    );
}

#[test]
fn test_interval_qualifier_units() {
    assert_eq!(IntervalQualifier::DaySecond.start_unit(), TimeUnit::Day);
    assert_eq!(
        IntervalQualifier::DaySecond.end_unit(),
        Some(TimeUnit::Second)
    );
    assert_eq!(IntervalQualifier::Month.end_unit(), None);
}

#[test]
fn test_int_bit_width_ordering() {
    assert!(IntBitWidth::I8 < IntBitWidth::I16);
    assert!(IntBitWidth::I16 < IntBitWidth::I32);
    assert!(IntBitWidth::I32 < IntBitWidth::I64);
    assert!(FloatBitWidth::F32 < FloatBitWidth::F64);
}
