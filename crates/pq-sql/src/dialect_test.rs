use super::*;

#[test]
fn test_postgresql_parse() {
    let stmts = POSTGRESQL.parse("SELECT * FROM users").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_hsqldb_parse() {
    let stmts = HSQLDB.parse("SELECT * FROM users LIMIT 10 OFFSET 5").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_empty() {
    assert!(matches!(ANSI.parse("   \n"), Err(SqlError::EmptySql)));
}

#[test]
fn test_quote_identifier() {
    assert_eq!(POSTGRESQL.quote_identifier("user"), "\"user\"");
    assert_eq!(POSTGRESQL.quote_identifier("user\"name"), "\"user\"\"name\"");
}

#[test]
fn test_parse_error_location() {
    let result = ANSI.parse("SELECT\nFROM users");
    let Err(SqlError::ParseError { line, message, .. }) = result else {
        panic!("expected a parse error");
    };
    assert_eq!(line, 2, "message: {message}");
    assert!(message.contains("Line: 2"), "message: {message}");
}

#[test]
fn test_parse_location_extraction() {
    let (line, col) = parse_location_from_error("Expected: something at Line: 5, Column: 10");
    assert_eq!(line, 5);
    assert_eq!(col, 10);

    let (line, col) = parse_location_from_error("Some error without location");
    assert_eq!(line, 0);
    assert_eq!(col, 0);
}

#[test]
fn test_lookup_by_product() {
    for product in [
        DatabaseProduct::Ansi,
        DatabaseProduct::PostgreSql,
        DatabaseProduct::Hsqldb,
    ] {
        assert_eq!(SqlDialect::lookup(product).product, product);
    }
    assert_eq!(SqlDialect::lookup(DatabaseProduct::Hsqldb).name(), "hsqldb");
}

#[test]
fn test_feature_flags() {
    assert!(POSTGRESQL.requires_alias_for_from_items);
    assert!(!POSTGRESQL.supports_nested_aggregations);
    assert!(!HSQLDB.supports_window_functions);
    assert_eq!(HSQLDB.pagination, PaginationStyle::LimitOffset);
    assert_eq!(
        POSTGRESQL.interval_parameter_strategy,
        IntervalParameterStrategy::Cast
    );
    assert_eq!(
        HSQLDB.interval_parameter_strategy,
        IntervalParameterStrategy::None
    );
}

#[test]
fn test_hsqldb_unit_tokens() {
    assert_eq!(hsqldb_unit_token(TimeUnit::Year), Some("YYYY"));
    assert_eq!(hsqldb_unit_token(TimeUnit::Hour), Some("HH24"));
    assert_eq!(hsqldb_unit_token(TimeUnit::Minute), Some("MI"));
    assert_eq!(hsqldb_unit_token(TimeUnit::Quarter), None);
    assert_eq!(hsqldb_unit_token(TimeUnit::Millisecond), None);
}

#[test]
fn test_max_precision() {
    assert_eq!(
        (POSTGRESQL.max_precision)(&PolyType::VARCHAR),
        Some(10_485_760)
    );
    assert_eq!((ANSI.max_precision)(&PolyType::VARCHAR), Some(65_536));
    assert_eq!((HSQLDB.max_precision)(&PolyType::Date), None);
}

#[test]
fn test_hsqldb_single_value_shape() {
    let call = SqlNode::call(SqlKind::SingleValue, vec![SqlNode::ident("x")]);
    let SqlNode::Case {
        operand,
        whens,
        else_result,
    } = hsqldb_single_value(&call)
    else {
        panic!("expected CASE");
    };
    assert_eq!(
        operand.as_deref(),
        Some(&SqlNode::call(SqlKind::Count, vec![SqlNode::Star]))
    );
    assert_eq!(whens.len(), 2);
    assert_eq!(whens[0], (SqlNode::exact(0), SqlNode::null()));
    assert_eq!(
        whens[1].1,
        SqlNode::call(SqlKind::Min, vec![SqlNode::ident("x")])
    );
    assert!(else_result.is_some_and(|e| e.is_query()));
}
