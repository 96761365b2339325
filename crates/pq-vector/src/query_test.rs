use super::*;
use pq_algebra::TypedColumn;
use pq_core::{PolyType, Value};
use pretty_assertions::assert_eq;

fn features() -> RelNode {
    let schema = RelSchema::new(vec![
        TypedColumn::new("id", PolyType::BIGINT, false),
        TypedColumn::new("label", PolyType::VARCHAR, true),
        TypedColumn::new(
            "feature",
            PolyType::array_of(PolyType::DOUBLE),
            false,
        ),
    ]);
    RelNode::scan("images", schema, Convention::Vector).unwrap()
}

fn distance(metric: &str) -> RexNode {
    RexNode::call(
        RexOp::Distance,
        vec![
            RexNode::input_ref(2, PolyType::array_of(PolyType::DOUBLE)),
            RexNode::literal(Value::Array(vec![Value::Double(0.5), Value::Double(1.0)])),
            RexNode::literal(Value::String(metric.to_string())),
        ],
    )
}

fn knn_plan(fetch: Option<u64>) -> RelNode {
    let project = RelNode::project(
        features(),
        vec![
            ("id".to_string(), RexNode::input_ref(0, PolyType::BIGINT)),
            ("dist".to_string(), distance("L2")),
        ],
    )
    .unwrap();
    RelNode::sort(project, vec![FieldCollation::asc(1)], None, fetch).unwrap()
}

#[test]
fn test_scan_only() {
    let config = VectorConfig::default();
    let query = QueryEmitter::new(&config).emit(&features()).unwrap();
    assert_eq!(query.entity, "images");
    assert!(query.projection.is_empty());
    assert!(query.where_clause.is_none() && query.knn.is_none());
}

#[test]
fn test_distance_projection_builds_knn() {
    let config = VectorConfig::default();
    let query = QueryEmitter::new(&config).emit(&knn_plan(None)).unwrap();
    assert_eq!(query.projection, vec!["id".to_string()]);
    let knn = query.knn.unwrap();
    assert_eq!(knn.attribute, "feature");
    assert_eq!(knn.distance, Distance::L2);
    assert_eq!(knn.k, config.default_knn_limit);
    assert_eq!(knn.query, Some(VectorData::DoubleVector(vec![0.5, 1.0])));
    assert!(knn.weights.is_none());
}

#[test]
fn test_fetch_bounds_knn() {
    let config = VectorConfig::default();
    let query = QueryEmitter::new(&config).emit(&knn_plan(Some(5))).unwrap();
    assert_eq!(query.limit, Some(5));
    assert_eq!(query.knn.map(|knn| knn.k), Some(5));
}

#[test]
fn test_configured_default_k() {
    let config = VectorConfig {
        default_knn_limit: 250,
    };
    let query = QueryEmitter::new(&config).emit(&knn_plan(None)).unwrap();
    assert_eq!(query.knn.map(|knn| knn.k), Some(250));
}

#[test]
fn test_weights_operand() {
    let mut call = distance("cosine");
    if let RexNode::Call { operands, .. } = &mut call {
        operands.push(RexNode::literal(Value::Array(vec![
            Value::Real(1.0),
            Value::Real(2.0),
        ])));
    }
    let project = RelNode::project(features(), vec![("d".to_string(), call)]).unwrap();
    let config = VectorConfig::default();
    let knn = QueryEmitter::new(&config).emit(&project).unwrap().knn.unwrap();
    assert_eq!(knn.distance, Distance::Cosine);
    assert_eq!(knn.weights, Some(VectorData::FloatVector(vec![1.0, 2.0])));
}

#[test]
fn test_unknown_metric() {
    let project = RelNode::project(features(), vec![("d".to_string(), distance("HAMMING"))]).unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&project),
        Err(VectorError::UnknownDistance { .. })
    ));
}

#[test]
fn test_two_distances_rejected() {
    let project = RelNode::project(
        features(),
        vec![
            ("a".to_string(), distance("L1")),
            ("b".to_string(), distance("L2")),
        ],
    )
    .unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&project),
        Err(VectorError::InvalidKnn { .. })
    ));
}

#[test]
fn test_sort_on_attribute_rejected() {
    let sort = RelNode::sort(features(), vec![FieldCollation::asc(1)], None, None).unwrap();
    let config = VectorConfig::default();
    let Err(VectorError::UnsupportedSort { field }) = QueryEmitter::new(&config).emit(&sort) else {
        panic!("expected an unsupported sort");
    };
    assert_eq!(field, "label");
}

#[test]
fn test_descending_distance_rejected() {
    let project = RelNode::project(features(), vec![("d".to_string(), distance("L2"))]).unwrap();
    let sort = RelNode::sort(project, vec![FieldCollation::desc(0)], None, None).unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&sort),
        Err(VectorError::UnsupportedSort { .. })
    ));
}

#[test]
fn test_filters_are_anded() {
    let first = RelNode::filter(
        features(),
        RexNode::call(
            RexOp::GreaterThan,
            vec![
                RexNode::input_ref(0, PolyType::BIGINT),
                RexNode::literal(Value::BigInt(10)),
            ],
        ),
    )
    .unwrap();
    let second = RelNode::filter(
        first,
        RexNode::call(RexOp::IsNotNull, vec![RexNode::input_ref(1, PolyType::VARCHAR)]),
    )
    .unwrap();
    let config = VectorConfig::default();
    let Some(Where::Compound(root)) = QueryEmitter::new(&config).emit(&second).unwrap().where_clause
    else {
        panic!("expected a compound where");
    };
    assert_eq!(root.op, LogicalOperator::And);
    assert_eq!(root.aleft.map(|a| a.attribute), Some("id".to_string()));
    assert_eq!(
        root.aright.map(|a| a.op),
        Some(crate::wire::ComparisonOperator::Isnotnull)
    );
}

#[test]
fn test_wrong_convention() {
    let schema = RelSchema::new(vec![TypedColumn::new("id", PolyType::BIGINT, false)]);
    let scan = RelNode::scan("t", schema, Convention::Document).unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&scan),
        Err(VectorError::WrongConvention { .. })
    ));
}

#[test]
fn test_aggregate_rejected() {
    let aggregate = RelNode::aggregate(features(), vec![1], Vec::new()).unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&aggregate),
        Err(VectorError::UnsupportedOperator { op: "Aggregate" })
    ));
}

#[test]
fn test_filter_over_renamed_projection_uses_stored_attribute() {
    let project = RelNode::project(
        features(),
        vec![("ident".to_string(), RexNode::input_ref(0, PolyType::BIGINT))],
    )
    .unwrap();
    let filter = RelNode::filter(
        project,
        RexNode::call(
            RexOp::Equals,
            vec![
                RexNode::input_ref(0, PolyType::BIGINT),
                RexNode::literal(Value::BigInt(5)),
            ],
        ),
    )
    .unwrap();
    let config = VectorConfig::default();
    let query = QueryEmitter::new(&config).emit(&filter).unwrap();
    assert_eq!(query.projection, vec!["id".to_string()]);
    let Some(Where::Atomic(atomic)) = query.where_clause else {
        panic!("expected an atomic where");
    };
    assert_eq!(atomic.attribute, "id");
}

#[test]
fn test_filter_on_distance_rejected() {
    let project = RelNode::project(features(), vec![("d".to_string(), distance("L2"))]).unwrap();
    let filter = RelNode::filter(
        project,
        RexNode::call(
            RexOp::LessThan,
            vec![
                RexNode::input_ref(0, PolyType::DOUBLE),
                RexNode::literal(Value::Double(0.5)),
            ],
        ),
    )
    .unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&filter),
        Err(VectorError::UnsupportedExpression { .. })
    ));
}

#[test]
fn test_filter_above_fetch_rejected() {
    let sort = RelNode::sort(features(), Vec::new(), None, Some(10)).unwrap();
    let filter = RelNode::filter(
        sort,
        RexNode::call(
            RexOp::Equals,
            vec![
                RexNode::input_ref(0, PolyType::BIGINT),
                RexNode::literal(Value::BigInt(5)),
            ],
        ),
    )
    .unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&filter),
        Err(VectorError::UnsupportedOperator { op: "Filter" })
    ));
}

#[test]
fn test_distance_above_offset_rejected() {
    let sort = RelNode::sort(features(), Vec::new(), Some(3), None).unwrap();
    let project = RelNode::project(sort, vec![("d".to_string(), distance("L2"))]).unwrap();
    let config = VectorConfig::default();
    assert!(matches!(
        QueryEmitter::new(&config).emit(&project),
        Err(VectorError::UnsupportedOperator { op: "Project" })
    ));

    // plain projections over a page are fine
    let sort = RelNode::sort(features(), Vec::new(), Some(3), None).unwrap();
    let project = RelNode::project(
        sort,
        vec![("id".to_string(), RexNode::input_ref(0, PolyType::BIGINT))],
    )
    .unwrap();
    assert_eq!(
        QueryEmitter::new(&config).emit(&project).unwrap().skip,
        Some(3)
    );
}

#[test]
fn test_large_fetch_clamped_to_configured_bound() {
    let config = VectorConfig::default();
    let query = QueryEmitter::new(&config)
        .emit(&knn_plan(Some(u64::MAX)))
        .unwrap();
    assert_eq!(query.knn.map(|knn| knn.k), Some(config.default_knn_limit));

    let small = VectorConfig {
        default_knn_limit: 50,
    };
    let query = QueryEmitter::new(&small).emit(&knn_plan(Some(80))).unwrap();
    assert_eq!(query.knn.map(|knn| knn.k), Some(50));
}
