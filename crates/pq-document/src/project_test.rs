use super::*;
use pq_algebra::TypedColumn;
use pq_core::{PolyType, TimeUnit, Value};
use pretty_assertions::assert_eq;

fn schema() -> RelSchema {
    RelSchema::new(vec![
        TypedColumn::new("price", PolyType::DOUBLE, false),
        TypedColumn::new("qty", PolyType::INTEGER, false),
    ])
}

#[test]
fn test_passthrough_and_rename() {
    let exprs = vec![
        ("price".to_string(), RexNode::input_ref(0, PolyType::DOUBLE)),
        ("amount".to_string(), RexNode::input_ref(1, PolyType::INTEGER)),
    ];
    assert_eq!(
        project_document(&exprs, &schema()).unwrap(),
        json!({ "price": 1, "amount": "$qty" })
    );
}

#[test]
fn test_computed_fields() {
    let total = RexNode::call(
        RexOp::Times,
        vec![
            RexNode::input_ref(0, PolyType::DOUBLE),
            RexNode::input_ref(1, PolyType::INTEGER),
        ],
    );
    let flag = RexNode::call(RexOp::IsNull, vec![RexNode::input_ref(1, PolyType::INTEGER)]);
    let constant = RexNode::literal(Value::String("x".into()));
    let exprs = vec![
        ("total".to_string(), total),
        ("missing".to_string(), flag),
        ("tag".to_string(), constant),
    ];
    assert_eq!(
        project_document(&exprs, &schema()).unwrap(),
        json!({
            "total": { "$multiply": ["$price", "$qty"] },
            "missing": { "$eq": ["$qty", null] },
            "tag": { "$literal": "x" }
        })
    );
}

#[test]
fn test_field_order_follows_expressions() {
    let exprs = vec![
        ("z".to_string(), RexNode::input_ref(1, PolyType::INTEGER)),
        ("a".to_string(), RexNode::input_ref(0, PolyType::DOUBLE)),
    ];
    let document = project_document(&exprs, &schema()).unwrap();
    let keys: Vec<&str> = document
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["z", "a"]);
}

#[test]
fn test_unit_floor_unsupported() {
    let floor = RexNode::call(
        RexOp::Floor(Some(TimeUnit::Year)),
        vec![RexNode::input_ref(0, PolyType::DOUBLE)],
    );
    assert!(matches!(
        expression(&floor, &schema()),
        Err(DocumentError::UnsupportedExpression { .. })
    ));
}
