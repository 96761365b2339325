use super::*;
use pq_algebra::{JoinType, RexNode, RexOp, TypedColumn};
use pq_core::{PolyType, Value};
use pretty_assertions::assert_eq;

fn orders() -> RelNode {
    let schema = RelSchema::new(vec![
        TypedColumn::new("region", PolyType::VARCHAR, false),
        TypedColumn::new("product", PolyType::VARCHAR, false),
        TypedColumn::new("amount", PolyType::INTEGER, true),
    ]);
    RelNode::scan("orders", schema, Convention::Document).unwrap()
}

fn emit(node: &RelNode) -> DocumentResult<Pipeline> {
    PipelineEmitter::new(&DocumentConfig::default()).emit(node)
}

#[test]
fn test_scan_has_no_stage() {
    let pipeline = emit(&orders()).unwrap();
    assert_eq!(pipeline.collection(), "orders");
    assert!(pipeline.is_empty());
}

#[test]
fn test_single_key_group() {
    let agg = RelNode::aggregate(
        orders(),
        vec![0],
        vec![
            AggregateCall::new(AggFunction::Count, vec![]).named("n"),
            AggregateCall::new(AggFunction::Sum, vec![2]).named("total"),
        ],
    )
    .unwrap();
    let pipeline = emit(&agg).unwrap();
    assert_eq!(
        pipeline.stages(),
        &[
            json!({ "$group": {
                "_id": "$region",
                "n": { "$sum": 1 },
                "total": { "$sum": "$amount" }
            } }),
            json!({ "$project": { "region": "$_id", "n": "$n", "total": "$total" } }),
        ]
    );
}

#[test]
fn test_composite_key_group() {
    let agg = RelNode::aggregate(
        orders(),
        vec![0, 1],
        vec![AggregateCall::new(AggFunction::Max, vec![2]).named("top")],
    )
    .unwrap();
    let pipeline = emit(&agg).unwrap();
    assert_eq!(
        pipeline.stages(),
        &[
            json!({ "$group": {
                "_id": { "region": "$region", "product": "$product" },
                "top": { "$max": "$amount" }
            } }),
            json!({ "$project": {
                "_id": 0,
                "region": "$_id.region",
                "product": "$_id.product",
                "top": "$top"
            } }),
        ]
    );
}

#[test]
fn test_ungrouped_aggregate_has_no_fixup() {
    let agg = RelNode::aggregate(
        orders(),
        vec![],
        vec![AggregateCall::new(AggFunction::Avg, vec![2]).named("mean")],
    )
    .unwrap();
    let pipeline = emit(&agg).unwrap();
    assert_eq!(
        pipeline.stages(),
        &[json!({ "$group": { "_id": null, "mean": { "$avg": "$amount" } } })]
    );
}

#[test]
fn test_count_column_skips_nulls() {
    let agg = RelNode::aggregate(
        orders(),
        vec![],
        vec![AggregateCall::new(AggFunction::Count, vec![2]).named("c")],
    )
    .unwrap();
    let pipeline = emit(&agg).unwrap();
    assert_eq!(
        pipeline.stages()[0]["$group"]["c"],
        json!({ "$sum": { "$cond": [ { "$eq": ["$amount", null] }, 0, 1 ] } })
    );
}

#[test]
fn test_single_value_compiled_as_sum() {
    // known limitation: the single-row check is not enforced
    let agg = RelNode::aggregate(
        orders(),
        vec![],
        vec![AggregateCall::new(AggFunction::SingleValue, vec![2]).named("v")],
    )
    .unwrap();
    let pipeline = emit(&agg).unwrap();
    assert_eq!(pipeline.stages()[0]["$group"]["v"], json!({ "$sum": "$amount" }));

    let strict = DocumentConfig {
        single_value_as_sum: false,
    };
    assert!(matches!(
        PipelineEmitter::new(&strict).emit(&agg),
        Err(DocumentError::UnsupportedAggregate { .. })
    ));
}

#[test]
fn test_unknown_aggregate_rejected() {
    let agg = RelNode::aggregate(
        orders(),
        vec![0],
        vec![AggregateCall::new(
            AggFunction::Other {
                name: "STDDEV".into(),
                return_type: PolyType::DOUBLE,
            },
            vec![2],
        )],
    )
    .unwrap();
    let Err(DocumentError::UnsupportedAggregate { function }) = emit(&agg) else {
        panic!("expected an unsupported aggregate error");
    };
    assert_eq!(function, "STDDEV");
}

#[test]
fn test_filter_sort_and_page() {
    let filter = RelNode::filter(
        orders(),
        RexNode::call(
            RexOp::GreaterThan,
            vec![
                RexNode::input_ref(2, PolyType::INTEGER),
                RexNode::literal(Value::Integer(100)),
            ],
        ),
    )
    .unwrap();
    let sorted = RelNode::sort(
        filter,
        vec![FieldCollation::desc(2), FieldCollation::asc(0)],
        Some(10),
        Some(5),
    )
    .unwrap();
    let pipeline = emit(&sorted).unwrap();
    assert_eq!(
        pipeline.to_stage_strings(),
        vec![
            r#"{"$match":{"amount":{"$gt":100}}}"#,
            r#"{"$sort":{"amount":-1,"region":1}}"#,
            r#"{"$skip":10}"#,
            r#"{"$limit":5}"#,
        ]
    );
}

#[test]
fn test_join_unsupported() {
    let join = RelNode::join(
        orders(),
        orders(),
        JoinType::Inner,
        RexNode::call(
            RexOp::Equals,
            vec![
                RexNode::input_ref(0, PolyType::VARCHAR),
                RexNode::input_ref(3, PolyType::VARCHAR),
            ],
        ),
    )
    .unwrap();
    assert!(matches!(
        emit(&join),
        Err(DocumentError::UnsupportedOperator { op: "Join" })
    ));
}

#[test]
fn test_wrong_convention() {
    let scan = RelNode::scan("orders", RelSchema::empty(), Convention::Vector).unwrap();
    assert!(matches!(
        emit(&scan),
        Err(DocumentError::WrongConvention { .. })
    ));
}
