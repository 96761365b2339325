use super::*;

fn int_ref(index: usize) -> RexNode {
    RexNode::input_ref(index, PolyType::INTEGER)
}

#[test]
fn test_comparison_is_boolean() {
    let expr = RexNode::call(
        RexOp::LessThan,
        vec![int_ref(0), RexNode::literal(Value::Integer(5))],
    );
    assert_eq!(expr.resolved_type(), &PolyType::Boolean);
    assert_eq!(expr.to_string(), "<($0, 5)");
}

#[test]
fn test_arithmetic_widens() {
    let expr = RexNode::call(
        RexOp::Plus,
        vec![
            RexNode::input_ref(0, PolyType::SMALLINT),
            RexNode::literal(Value::BigInt(1)),
        ],
    );
    assert_eq!(expr.resolved_type(), &PolyType::BIGINT);

    let mixed = RexNode::call(
        RexOp::Times,
        vec![int_ref(0), RexNode::literal(Value::Real(2.0))],
    );
    assert_eq!(mixed.resolved_type(), &PolyType::DOUBLE);
}

#[test]
fn test_cast_uses_target_type() {
    let expr = RexNode::cast(int_ref(1), PolyType::VARCHAR);
    assert_eq!(expr.resolved_type(), &PolyType::VARCHAR);
    assert_eq!(expr.to_string(), "CAST($1):VARCHAR");
}

#[test]
fn test_floor_with_unit_display() {
    let expr = RexNode::call(
        RexOp::Floor(Some(TimeUnit::Year)),
        vec![RexNode::input_ref(2, PolyType::Timestamp)],
    );
    assert_eq!(expr.resolved_type(), &PolyType::Timestamp);
    assert_eq!(expr.to_string(), "FLOOR($2 TO YEAR)");
}

#[test]
fn test_input_refs_in_encounter_order() {
    let expr = RexNode::call(
        RexOp::And,
        vec![
            RexNode::call(RexOp::IsNull, vec![int_ref(3)]),
            RexNode::call(RexOp::Equals, vec![int_ref(1), int_ref(3)]),
        ],
    );
    assert_eq!(expr.input_refs(), vec![3, 1, 3]);
    assert_eq!(expr.find_invalid_ref(4), None);
    assert_eq!(expr.find_invalid_ref(2), Some(3));
}

#[test]
fn test_mirror() {
    assert_eq!(RexOp::LessThan.mirror(), Some(RexOp::GreaterThan));
    assert_eq!(RexOp::Equals.mirror(), Some(RexOp::Equals));
    assert_eq!(RexOp::Like.mirror(), None);
}
