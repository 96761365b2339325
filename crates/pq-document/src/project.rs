//! `$project` documents and pipeline expressions from row expressions

use crate::encode::encode_value;
use crate::error::{DocumentError, DocumentResult};
use pq_algebra::{RelSchema, RexNode, RexOp};
use serde_json::{json, Map, Value as JsonValue};

/// Field path of an input column, `$name`
pub(crate) fn field_path(schema: &RelSchema, index: usize) -> DocumentResult<String> {
    Ok(format!("${}", field_name(schema, index)?))
}

pub(crate) fn field_name(schema: &RelSchema, index: usize) -> DocumentResult<&str> {
    schema
        .column(index)
        .map(|c| c.name.as_str())
        .ok_or_else(|| {
            DocumentError::Algebra(pq_algebra::AlgebraError::ColumnOutOfRange {
                op: "Project",
                index,
                width: schema.len(),
            })
        })
}

/// Build the body of a `$project` stage. A field passed through under its
/// own name is included with `1`; everything else is computed.
pub fn project_document(
    exprs: &[(String, RexNode)],
    input: &RelSchema,
) -> DocumentResult<JsonValue> {
    let mut document = Map::new();
    for (name, expr) in exprs {
        let value = match expr.as_input_ref() {
            Some(index) if field_name(input, index)? == name => json!(1),
            _ => expression(expr, input)?,
        };
        document.insert(name.clone(), value);
    }
    Ok(JsonValue::Object(document))
}

/// Translate a row expression into a pipeline expression
pub fn expression(expr: &RexNode, input: &RelSchema) -> DocumentResult<JsonValue> {
    match expr {
        RexNode::InputRef { index, .. } => Ok(json!(field_path(input, *index)?)),
        RexNode::Literal { value, .. } => Ok(json!({ "$literal": encode_value(value)? })),
        RexNode::Call { op, operands, .. } => {
            let args = operands
                .iter()
                .map(|o| expression(o, input))
                .collect::<DocumentResult<Vec<_>>>()?;
            let operator = match op {
                RexOp::Plus => "$add",
                RexOp::Minus => "$subtract",
                RexOp::Times => "$multiply",
                RexOp::Divide => "$divide",
                RexOp::Equals => "$eq",
                RexOp::NotEquals => "$ne",
                RexOp::LessThan => "$lt",
                RexOp::LessThanOrEqual => "$lte",
                RexOp::GreaterThan => "$gt",
                RexOp::GreaterThanOrEqual => "$gte",
                RexOp::And => "$and",
                RexOp::Or => "$or",
                RexOp::Not => "$not",
                RexOp::Floor(None) => "$floor",
                RexOp::Ceil(None) => "$ceil",
                RexOp::IsNull | RexOp::IsNotNull => {
                    let [arg] = <[JsonValue; 1]>::try_from(args).map_err(|_| unsupported(expr))?;
                    let operator = if *op == RexOp::IsNull { "$eq" } else { "$ne" };
                    return Ok(json!({ operator: [arg, null] }));
                }
                _ => return Err(unsupported(expr)),
            };
            Ok(json!({ operator: args }))
        }
    }
}

fn unsupported(expr: &RexNode) -> DocumentError {
    DocumentError::UnsupportedExpression {
        expr: expr.to_string(),
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
