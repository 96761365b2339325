//! Vector request emitter
//!
//! Walks a linear chain of Vector-convention operators from the scan up:
//! the scan names the entity, filters become the `where` tree, a projection
//! selects attributes and may carry one DISTANCE call that becomes the kNN
//! request, and a sort on that distance bounds the request.

use crate::error::{VectorError, VectorResult};
use crate::lower::lower_predicate;
use crate::wire::{
    CompoundBooleanPredicate, Distance, Knn, KnnBuilder, LogicalOperator, PredicateNode, Query,
    VectorData, Where,
};
use log::debug;
use pq_algebra::{
    AlgebraError, Convention, Direction, FieldCollation, Predicate, RelNode, RelOp, RelSchema,
    RexNode, RexOp, TypedColumn,
};
use pq_core::VectorConfig;

/// Request being assembled during the walk
#[derive(Debug, Default)]
struct QueryState {
    entity: String,
    /// Source attribute behind each field of the current row; `None` for
    /// the distance column
    columns: Vec<Option<String>>,
    projection: Vec<String>,
    predicate: Option<PredicateNode>,
    knn: Option<KnnBuilder>,
    distance_field: Option<usize>,
    limit: Option<u64>,
    skip: Option<u64>,
}

impl QueryState {
    /// The store applies `where` and kNN before `limit`/`skip`
    fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.skip.is_some()
    }
}

/// Compiles Vector-convention plans into store requests
#[derive(Debug, Clone, Copy)]
pub struct QueryEmitter<'a> {
    config: &'a VectorConfig,
}

impl<'a> QueryEmitter<'a> {
    pub fn new(config: &'a VectorConfig) -> Self {
        Self { config }
    }

    /// Compile the plan rooted at `root`
    pub fn emit(&self, root: &RelNode) -> VectorResult<Query> {
        if *root.convention() != Convention::Vector {
            return Err(VectorError::WrongConvention {
                convention: root.convention().to_string(),
            });
        }
        let mut state = QueryState::default();
        visit(root, &mut state)?;

        let knn = state.knn.map(|builder| {
            // a fetch bounds the neighbours the store has to rank, never
            // beyond the configured bound
            let cap = self.config.default_knn_limit;
            let bounded = match state.limit {
                Some(limit) => {
                    let k = limit.saturating_add(state.skip.unwrap_or(0));
                    builder.k(u32::try_from(k).map_or(cap, |k| k.min(cap)))
                }
                None => builder,
            };
            bounded.build(self.config)
        });
        if let Some(knn) = &knn {
            debug!(
                "kNN on '{}.{}' with k = {} ({:?})",
                state.entity, knn.attribute, knn.k, knn.distance
            );
        }

        Ok(Query {
            entity: state.entity,
            projection: state.projection,
            where_clause: state.predicate.map(Where::from),
            knn,
            limit: state.limit,
            skip: state.skip,
        })
    }
}

fn visit(node: &RelNode, state: &mut QueryState) -> VectorResult<()> {
    match node.op() {
        RelOp::Scan { table, schema } => {
            state.entity = table.clone();
            state.columns = schema
                .column_names()
                .into_iter()
                .map(|name| Some(name.to_string()))
                .collect();
            return Ok(());
        }
        RelOp::Aggregate { .. }
        | RelOp::Join { .. }
        | RelOp::Union { .. }
        | RelOp::Values { .. } => {
            return Err(VectorError::UnsupportedOperator { op: node.kind() });
        }
        _ => {}
    }

    let [input] = node.inputs() else {
        return Err(AlgebraError::InputArity {
            op: node.kind(),
            expected: "1",
            actual: node.inputs().len(),
        }
        .into());
    };
    visit(input, state)?;

    match node.op() {
        RelOp::Filter { condition } => {
            if state.is_paginated() {
                return Err(VectorError::UnsupportedOperator { op: node.kind() });
            }
            let schema = attribute_schema(condition, input.schema(), &state.columns)?;
            let lowered = lower_predicate(&Predicate::from_condition(condition, &schema)?)?;
            state.predicate = Some(match state.predicate.take() {
                Some(existing) => PredicateNode::Compound(CompoundBooleanPredicate::new(
                    LogicalOperator::And,
                    existing,
                    lowered,
                )),
                None => lowered,
            });
        }
        RelOp::Project { exprs } => {
            let ranks = exprs
                .iter()
                .any(|(_, expr)| expr.op() == Some(&RexOp::Distance));
            if ranks && state.is_paginated() {
                return Err(VectorError::UnsupportedOperator { op: node.kind() });
            }
            project(exprs, input.schema(), state)?
        }
        RelOp::Sort {
            collation,
            offset,
            fetch,
        } => {
            check_collation(collation, node.schema(), state.distance_field)?;
            if offset.is_some() {
                state.skip = *offset;
            }
            if fetch.is_some() {
                state.limit = *fetch;
            }
        }
        _ => return Err(VectorError::UnsupportedOperator { op: node.kind() }),
    }
    Ok(())
}

/// Input row type renamed to the stored attributes behind each field, so a
/// condition over projection aliases names what the entity holds
fn attribute_schema(
    condition: &RexNode,
    input: &RelSchema,
    columns: &[Option<String>],
) -> VectorResult<RelSchema> {
    for index in condition.input_refs() {
        if !matches!(columns.get(index), Some(Some(_))) {
            return Err(VectorError::UnsupportedExpression {
                expr: format!("filter on computed field ${index}"),
            });
        }
    }
    let renamed = input
        .columns
        .iter()
        .zip(columns)
        .map(|(column, source)| match source {
            Some(attribute) => TypedColumn {
                name: attribute.clone(),
                ..column.clone()
            },
            None => column.clone(),
        })
        .collect();
    Ok(RelSchema::new(renamed))
}

fn project(
    exprs: &[(String, RexNode)],
    input: &RelSchema,
    state: &mut QueryState,
) -> VectorResult<()> {
    let mut columns = Vec::with_capacity(exprs.len());
    let mut projection = Vec::new();
    let mut distance_field = None;

    for (position, (_, expr)) in exprs.iter().enumerate() {
        match expr {
            RexNode::InputRef { index, .. } => {
                let source = state.columns.get(*index).ok_or(AlgebraError::ColumnOutOfRange {
                    op: "Project",
                    index: *index,
                    width: input.len(),
                })?;
                match source {
                    Some(attribute) => projection.push(attribute.clone()),
                    None => distance_field = Some(position),
                }
                columns.push(source.clone());
            }
            RexNode::Call {
                op: RexOp::Distance,
                operands,
                ..
            } => {
                if state.knn.is_some() {
                    return Err(VectorError::InvalidKnn {
                        message: "more than one DISTANCE call".to_string(),
                    });
                }
                state.knn = Some(knn_request(operands, &state.columns)?);
                distance_field = Some(position);
                columns.push(None);
            }
            other => {
                return Err(VectorError::UnsupportedExpression {
                    expr: format!("{other:?}"),
                })
            }
        }
    }

    state.columns = columns;
    state.projection = projection;
    state.distance_field = distance_field;
    Ok(())
}

/// DISTANCE(field, query vector, metric name[, weights])
fn knn_request(operands: &[RexNode], columns: &[Option<String>]) -> VectorResult<KnnBuilder> {
    let (field, query, metric, weights) = match operands {
        [field, query, metric] => (field, query, metric, None),
        [field, query, metric, weights] => (field, query, metric, Some(weights)),
        _ => {
            return Err(VectorError::InvalidKnn {
                message: format!("DISTANCE takes 3 or 4 operands, got {}", operands.len()),
            })
        }
    };

    let attribute = field
        .as_input_ref()
        .and_then(|index| columns.get(index).cloned().flatten())
        .ok_or_else(|| VectorError::InvalidKnn {
            message: "first operand must be a stored attribute".to_string(),
        })?;
    let distance: Distance = match metric.as_literal() {
        Some(pq_core::Value::String(name)) => name.to_uppercase().parse()?,
        _ => {
            return Err(VectorError::InvalidKnn {
                message: "metric must be a string literal".to_string(),
            })
        }
    };

    let mut builder = Knn::builder(attribute, distance).query(vector_literal(query, "query")?);
    if let Some(weights) = weights {
        builder = builder.weights(vector_literal(weights, "weights")?);
    }
    Ok(builder)
}

fn vector_literal(expr: &RexNode, role: &str) -> VectorResult<VectorData> {
    match expr.as_literal() {
        Some(pq_core::Value::Array(items)) => VectorData::from_values(items),
        _ => Err(VectorError::InvalidKnn {
            message: format!("{role} must be an array literal"),
        }),
    }
}

/// The store only returns results ordered by ascending distance
fn check_collation(
    collation: &[FieldCollation],
    schema: &RelSchema,
    distance_field: Option<usize>,
) -> VectorResult<()> {
    for c in collation {
        if Some(c.field) != distance_field || c.direction != Direction::Ascending {
            let field = schema
                .column(c.field)
                .map_or_else(|| format!("${}", c.field), |column| column.name.clone());
            return Err(VectorError::UnsupportedSort { field });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
