//! Relational operator nodes: the IR plan tree
//!
//! A [`RelNode`] owns its inputs exclusively, so a plan is a strict tree.
//! Nodes are immutable: construction validates the payload against the
//! inputs and derives the row type once. Rewrites go through
//! [`RelNode::copy`] / [`RelNode::copy_with`], which rebuild the node with
//! the same convention and recompute its row type.

use crate::aggregate::{AggregateCall, GroupType};
use crate::convention::Convention;
use crate::error::{AlgebraError, AlgebraResult};
use crate::rex::RexNode;
use crate::schema::{RelSchema, TypedColumn};
use log::debug;
use pq_core::{PolyType, Value};
use serde::{Deserialize, Serialize};

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
            JoinType::Full => write!(f, "full"),
        }
    }
}

/// Sort direction of one collation field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Placement of NULLs within one collation field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullDirection {
    First,
    Last,
    Unspecified,
}

/// One (field, direction) pair of a Sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCollation {
    pub field: usize,
    pub direction: Direction,
    pub nulls: NullDirection,
}

impl FieldCollation {
    pub fn asc(field: usize) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
            nulls: NullDirection::Unspecified,
        }
    }

    pub fn desc(field: usize) -> Self {
        Self {
            field,
            direction: Direction::Descending,
            nulls: NullDirection::Unspecified,
        }
    }
}

impl std::fmt::Display for FieldCollation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field)?;
        if self.direction == Direction::Descending {
            write!(f, " DESC")?;
        }
        match self.nulls {
            NullDirection::First => write!(f, " NULLS FIRST"),
            NullDirection::Last => write!(f, " NULLS LAST"),
            NullDirection::Unspecified => Ok(()),
        }
    }
}

/// Operator kind with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelOp {
    /// Read a named table or collection
    Scan { table: String, schema: RelSchema },

    /// Keep rows satisfying a boolean condition
    Filter { condition: RexNode },

    /// Compute output fields: (output name, expression)
    Project { exprs: Vec<(String, RexNode)> },

    /// Group by `group_set` and compute `calls` per group
    Aggregate {
        /// Grouped input fields, sorted and deduplicated
        group_set: Vec<usize>,
        /// Grouping sets; `None` means the single set `group_set`
        group_sets: Option<Vec<Vec<usize>>>,
        calls: Vec<AggregateCall>,
    },

    /// Join two inputs on a condition over the concatenated row
    Join {
        join_type: JoinType,
        condition: RexNode,
    },

    /// Order rows, optionally skipping `offset` and keeping `fetch`
    Sort {
        collation: Vec<FieldCollation>,
        offset: Option<u64>,
        fetch: Option<u64>,
    },

    /// Concatenate inputs with identical row types
    Union { all: bool },

    /// Inline rows
    Values {
        schema: RelSchema,
        tuples: Vec<Vec<Value>>,
    },
}

impl RelOp {
    /// Operator kind name
    pub fn kind(&self) -> &'static str {
        match self {
            RelOp::Scan { .. } => "Scan",
            RelOp::Filter { .. } => "Filter",
            RelOp::Project { .. } => "Project",
            RelOp::Aggregate { .. } => "Aggregate",
            RelOp::Join { .. } => "Join",
            RelOp::Sort { .. } => "Sort",
            RelOp::Union { .. } => "Union",
            RelOp::Values { .. } => "Values",
        }
    }
}

/// A relational operator node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelNode {
    op: RelOp,
    inputs: Vec<RelNode>,
    schema: RelSchema,
    convention: Convention,
}

impl RelNode {
    /// Build a node, validating the payload against its inputs.
    ///
    /// Every input must carry the same convention as the new node.
    pub fn new(op: RelOp, inputs: Vec<RelNode>, convention: Convention) -> AlgebraResult<Self> {
        check_arity(&op, inputs.len())?;
        if let Some(input) = inputs.iter().find(|i| i.convention != convention) {
            return Err(AlgebraError::ConventionMismatch {
                op: op.kind(),
                parent: convention.to_string(),
                input: input.convention.to_string(),
            });
        }
        let op = normalize(op);
        let schema = derive_schema(&op, &inputs, &convention)?;
        Ok(Self {
            op,
            inputs,
            schema,
            convention,
        })
    }

    /// Leaf scan of a table with a known row type
    pub fn scan(
        table: impl Into<String>,
        schema: RelSchema,
        convention: Convention,
    ) -> AlgebraResult<Self> {
        Self::new(
            RelOp::Scan {
                table: table.into(),
                schema,
            },
            Vec::new(),
            convention,
        )
    }

    /// Inline rows
    pub fn values(
        schema: RelSchema,
        tuples: Vec<Vec<Value>>,
        convention: Convention,
    ) -> AlgebraResult<Self> {
        Self::new(RelOp::Values { schema, tuples }, Vec::new(), convention)
    }

    /// Filter on top of `input`, inheriting its convention
    pub fn filter(input: RelNode, condition: RexNode) -> AlgebraResult<Self> {
        Self::on_top(RelOp::Filter { condition }, vec![input])
    }

    /// Projection on top of `input`
    pub fn project(input: RelNode, exprs: Vec<(String, RexNode)>) -> AlgebraResult<Self> {
        Self::on_top(RelOp::Project { exprs }, vec![input])
    }

    /// Aggregate with a single flat grouping set
    pub fn aggregate(
        input: RelNode,
        group_set: Vec<usize>,
        calls: Vec<AggregateCall>,
    ) -> AlgebraResult<Self> {
        Self::on_top(
            RelOp::Aggregate {
                group_set,
                group_sets: None,
                calls,
            },
            vec![input],
        )
    }

    /// Join of two inputs
    pub fn join(
        left: RelNode,
        right: RelNode,
        join_type: JoinType,
        condition: RexNode,
    ) -> AlgebraResult<Self> {
        Self::on_top(
            RelOp::Join {
                join_type,
                condition,
            },
            vec![left, right],
        )
    }

    /// Sort with optional offset and fetch
    pub fn sort(
        input: RelNode,
        collation: Vec<FieldCollation>,
        offset: Option<u64>,
        fetch: Option<u64>,
    ) -> AlgebraResult<Self> {
        Self::on_top(
            RelOp::Sort {
                collation,
                offset,
                fetch,
            },
            vec![input],
        )
    }

    /// Union of two or more inputs
    pub fn union(inputs: Vec<RelNode>, all: bool) -> AlgebraResult<Self> {
        Self::on_top(RelOp::Union { all }, inputs)
    }

    fn on_top(op: RelOp, inputs: Vec<RelNode>) -> AlgebraResult<Self> {
        let convention = match inputs.first() {
            Some(input) => input.convention.clone(),
            None => {
                return Err(AlgebraError::InputArity {
                    op: op.kind(),
                    expected: expected_arity(&op),
                    actual: 0,
                })
            }
        };
        Self::new(op, inputs, convention)
    }

    /// Same operator and payload over replacement inputs
    pub fn copy(&self, inputs: Vec<RelNode>) -> AlgebraResult<Self> {
        Self::new(self.op.clone(), inputs, self.convention.clone())
    }

    /// Replacement payload of the same kind over replacement inputs
    pub fn copy_with(&self, op: RelOp, inputs: Vec<RelNode>) -> AlgebraResult<Self> {
        if std::mem::discriminant(&op) != std::mem::discriminant(&self.op) {
            return Err(AlgebraError::KindMismatch {
                expected: self.op.kind(),
                actual: op.kind(),
            });
        }
        Self::new(op, inputs, self.convention.clone())
    }

    /// Bottom-up rewrite.
    ///
    /// Children are rewritten first, the node is copied over the rewritten
    /// children, then `rule` is applied to the copy.
    pub fn transform<F>(self, rule: &mut F) -> AlgebraResult<RelNode>
    where
        F: FnMut(RelNode) -> AlgebraResult<RelNode>,
    {
        let RelNode {
            op,
            inputs,
            convention,
            ..
        } = self;
        let inputs = inputs
            .into_iter()
            .map(|input| input.transform(rule))
            .collect::<AlgebraResult<Vec<_>>>()?;
        let copied = RelNode::new(op, inputs, convention)?;
        rule(copied)
    }

    pub fn op(&self) -> &RelOp {
        &self.op
    }

    pub fn kind(&self) -> &'static str {
        self.op.kind()
    }

    pub fn inputs(&self) -> &[RelNode] {
        &self.inputs
    }

    /// Input at position `i`
    pub fn input(&self, i: usize) -> Option<&RelNode> {
        self.inputs.get(i)
    }

    /// Output row type
    pub fn schema(&self) -> &RelSchema {
        &self.schema
    }

    pub fn convention(&self) -> &Convention {
        &self.convention
    }

    /// Grouping mode, for Aggregate nodes
    pub fn group_type(&self) -> Option<GroupType> {
        match &self.op {
            RelOp::Aggregate {
                group_set,
                group_sets,
                ..
            } => Some(GroupType::classify(group_set, group_sets.as_deref())),
            _ => None,
        }
    }

    fn explain(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        write!(f, "{:indent$}{}(", "", self.kind(), indent = depth * 2)?;
        match &self.op {
            RelOp::Scan { table, .. } => write!(f, "table=[{table}]")?,
            RelOp::Filter { condition } => write!(f, "condition=[{condition}]")?,
            RelOp::Project { exprs } => {
                for (i, (name, expr)) in exprs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}=[{expr}]")?;
                }
            }
            RelOp::Aggregate {
                group_set, calls, ..
            } => {
                write!(f, "group=[{{{}}}]", join_display(group_set, ", "))?;
                let names = self.schema.columns.iter().skip(group_set.len());
                for (call, column) in calls.iter().zip(names) {
                    write!(f, ", {}=[{call}]", column.name)?;
                }
            }
            RelOp::Join {
                join_type,
                condition,
            } => write!(f, "condition=[{condition}], joinType=[{join_type}]")?,
            RelOp::Sort {
                collation,
                offset,
                fetch,
            } => {
                write!(f, "sort=[{}]", join_display(collation, ", "))?;
                if let Some(offset) = offset {
                    write!(f, ", offset=[{offset}]")?;
                }
                if let Some(fetch) = fetch {
                    write!(f, ", fetch=[{fetch}]")?;
                }
            }
            RelOp::Union { all } => write!(f, "all=[{all}]")?,
            RelOp::Values { tuples, .. } => write!(f, "tuples=[{}]", tuples.len())?,
        }
        writeln!(f, ")")?;
        for input in &self.inputs {
            input.explain(f, depth + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for RelNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.explain(f, 0)
    }
}

fn join_display<T: std::fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

fn expected_arity(op: &RelOp) -> &'static str {
    match op {
        RelOp::Scan { .. } | RelOp::Values { .. } => "0",
        RelOp::Join { .. } => "2",
        RelOp::Union { .. } => "2 or more",
        _ => "1",
    }
}

fn check_arity(op: &RelOp, actual: usize) -> AlgebraResult<()> {
    let ok = match op {
        RelOp::Scan { .. } | RelOp::Values { .. } => actual == 0,
        RelOp::Join { .. } => actual == 2,
        RelOp::Union { .. } => actual >= 2,
        _ => actual == 1,
    };
    if ok {
        Ok(())
    } else {
        Err(AlgebraError::InputArity {
            op: op.kind(),
            expected: expected_arity(op),
            actual,
        })
    }
}

/// Canonical payload form: group sets are sorted and deduplicated
fn normalize(op: RelOp) -> RelOp {
    match op {
        RelOp::Aggregate {
            mut group_set,
            group_sets,
            calls,
        } => {
            group_set.sort_unstable();
            group_set.dedup();
            let group_sets = group_sets.map(|sets| {
                sets.into_iter()
                    .map(|mut set| {
                        set.sort_unstable();
                        set.dedup();
                        set
                    })
                    .collect()
            });
            RelOp::Aggregate {
                group_set,
                group_sets,
                calls,
            }
        }
        other => other,
    }
}

fn check_condition(op: &'static str, condition: &RexNode, width: usize) -> AlgebraResult<()> {
    if let Some(index) = condition.find_invalid_ref(width) {
        return Err(AlgebraError::ColumnOutOfRange { op, index, width });
    }
    if condition.resolved_type() != &PolyType::Boolean {
        return Err(AlgebraError::InvalidCondition {
            op,
            found: condition.resolved_type().clone(),
        });
    }
    Ok(())
}

fn derive_schema(
    op: &RelOp,
    inputs: &[RelNode],
    convention: &Convention,
) -> AlgebraResult<RelSchema> {
    // arity was checked by the caller
    let first = inputs.first().map(RelNode::schema);
    let input_schema = || first.cloned().unwrap_or_default();

    match op {
        RelOp::Scan { schema, .. } => Ok(schema.clone()),

        RelOp::Values { schema, tuples } => {
            for (row, tuple) in tuples.iter().enumerate() {
                if tuple.len() != schema.len() {
                    return Err(AlgebraError::SchemaMismatch {
                        op: "Values",
                        message: format!(
                            "row {row} has {} value(s), row type has {}",
                            tuple.len(),
                            schema.len()
                        ),
                    });
                }
                for (value, column) in tuple.iter().zip(&schema.columns) {
                    if !value.matches_type(&column.poly_type) {
                        return Err(AlgebraError::SchemaMismatch {
                            op: "Values",
                            message: format!(
                                "row {row} value {value} does not match {} {}",
                                column.name, column.poly_type
                            ),
                        });
                    }
                }
            }
            Ok(schema.clone())
        }

        RelOp::Filter { condition } => {
            let schema = input_schema();
            check_condition("Filter", condition, schema.len())?;
            Ok(schema)
        }

        RelOp::Project { exprs } => {
            let width = input_schema().len();
            let mut columns = Vec::with_capacity(exprs.len());
            for (name, expr) in exprs {
                if let Some(index) = expr.find_invalid_ref(width) {
                    return Err(AlgebraError::ColumnOutOfRange {
                        op: "Project",
                        index,
                        width,
                    });
                }
                let nullable = match expr {
                    RexNode::InputRef { index, .. } => first
                        .and_then(|s| s.column(*index))
                        .map(|c| c.nullable)
                        .unwrap_or(true),
                    RexNode::Literal { value, .. } => value.is_null(),
                    RexNode::Call { .. } => true,
                };
                columns.push(TypedColumn::new(
                    name.clone(),
                    expr.resolved_type().clone(),
                    nullable,
                ));
            }
            Ok(RelSchema::new(columns))
        }

        RelOp::Aggregate {
            group_set,
            group_sets,
            calls,
        } => {
            let input = input_schema();
            if let Some(&index) = group_set.iter().find(|&&i| i >= input.len()) {
                return Err(AlgebraError::ColumnOutOfRange {
                    op: "Aggregate",
                    index,
                    width: input.len(),
                });
            }
            if let Some(sets) = group_sets {
                if sets.is_empty() {
                    return Err(AlgebraError::InvalidGroupingSet {
                        message: "at least one grouping set is required".to_string(),
                    });
                }
                if let Some(set) = sets
                    .iter()
                    .find(|set| set.iter().any(|f| !group_set.contains(f)))
                {
                    return Err(AlgebraError::InvalidGroupingSet {
                        message: format!("{set:?} is not a subset of the group set {group_set:?}"),
                    });
                }
            }
            for call in calls {
                call.validate(&input)?;
            }

            if !convention.supports_distinct_aggregates() {
                if let Some(call) = calls.iter().find(|c| c.distinct) {
                    debug!("Rejecting {call} for {convention} aggregate");
                    return Err(AlgebraError::UnsupportedAggregate {
                        convention: convention.to_string(),
                        reason: format!("distinct aggregation {call}"),
                    });
                }
            }
            let group_type = GroupType::classify(group_set, group_sets.as_deref());
            if group_type != GroupType::Simple && !convention.supports_grouping_sets() {
                debug!("Rejecting {group_type} grouping for {convention} aggregate");
                return Err(AlgebraError::UnsupportedAggregate {
                    convention: convention.to_string(),
                    reason: format!("{group_type} grouping"),
                });
            }

            let mut columns = Vec::with_capacity(group_set.len() + calls.len());
            for &index in group_set {
                if let Some(column) = input.column(index) {
                    let mut column = column.clone();
                    // rows of coarser grouping sets carry NULL keys
                    if group_type != GroupType::Simple {
                        column.nullable = true;
                    }
                    columns.push(column);
                }
            }
            for call in calls {
                let name = call
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("$f{}", columns.len()));
                columns.push(TypedColumn::new(
                    name,
                    call.return_type(&input),
                    call.is_nullable(),
                ));
            }
            Ok(RelSchema::new(columns))
        }

        RelOp::Join {
            join_type,
            condition,
        } => {
            let (left, right) = match inputs {
                [left, right] => (left.schema(), right.schema()),
                _ => {
                    return Err(AlgebraError::InputArity {
                        op: "Join",
                        expected: "2",
                        actual: inputs.len(),
                    })
                }
            };
            check_condition("Join", condition, left.len() + right.len())?;
            let (left, right) = match join_type {
                JoinType::Inner => (left.clone(), right.clone()),
                JoinType::Left => (left.clone(), right.as_nullable()),
                JoinType::Right => (left.as_nullable(), right.clone()),
                JoinType::Full => (left.as_nullable(), right.as_nullable()),
            };
            Ok(RelSchema::merge(&left, &right))
        }

        RelOp::Sort { collation, .. } => {
            let schema = input_schema();
            if let Some(c) = collation.iter().find(|c| c.field >= schema.len()) {
                return Err(AlgebraError::ColumnOutOfRange {
                    op: "Sort",
                    index: c.field,
                    width: schema.len(),
                });
            }
            Ok(schema)
        }

        RelOp::Union { .. } => {
            let mut schema = input_schema();
            for (i, input) in inputs.iter().enumerate().skip(1) {
                let other = input.schema();
                if other.len() != schema.len() {
                    return Err(AlgebraError::SchemaMismatch {
                        op: "Union",
                        message: format!(
                            "input {i} has {} field(s), input 0 has {}",
                            other.len(),
                            schema.len()
                        ),
                    });
                }
                for (column, theirs) in schema.columns.iter_mut().zip(&other.columns) {
                    if column.poly_type.type_name() != theirs.poly_type.type_name() {
                        return Err(AlgebraError::SchemaMismatch {
                            op: "Union",
                            message: format!(
                                "field {} is {} in input 0 but {} in input {i}",
                                column.name, column.poly_type, theirs.poly_type
                            ),
                        });
                    }
                    column.nullable |= theirs.nullable;
                }
            }
            Ok(schema)
        }
    }
}

#[cfg(test)]
#[path = "relnode_test.rs"]
mod tests;
