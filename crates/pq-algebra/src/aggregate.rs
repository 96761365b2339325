//! Aggregate call descriptors and grouping classification

use crate::error::{AlgebraError, AlgebraResult};
use crate::schema::RelSchema;
use pq_core::{FloatBitWidth, PolyType};
use serde::{Deserialize, Serialize};

/// Aggregate function identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggFunction {
    /// COUNT(*) or COUNT(x)
    Count,
    /// SUM, NULL over an empty input
    Sum,
    /// SUM that yields 0 over an empty input (`$SUM0`)
    SumEmptyIsZero,
    Min,
    Max,
    Avg,
    /// Placeholder for a sub-query expected to produce exactly one row
    SingleValue,
    /// Any other aggregate, with its declared return type
    Other { name: String, return_type: PolyType },
}

impl AggFunction {
    /// Function name as written in SQL and plan explain output
    pub fn name(&self) -> &str {
        match self {
            AggFunction::Count => "COUNT",
            AggFunction::Sum => "SUM",
            AggFunction::SumEmptyIsZero => "$SUM0",
            AggFunction::Min => "MIN",
            AggFunction::Max => "MAX",
            AggFunction::Avg => "AVG",
            AggFunction::SingleValue => "SINGLE_VALUE",
            AggFunction::Other { name, .. } => name,
        }
    }

    fn check_arity(&self, actual: usize) -> AlgebraResult<()> {
        let (ok, expected) = match self {
            AggFunction::Count => (actual <= 1, "0 or 1"),
            AggFunction::Other { .. } => (true, "any"),
            _ => (actual == 1, "1"),
        };
        if ok {
            Ok(())
        } else {
            Err(AlgebraError::InvalidAggregateCall {
                function: self.name().to_string(),
                expected,
                actual,
            })
        }
    }
}

impl std::fmt::Display for AggFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One aggregate call of an Aggregate operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCall {
    /// Aggregate function identity
    pub function: AggFunction,
    /// Input field indices, in argument order
    pub args: Vec<usize>,
    /// DISTINCT aggregation
    pub distinct: bool,
    /// Output field name; generated from the output position when absent
    pub name: Option<String>,
}

impl AggregateCall {
    pub fn new(function: AggFunction, args: Vec<usize>) -> Self {
        Self {
            function,
            args,
            distinct: false,
            name: None,
        }
    }

    /// Same call with DISTINCT set
    pub fn distinct(self) -> Self {
        Self {
            distinct: true,
            ..self
        }
    }

    /// Same call with an explicit output name
    pub fn named(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Check argument count and argument field indices against the input row
    pub fn validate(&self, input: &RelSchema) -> AlgebraResult<()> {
        self.function.check_arity(self.args.len())?;
        if let Some(&index) = self.args.iter().find(|&&i| i >= input.len()) {
            return Err(AlgebraError::ColumnOutOfRange {
                op: "Aggregate",
                index,
                width: input.len(),
            });
        }
        Ok(())
    }

    /// Result type over the given input row. Assumes [`validate`](Self::validate) passed.
    pub fn return_type(&self, input: &RelSchema) -> PolyType {
        let arg_type = self
            .args
            .first()
            .and_then(|&i| input.column(i))
            .map(|c| c.poly_type.clone())
            .unwrap_or(PolyType::Null);
        match &self.function {
            AggFunction::Count => PolyType::BIGINT,
            AggFunction::Sum | AggFunction::SumEmptyIsZero => match arg_type {
                PolyType::Integer { .. } => PolyType::BIGINT,
                PolyType::Float { .. } => PolyType::Float {
                    bits: FloatBitWidth::F64,
                },
                other => other,
            },
            AggFunction::Min | AggFunction::Max | AggFunction::Avg | AggFunction::SingleValue => {
                arg_type
            }
            AggFunction::Other { return_type, .. } => return_type.clone(),
        }
    }

    /// Whether the result may be NULL
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self.function,
            AggFunction::Count | AggFunction::SumEmptyIsZero
        )
    }
}

impl std::fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.function)?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "${arg}")?;
        }
        write!(f, ")")
    }
}

/// Grouping mode of an Aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupType {
    /// One flat grouping set equal to the group set
    Simple,
    /// Every prefix of the group set, longest first
    Rollup,
    /// Every subset of the group set
    Cube,
    /// Arbitrary grouping sets
    Other,
}

impl GroupType {
    /// Classify the grouping sets relative to the (sorted) group set
    pub fn classify(group_set: &[usize], group_sets: Option<&[Vec<usize>]>) -> GroupType {
        let sets = match group_sets {
            None => return GroupType::Simple,
            Some(sets) => sets,
        };
        if sets.len() == 1 && sets[0] == group_set {
            return GroupType::Simple;
        }
        let n = group_set.len();
        if sets.len() == n + 1
            && sets
                .iter()
                .enumerate()
                .all(|(i, set)| set.as_slice() == &group_set[..n - i])
        {
            return GroupType::Rollup;
        }
        if n < usize::BITS as usize && sets.len() == 1 << n {
            let mut masks: Vec<usize> = sets
                .iter()
                .filter_map(|set| subset_mask(group_set, set))
                .collect();
            masks.sort_unstable();
            masks.dedup();
            if masks.len() == sets.len() {
                return GroupType::Cube;
            }
        }
        GroupType::Other
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupType::Simple => write!(f, "SIMPLE"),
            GroupType::Rollup => write!(f, "ROLLUP"),
            GroupType::Cube => write!(f, "CUBE"),
            GroupType::Other => write!(f, "OTHER"),
        }
    }
}

/// Bit mask of `set` within `group_set`, `None` when not a subset
fn subset_mask(group_set: &[usize], set: &[usize]) -> Option<usize> {
    set.iter().try_fold(0usize, |mask, field| {
        group_set
            .iter()
            .position(|g| g == field)
            .map(|pos| mask | (1 << pos))
    })
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
