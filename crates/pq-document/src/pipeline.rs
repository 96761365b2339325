//! Aggregation pipeline emitter
//!
//! Walks a linear chain of Document-convention operators from the scan up
//! and appends one or more stages per operator. Stage order, and key order
//! inside each stage, follow the plan's operator and field order.

use crate::error::{DocumentError, DocumentResult};
use crate::filter::match_document;
use crate::project::{field_name, field_path, project_document};
use log::{debug, warn};
use pq_algebra::{
    AggFunction, AggregateCall, AlgebraError, Convention, Direction, FieldCollation, Predicate,
    RelNode, RelOp, RelSchema,
};
use pq_core::DocumentConfig;
use serde_json::{json, Map, Value as JsonValue};

/// Ordered pipeline stages over one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    collection: String,
    stages: Vec<JsonValue>,
}

impl Pipeline {
    /// Collection the pipeline runs against
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn stages(&self) -> &[JsonValue] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stages serialized as JSON text, in pipeline order
    pub fn to_stage_strings(&self) -> Vec<String> {
        self.stages.iter().map(JsonValue::to_string).collect()
    }

    fn push(&mut self, name: &str, body: JsonValue) {
        let mut stage = Map::new();
        stage.insert(name.to_string(), body);
        self.stages.push(JsonValue::Object(stage));
    }
}

/// Compiles Document-convention plans into pipelines
#[derive(Debug, Clone, Copy)]
pub struct PipelineEmitter<'a> {
    config: &'a DocumentConfig,
}

impl<'a> PipelineEmitter<'a> {
    pub fn new(config: &'a DocumentConfig) -> Self {
        Self { config }
    }

    /// Compile the plan rooted at `root`
    pub fn emit(&self, root: &RelNode) -> DocumentResult<Pipeline> {
        if *root.convention() != Convention::Document {
            return Err(DocumentError::WrongConvention {
                convention: root.convention().to_string(),
            });
        }
        let mut pipeline = Pipeline {
            collection: String::new(),
            stages: Vec::new(),
        };
        self.visit(root, &mut pipeline)?;
        debug!(
            "Emitted {} pipeline stage(s) over '{}'",
            pipeline.len(),
            pipeline.collection
        );
        Ok(pipeline)
    }

    fn visit(&self, node: &RelNode, pipeline: &mut Pipeline) -> DocumentResult<()> {
        match node.op() {
            RelOp::Scan { table, .. } => {
                pipeline.collection = table.clone();
                return Ok(());
            }
            RelOp::Join { .. } | RelOp::Union { .. } | RelOp::Values { .. } => {
                return Err(DocumentError::UnsupportedOperator { op: node.kind() });
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
        self.visit(input, pipeline)?;

        match node.op() {
            RelOp::Filter { condition } => {
                let predicate = Predicate::from_condition(condition, input.schema())?;
                pipeline.push("$match", match_document(&predicate)?);
            }
            RelOp::Project { exprs } => {
                pipeline.push("$project", project_document(exprs, input.schema())?);
            }
            RelOp::Aggregate {
                group_set, calls, ..
            } => self.aggregate(node.schema(), input.schema(), group_set, calls, pipeline)?,
            RelOp::Sort {
                collation,
                offset,
                fetch,
            } => sort(node.schema(), collation, *offset, *fetch, pipeline)?,
            _ => return Err(DocumentError::UnsupportedOperator { op: node.kind() }),
        }
        Ok(())
    }

    fn aggregate(
        &self,
        output: &RelSchema,
        input: &RelSchema,
        group_set: &[usize],
        calls: &[AggregateCall],
        pipeline: &mut Pipeline,
    ) -> DocumentResult<()> {
        let mut group = Map::new();
        let key = match group_set {
            [] => JsonValue::Null,
            [single] => json!(field_path(input, *single)?),
            keys => {
                let mut composite = Map::new();
                for &k in keys {
                    composite.insert(field_name(input, k)?.to_string(), json!(field_path(input, k)?));
                }
                JsonValue::Object(composite)
            }
        };
        group.insert("_id".to_string(), key);
        for (i, call) in calls.iter().enumerate() {
            let name = field_name(output, group_set.len() + i)?;
            group.insert(name.to_string(), self.accumulator(call, input)?);
        }
        pipeline.push("$group", JsonValue::Object(group));

        // $group nests the key under _id; lift it back to named fields
        let out_names = output.column_names();
        let mut fixup = Map::new();
        match group_set.len() {
            0 => return Ok(()),
            1 => {
                for (index, name) in out_names.iter().enumerate() {
                    let source = if index == 0 { "_id" } else { *name };
                    fixup.insert(name.to_string(), json!(format!("${source}")));
                }
            }
            keys => {
                fixup.insert("_id".to_string(), json!(0));
                for (index, name) in out_names.iter().enumerate() {
                    let path = if index < keys {
                        format!("$_id.{name}")
                    } else {
                        format!("${name}")
                    };
                    fixup.insert(name.to_string(), json!(path));
                }
            }
        }
        pipeline.push("$project", JsonValue::Object(fixup));
        Ok(())
    }

    fn accumulator(&self, call: &AggregateCall, input: &RelSchema) -> DocumentResult<JsonValue> {
        let arg = || -> DocumentResult<String> {
            match call.args.as_slice() {
                [index] => field_path(input, *index),
                _ => Err(DocumentError::UnsupportedAggregate {
                    function: call.to_string(),
                }),
            }
        };
        let accumulator = match &call.function {
            AggFunction::Count if call.args.is_empty() => json!({ "$sum": 1 }),
            // COUNT(x) skips NULLs
            AggFunction::Count => {
                json!({ "$sum": { "$cond": [ { "$eq": [arg()?, null] }, 0, 1 ] } })
            }
            AggFunction::Sum | AggFunction::SumEmptyIsZero => json!({ "$sum": arg()? }),
            AggFunction::Min => json!({ "$min": arg()? }),
            AggFunction::Max => json!({ "$max": arg()? }),
            AggFunction::Avg => json!({ "$avg": arg()? }),
            AggFunction::SingleValue if self.config.single_value_as_sum => {
                warn!("{call} compiled as $sum; the single-row check is not enforced");
                json!({ "$sum": arg()? })
            }
            other => {
                return Err(DocumentError::UnsupportedAggregate {
                    function: other.name().to_string(),
                })
            }
        };
        Ok(accumulator)
    }
}

fn sort(
    schema: &RelSchema,
    collation: &[FieldCollation],
    offset: Option<u64>,
    fetch: Option<u64>,
    pipeline: &mut Pipeline,
) -> DocumentResult<()> {
    if !collation.is_empty() {
        let mut keys = Map::new();
        for c in collation {
            let direction = match c.direction {
                Direction::Ascending => 1,
                Direction::Descending => -1,
            };
            keys.insert(field_name(schema, c.field)?.to_string(), json!(direction));
        }
        pipeline.push("$sort", JsonValue::Object(keys));
    }
    if let Some(offset) = offset {
        pipeline.push("$skip", json!(offset));
    }
    if let Some(fetch) = fetch {
        pipeline.push("$limit", json!(fetch));
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
