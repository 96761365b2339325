//! Row type: ordered list of typed fields per operator node

use pq_core::PolyType;
use serde::{Deserialize, Serialize};

/// A named, typed output field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedColumn {
    /// Field name
    pub name: String,
    /// Canonical type
    pub poly_type: PolyType,
    /// Whether the field may hold NULL
    pub nullable: bool,
}

impl TypedColumn {
    pub fn new(name: impl Into<String>, poly_type: PolyType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            poly_type,
            nullable,
        }
    }
}

/// Row type of a relational operator's output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelSchema {
    /// Ordered list of output columns
    pub columns: Vec<TypedColumn>,
}

impl RelSchema {
    /// Create an empty schema
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Create a schema from a list of typed columns
    pub fn new(columns: Vec<TypedColumn>) -> Self {
        Self { columns }
    }

    /// Column at a field index
    pub fn column(&self, index: usize) -> Option<&TypedColumn> {
        self.columns.get(index)
    }

    /// Merge two schemas (e.g. for JOIN output)
    pub fn merge(left: &RelSchema, right: &RelSchema) -> Self {
        let mut columns = left.columns.clone();
        columns.extend(right.columns.iter().cloned());
        Self { columns }
    }

    /// Return a new schema with every column nullable
    pub fn as_nullable(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| TypedColumn {
                    nullable: true,
                    ..c.clone()
                })
                .collect(),
        }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column names in field order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_col(name: &str, ty: PolyType, nullable: bool) -> TypedColumn {
        TypedColumn::new(name, ty, nullable)
    }

    #[test]
    fn test_column_by_index() {
        let schema = RelSchema::new(vec![
            make_col("id", PolyType::INTEGER, false),
            make_col("name", PolyType::VARCHAR, true),
        ]);

        assert_eq!(schema.column(1).map(|c| c.name.as_str()), Some("name"));
        assert!(schema.column(2).is_none());
    }

    #[test]
    fn test_merge_schemas() {
        let left = RelSchema::new(vec![make_col("a", PolyType::INTEGER, false)]);
        let right = RelSchema::new(vec![make_col("b", PolyType::VARCHAR, true)]);
        let merged = RelSchema::merge(&left, &right);
        assert_eq!(merged.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_as_nullable() {
        let schema = RelSchema::new(vec![make_col("id", PolyType::INTEGER, false)]);
        assert!(schema.as_nullable().columns[0].nullable);
    }
}
