//! Conventions: which compiler may consume a node

use serde::{Deserialize, Serialize};

/// Target compiler tag carried by every operator node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    /// Not yet assigned to a store
    Logical,
    /// A relational store, identified by product name
    Sql { store: String },
    /// Document store compiled to aggregation-pipeline stages
    Document,
    /// Vector store compiled to predicate/kNN requests
    Vector,
}

impl Convention {
    /// SQL convention for the named store product
    pub fn sql(store: impl Into<String>) -> Self {
        Convention::Sql {
            store: store.into(),
        }
    }

    /// Whether aggregate calls may request DISTINCT
    pub fn supports_distinct_aggregates(&self) -> bool {
        matches!(self, Convention::Logical | Convention::Sql { .. })
    }

    /// Whether aggregates may use grouping sets other than one flat set
    pub fn supports_grouping_sets(&self) -> bool {
        matches!(self, Convention::Logical | Convention::Sql { .. })
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Convention::Logical => write!(f, "LOGICAL"),
            Convention::Sql { store } => write!(f, "SQL({store})"),
            Convention::Document => write!(f, "DOCUMENT"),
            Convention::Vector => write!(f, "VECTOR"),
        }
    }
}
