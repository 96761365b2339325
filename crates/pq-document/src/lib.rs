//! pq-document - aggregation pipelines for document stores
//!
//! Compiles Document-convention relational plans into ordered pipeline
//! stage documents: `$match`, `$project`, `$group` with its key fix-up,
//! `$sort`, `$skip` and `$limit`.

pub mod encode;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod project;

pub use encode::{encode_value, like_to_regex};
pub use error::{DocumentError, DocumentResult};
pub use filter::match_document;
pub use pipeline::{Pipeline, PipelineEmitter};
pub use project::{expression, project_document};
