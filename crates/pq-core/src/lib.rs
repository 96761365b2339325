//! pq-core - shared foundation for the polyquery store compilers
//!
//! Canonical types, runtime values, the type coercion matrix, and the
//! compiler configuration consumed by every emitter.

pub mod coerce;
pub mod config;
pub mod error;
pub(crate) mod serde_helpers;
pub mod types;
pub mod value;

pub use coerce::{coerce_literal, convert_each, convert_value, Coercion};
pub use config::{CompilerConfig, DocumentConfig, SqlConfig, VectorConfig, DEFAULT_KNN_LIMIT};
pub use error::{CoreError, CoreResult};
pub use types::{
    parse_poly_type, FloatBitWidth, IntBitWidth, IntervalQualifier, MultimediaKind, PolyType,
    TimeUnit,
};
pub use value::Value;
