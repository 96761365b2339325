//! pq-sql - SQL emission for relational stores
//!
//! A generic SQL syntax tree, per-store dialect descriptors with cast-spec
//! and call-rewrite hooks, and the unparser that turns the tree into
//! dialect-correct text. Emitted text can be re-parsed with `sqlparser` for
//! validation.

pub mod cast;
pub mod dialect;
pub mod error;
pub mod node;
pub mod writer;

pub use cast::{cast_spec, default_cast_spec, CastSpec, ALIEN_TYPE_SENTINEL};
pub use dialect::{
    DatabaseProduct, DatetimeTruncation, IntervalParameterStrategy, PaginationStyle, SqlDialect,
    ANSI, HSQLDB, POSTGRESQL,
};
pub use error::{SqlError, SqlResult};
pub use node::{
    SetOpKind, SqlCall, SqlJoinKind, SqlKind, SqlLiteral, SqlNode, SqlSelect, SqlSyntax,
};
pub use writer::{unparse, unparse_with, SqlWriter};
