//! SQL dialect descriptors
//!
//! A dialect is a constant bundle of syntax settings and feature flags plus
//! a few optional hooks for the places where stores genuinely differ (cast
//! targets, datetime truncation, single-value aggregates). The writer's
//! traversal is shared by every dialect.

use log::debug;
use pq_core::{PolyType, TimeUnit};
use sqlparser::ast::Statement;
use sqlparser::dialect::{AnsiDialect, Dialect, GenericDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use crate::cast::CastSpec;
use crate::error::{SqlError, SqlResult};
use crate::node::{SetOpKind, SqlKind, SqlLiteral, SqlNode};

/// Relational store products with a dialect descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseProduct {
    Ansi,
    PostgreSql,
    Hsqldb,
}

/// How dynamic parameters of interval type are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalParameterStrategy {
    /// Plain `?`
    None,
    /// `CAST(? AS <interval cast spec>)`
    Cast,
    /// `? * INTERVAL '1' <unit>`
    Multiplication,
}

/// How OFFSET/FETCH is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `OFFSET n ROWS FETCH NEXT m ROWS ONLY`
    OffsetFetch,
    /// `LIMIT m OFFSET n`
    LimitOffset,
}

/// FLOOR-to-time-unit rewrite into a truncation function
#[derive(Debug, Clone, Copy)]
pub struct DatetimeTruncation {
    /// Function name, e.g. `TRUNC` or `DATE_TRUNC`
    pub function: &'static str,
    /// Write the unit token before the value
    pub unit_first: bool,
    /// Write the unit token as a string literal
    pub quote_unit: bool,
    /// Dialect's token for a unit; `None` means the unit is unsupported
    pub unit_token: fn(TimeUnit) -> Option<&'static str>,
}

/// Per-store SQL dialect descriptor
pub struct SqlDialect {
    pub product: DatabaseProduct,
    pub identifier_quote: &'static str,
    pub supports_char_set: bool,
    pub supports_window_functions: bool,
    pub supports_nested_aggregations: bool,
    pub supports_nested_arrays: bool,
    pub requires_alias_for_from_items: bool,
    pub interval_parameter_strategy: IntervalParameterStrategy,
    pub pagination: PaginationStyle,
    /// Largest declarable precision/length for a type, `None` when unbounded
    pub max_precision: fn(&PolyType) -> Option<u32>,
    /// Cast targets that differ from the shared default resolver
    pub cast_spec: Option<fn(&PolyType) -> Option<CastSpec>>,
    pub datetime_truncation: Option<DatetimeTruncation>,
    /// Replacement for a `SINGLE_VALUE(x)` call
    pub single_value_rewrite: Option<fn(&SqlNode) -> SqlNode>,
    parser: fn() -> &'static dyn Dialect,
}

impl SqlDialect {
    /// Dialect name for diagnostics
    pub fn name(&self) -> &'static str {
        match self.product {
            DatabaseProduct::Ansi => "ansi",
            DatabaseProduct::PostgreSql => "postgresql",
            DatabaseProduct::Hsqldb => "hsqldb",
        }
    }

    /// Descriptor for a store product
    pub fn lookup(product: DatabaseProduct) -> &'static SqlDialect {
        match product {
            DatabaseProduct::Ansi => &ANSI,
            DatabaseProduct::PostgreSql => &POSTGRESQL,
            DatabaseProduct::Hsqldb => &HSQLDB,
        }
    }

    /// Quote an identifier, doubling embedded quote characters
    pub fn quote_identifier(&self, ident: &str) -> String {
        let q = self.identifier_quote;
        format!("{q}{}{q}", ident.replace(q, &format!("{q}{q}")))
    }

    /// Get the underlying sqlparser dialect
    pub fn parser_dialect(&self) -> &'static dyn Dialect {
        (self.parser)()
    }

    /// Parse SQL text back into statements, validating emitted output
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        if sql.trim().is_empty() {
            return Err(SqlError::EmptySql);
        }
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }
}

impl std::fmt::Debug for SqlDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlDialect")
            .field("product", &self.product)
            .field("identifier_quote", &self.identifier_quote)
            .field("interval_parameter_strategy", &self.interval_parameter_strategy)
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}

/// Parse line and column from a sqlparser error message.
///
/// `ParserError` carries no structured location, so "Line: N, Column: M" is
/// extracted from the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

static ANSI_PARSER: AnsiDialect = AnsiDialect {};
static POSTGRESQL_PARSER: PostgreSqlDialect = PostgreSqlDialect {};
static GENERIC_PARSER: GenericDialect = GenericDialect {};

fn ansi_parser() -> &'static dyn Dialect {
    &ANSI_PARSER
}

fn postgresql_parser() -> &'static dyn Dialect {
    &POSTGRESQL_PARSER
}

fn generic_parser() -> &'static dyn Dialect {
    &GENERIC_PARSER
}

fn default_max_precision(ty: &PolyType) -> Option<u32> {
    match ty {
        PolyType::Decimal { .. } => Some(19),
        PolyType::Char { .. } | PolyType::String { .. } | PolyType::Binary => Some(65_536),
        _ => None,
    }
}

/// Standard SQL with the shared cast resolver and no overrides
pub static ANSI: SqlDialect = SqlDialect {
    product: DatabaseProduct::Ansi,
    identifier_quote: "\"",
    supports_char_set: true,
    supports_window_functions: true,
    supports_nested_aggregations: true,
    supports_nested_arrays: false,
    requires_alias_for_from_items: false,
    interval_parameter_strategy: IntervalParameterStrategy::Multiplication,
    pagination: PaginationStyle::OffsetFetch,
    max_precision: default_max_precision,
    cast_spec: None,
    datetime_truncation: None,
    single_value_rewrite: None,
    parser: ansi_parser,
};

// PostgreSQL

fn postgresql_max_precision(ty: &PolyType) -> Option<u32> {
    match ty {
        PolyType::String { .. } => Some(10 * 1024 * 1024),
        other => default_max_precision(other),
    }
}

fn postgresql_cast_spec(ty: &PolyType) -> Option<CastSpec> {
    match ty {
        // no one-byte integer; widen to two bytes
        PolyType::Integer {
            bits: pq_core::IntBitWidth::I8,
        } => Some(CastSpec::alien("smallint")),
        PolyType::Float {
            bits: pq_core::FloatBitWidth::F64,
        } => Some(CastSpec::alien("double precision")),
        PolyType::Multimedia(_) => Some(CastSpec::alien("BYTEA")),
        PolyType::Interval(_) => Some(CastSpec::standard("interval")),
        _ => None,
    }
}

fn postgresql_unit_token(unit: TimeUnit) -> Option<&'static str> {
    Some(unit.name())
}

pub static POSTGRESQL: SqlDialect = SqlDialect {
    product: DatabaseProduct::PostgreSql,
    identifier_quote: "\"",
    supports_char_set: false,
    supports_window_functions: true,
    supports_nested_aggregations: false,
    supports_nested_arrays: true,
    requires_alias_for_from_items: true,
    interval_parameter_strategy: IntervalParameterStrategy::Cast,
    pagination: PaginationStyle::OffsetFetch,
    max_precision: postgresql_max_precision,
    cast_spec: Some(postgresql_cast_spec),
    datetime_truncation: Some(DatetimeTruncation {
        function: "DATE_TRUNC",
        unit_first: true,
        quote_unit: true,
        unit_token: postgresql_unit_token,
    }),
    single_value_rewrite: None,
    parser: postgresql_parser,
};

// HSQLDB

fn hsqldb_cast_spec(ty: &PolyType) -> Option<CastSpec> {
    match ty {
        PolyType::Multimedia(_) => Some(CastSpec::alien("BLOB")),
        PolyType::Interval(_) => Some(CastSpec::standard("INTERVAL")),
        _ => None,
    }
}

fn hsqldb_unit_token(unit: TimeUnit) -> Option<&'static str> {
    match unit {
        TimeUnit::Year => Some("YYYY"),
        TimeUnit::Month => Some("MM"),
        TimeUnit::Day => Some("DD"),
        TimeUnit::Week => Some("WW"),
        TimeUnit::Hour => Some("HH24"),
        TimeUnit::Minute => Some("MI"),
        TimeUnit::Second => Some("SS"),
        _ => None,
    }
}

/// `CASE COUNT(*) WHEN 0 THEN NULL WHEN 1 THEN MIN(x)
/// ELSE (VALUES (0) UNION ALL VALUES (0)) END`.
///
/// The ELSE branch is a two-row scalar sub-query, so more than one row
/// raises a cardinality violation at execution time.
fn hsqldb_single_value(call: &SqlNode) -> SqlNode {
    let operand = match call {
        SqlNode::Call(c) => c.operands.first().cloned().unwrap_or(SqlNode::Star),
        other => other.clone(),
    };
    let two_rows = SqlNode::SetOp {
        kind: SetOpKind::UnionAll,
        left: Box::new(SqlNode::Values(vec![vec![SqlNode::Literal(
            SqlLiteral::Approx("0".to_string()),
        )]])),
        right: Box::new(SqlNode::Values(vec![vec![SqlNode::Literal(
            SqlLiteral::Approx("0".to_string()),
        )]])),
    };
    let rewritten = SqlNode::Case {
        operand: Some(Box::new(SqlNode::call(SqlKind::Count, vec![SqlNode::Star]))),
        whens: vec![
            (SqlNode::exact(0), SqlNode::null()),
            (SqlNode::exact(1), SqlNode::call(SqlKind::Min, vec![operand])),
        ],
        else_result: Some(Box::new(two_rows)),
    };
    debug!("SINGLE_VALUE rewritten into {rewritten:?}");
    rewritten
}

pub static HSQLDB: SqlDialect = SqlDialect {
    product: DatabaseProduct::Hsqldb,
    identifier_quote: "\"",
    supports_char_set: false,
    supports_window_functions: false,
    supports_nested_aggregations: true,
    supports_nested_arrays: false,
    requires_alias_for_from_items: false,
    interval_parameter_strategy: IntervalParameterStrategy::None,
    pagination: PaginationStyle::LimitOffset,
    max_precision: default_max_precision,
    cast_spec: Some(hsqldb_cast_spec),
    datetime_truncation: Some(DatetimeTruncation {
        function: "TRUNC",
        unit_first: false,
        quote_unit: true,
        unit_token: hsqldb_unit_token,
    }),
    single_value_rewrite: Some(hsqldb_single_value),
    parser: generic_parser,
};

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
