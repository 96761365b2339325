//! Dialect-aware SQL unparser
//!
//! One traversal serves every dialect; the descriptor decides quoting,
//! pagination, interval parameters and FROM-item aliases, and its hooks
//! replace cast targets, FLOOR-to-unit calls and SINGLE_VALUE aggregates.
//! Output depends only on the tree, the dialect and the configuration, so
//! unparsing the same tree twice yields identical text.

use crate::cast::cast_spec;
use crate::dialect::{IntervalParameterStrategy, PaginationStyle, SqlDialect};
use crate::error::{SqlError, SqlResult};
use crate::node::{SqlCall, SqlKind, SqlLiteral, SqlNode, SqlSelect, SqlSyntax, ATOM_PRECEDENCE};
use log::debug;
use pq_core::{PolyType, SqlConfig, TimeUnit};

/// Unparse `node` for `dialect` with default settings
pub fn unparse(dialect: &SqlDialect, node: &SqlNode) -> SqlResult<String> {
    unparse_with(dialect, &SqlConfig::default(), node)
}

/// Unparse `node` for `dialect`
pub fn unparse_with(dialect: &SqlDialect, config: &SqlConfig, node: &SqlNode) -> SqlResult<String> {
    SqlWriter::new(dialect, config).write(node)
}

/// SQL text writer for one dialect
pub struct SqlWriter<'a> {
    dialect: &'a SqlDialect,
    config: &'a SqlConfig,
    buf: String,
    next_alias: usize,
}

impl<'a> SqlWriter<'a> {
    pub fn new(dialect: &'a SqlDialect, config: &'a SqlConfig) -> Self {
        Self {
            dialect,
            config,
            buf: String::new(),
            next_alias: 0,
        }
    }

    /// Unparse a statement or expression. Nothing is returned on failure.
    pub fn write(mut self, node: &SqlNode) -> SqlResult<String> {
        if node.is_query() {
            self.query(node)?;
        } else {
            self.expr(node, 0)?;
        }
        Ok(self.buf)
    }

    fn push(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn unsupported(&self, feature: impl Into<String>) -> SqlError {
        SqlError::UnsupportedFeature {
            feature: feature.into(),
            dialect: self.dialect.name(),
        }
    }

    fn list(&mut self, nodes: &[SqlNode]) -> SqlResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(node, 0)?;
        }
        Ok(())
    }

    // Queries

    fn query(&mut self, node: &SqlNode) -> SqlResult<()> {
        match node {
            SqlNode::Select(select) => self.select(select),
            SqlNode::SetOp { kind, left, right } => {
                self.set_operand(left)?;
                self.push(" ");
                self.push(kind.keyword());
                self.push(" ");
                self.set_operand(right)
            }
            SqlNode::Values(rows) => {
                if rows.is_empty() {
                    return Err(SqlError::InvalidNode("VALUES without rows".to_string()));
                }
                self.push("VALUES ");
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.push("(");
                    self.list(row)?;
                    self.push(")");
                }
                Ok(())
            }
            other => self.expr(other, 0),
        }
    }

    fn set_operand(&mut self, node: &SqlNode) -> SqlResult<()> {
        match node {
            SqlNode::Select(select) if select.offset.is_some() || select.fetch.is_some() => {
                self.push("(");
                self.select(select)?;
                self.push(")")
            }
            _ => self.query(node)?,
        }
        Ok(())
    }

    fn select(&mut self, select: &SqlSelect) -> SqlResult<()> {
        self.push("SELECT ");
        if select.distinct {
            self.push("DISTINCT ");
        }
        if select.select_list.is_empty() {
            self.push("*");
        } else {
            self.list(&select.select_list)?;
        }
        if let Some(from) = &select.from {
            self.push(" FROM ");
            self.from_item(from)?;
        }
        if let Some(condition) = &select.where_clause {
            self.push(" WHERE ");
            self.expr(condition, 0)?;
        }
        if !select.group_by.is_empty() {
            self.push(" GROUP BY ");
            self.list(&select.group_by)?;
        }
        if let Some(having) = &select.having {
            self.push(" HAVING ");
            self.expr(having, 0)?;
        }
        if !select.order_by.is_empty() {
            self.push(" ORDER BY ");
            self.list(&select.order_by)?;
        }
        self.offset_fetch(select.offset.as_ref(), select.fetch.as_ref())
    }

    fn offset_fetch(&mut self, offset: Option<&SqlNode>, fetch: Option<&SqlNode>) -> SqlResult<()> {
        match self.dialect.pagination {
            PaginationStyle::OffsetFetch => {
                if let Some(offset) = offset {
                    self.push(" OFFSET ");
                    self.expr(offset, 0)?;
                    self.push(" ROWS");
                }
                if let Some(fetch) = fetch {
                    self.push(" FETCH NEXT ");
                    self.expr(fetch, 0)?;
                    self.push(" ROWS ONLY");
                }
            }
            PaginationStyle::LimitOffset => {
                if let Some(fetch) = fetch {
                    self.push(" LIMIT ");
                    self.expr(fetch, 0)?;
                }
                if let Some(offset) = offset {
                    self.push(" OFFSET ");
                    self.expr(offset, 0)?;
                }
            }
        }
        Ok(())
    }

    fn from_item(&mut self, node: &SqlNode) -> SqlResult<()> {
        match node {
            SqlNode::Join {
                left,
                right,
                kind,
                condition,
            } => {
                self.from_item(left)?;
                self.push(" ");
                self.push(kind.keyword());
                self.push(" ");
                self.from_item(right)?;
                if let Some(condition) = condition {
                    self.push(" ON ");
                    self.expr(condition, 0)?;
                }
                Ok(())
            }
            SqlNode::As { expr, alias } if expr.is_query() => {
                self.subquery(expr)?;
                self.push(" AS ");
                self.push(&self.dialect.quote_identifier(alias));
                Ok(())
            }
            query if query.is_query() => {
                self.subquery(query)?;
                if self.dialect.requires_alias_for_from_items {
                    let alias = format!("{}{}", self.config.from_alias_prefix, self.next_alias);
                    self.next_alias += 1;
                    self.push(" AS ");
                    self.push(&self.dialect.quote_identifier(&alias));
                }
                Ok(())
            }
            other => self.expr(other, 0),
        }
    }

    fn subquery(&mut self, node: &SqlNode) -> SqlResult<()> {
        self.push("(");
        self.query(node)?;
        self.push(")");
        Ok(())
    }

    // Expressions

    /// Write `node`, parenthesized when it binds looser than `min_prec`
    fn expr(&mut self, node: &SqlNode, min_prec: u8) -> SqlResult<()> {
        if node.is_query() {
            return self.subquery(node);
        }
        let prec = match node {
            SqlNode::Call(call) => call.kind.precedence(),
            _ => ATOM_PRECEDENCE,
        };
        let wrap = prec < min_prec;
        if wrap {
            self.push("(");
        }
        match node {
            SqlNode::Identifier(parts) => {
                let quoted: Vec<String> = parts
                    .iter()
                    .map(|p| {
                        if p == "*" {
                            p.clone()
                        } else {
                            self.dialect.quote_identifier(p)
                        }
                    })
                    .collect();
                self.push(&quoted.join("."));
            }
            SqlNode::Star => self.push("*"),
            SqlNode::Literal(literal) => self.literal(literal),
            SqlNode::Call(call) => self.call(node, call)?,
            SqlNode::Cast { expr, target } => {
                self.push("CAST(");
                self.expr(expr, 0)?;
                self.push(" AS ");
                let spec = cast_spec(self.dialect, target)?;
                self.push(spec.unparse());
                self.push(")");
            }
            SqlNode::Case {
                operand,
                whens,
                else_result,
            } => {
                if whens.is_empty() {
                    return Err(SqlError::InvalidNode("CASE without WHEN".to_string()));
                }
                self.push("CASE");
                if let Some(operand) = operand {
                    self.push(" ");
                    self.expr(operand, 0)?;
                }
                for (when, then) in whens {
                    self.push(" WHEN ");
                    self.expr(when, 0)?;
                    self.push(" THEN ");
                    self.expr(then, 0)?;
                }
                if let Some(else_result) = else_result {
                    self.push(" ELSE ");
                    self.expr(else_result, 0)?;
                }
                self.push(" END");
            }
            SqlNode::DynamicParam { param_type, .. } => self.dynamic_param(param_type.as_ref())?,
            SqlNode::Array(items) => {
                if !self.dialect.supports_nested_arrays
                    && items.iter().any(|i| matches!(i, SqlNode::Array(_)))
                {
                    return Err(self.unsupported("nested arrays"));
                }
                self.push("ARRAY[");
                self.list(items)?;
                self.push("]");
            }
            SqlNode::Over {
                call,
                partition_by,
                order_by,
            } => {
                if !self.dialect.supports_window_functions {
                    return Err(self.unsupported("window functions"));
                }
                self.expr(call, ATOM_PRECEDENCE)?;
                self.push(" OVER (");
                let mut sep = "";
                if !partition_by.is_empty() {
                    self.push("PARTITION BY ");
                    self.list(partition_by)?;
                    sep = " ";
                }
                if !order_by.is_empty() {
                    self.push(sep);
                    self.push("ORDER BY ");
                    self.list(order_by)?;
                }
                self.push(")");
            }
            SqlNode::As { expr, alias } => {
                self.expr(expr, 0)?;
                self.push(" AS ");
                self.push(&self.dialect.quote_identifier(alias));
            }
            SqlNode::OrderItem {
                expr,
                descending,
                nulls_first,
            } => {
                self.expr(expr, 0)?;
                if *descending {
                    self.push(" DESC");
                }
                match nulls_first {
                    Some(true) => self.push(" NULLS FIRST"),
                    Some(false) => self.push(" NULLS LAST"),
                    None => {}
                }
            }
            SqlNode::Join { .. } => {
                return Err(SqlError::InvalidNode(
                    "JOIN outside a FROM clause".to_string(),
                ))
            }
            SqlNode::Select(_) | SqlNode::SetOp { .. } | SqlNode::Values(_) => {
                self.subquery(node)?
            }
        }
        if wrap {
            self.push(")");
        }
        Ok(())
    }

    fn literal(&mut self, literal: &SqlLiteral) {
        match literal {
            SqlLiteral::Null => self.push("NULL"),
            SqlLiteral::Boolean(true) => self.push("TRUE"),
            SqlLiteral::Boolean(false) => self.push("FALSE"),
            SqlLiteral::Exact(text) | SqlLiteral::Approx(text) => self.push(text),
            SqlLiteral::Char(s) => self.push(&quote_string(s)),
            SqlLiteral::Date(s) => self.push(&format!("DATE {}", quote_string(s))),
            SqlLiteral::Time(s) => self.push(&format!("TIME {}", quote_string(s))),
            SqlLiteral::Timestamp(s) => self.push(&format!("TIMESTAMP {}", quote_string(s))),
            SqlLiteral::Interval { value, qualifier } => {
                self.push(&format!("INTERVAL {} {qualifier}", quote_string(value)))
            }
            SqlLiteral::TimeUnit(unit) => self.push(unit.name()),
        }
    }

    fn dynamic_param(&mut self, param_type: Option<&PolyType>) -> SqlResult<()> {
        let Some(ty @ PolyType::Interval(qualifier)) = param_type else {
            self.push("?");
            return Ok(());
        };
        match self.dialect.interval_parameter_strategy {
            IntervalParameterStrategy::None => self.push("?"),
            IntervalParameterStrategy::Cast => {
                let spec = cast_spec(self.dialect, ty)?;
                self.push(&format!("CAST(? AS {})", spec.unparse()));
            }
            IntervalParameterStrategy::Multiplication => {
                self.push(&format!("? * INTERVAL '1' {}", qualifier.start_unit()));
            }
        }
        Ok(())
    }

    fn call(&mut self, node: &SqlNode, call: &SqlCall) -> SqlResult<()> {
        let kind = &call.kind;
        let operands = call.operands.as_slice();

        if kind.is_aggregate()
            && !self.dialect.supports_nested_aggregations
            && operands.iter().any(SqlNode::contains_aggregate)
        {
            return Err(self.unsupported(format!("nested aggregation in {}", kind.name())));
        }

        match (kind, operands) {
            (SqlKind::Floor, [value, SqlNode::Literal(SqlLiteral::TimeUnit(unit))]) => {
                if let Some(truncation) = self.dialect.datetime_truncation {
                    let token = (truncation.unit_token)(*unit).ok_or(
                        SqlError::UnsupportedTimeUnit {
                            unit: *unit,
                            dialect: self.dialect.name(),
                        },
                    )?;
                    debug!(
                        "FLOOR({unit}) rewritten into {} for {}",
                        truncation.function,
                        self.dialect.name()
                    );
                    let token = if truncation.quote_unit {
                        quote_string(token)
                    } else {
                        token.to_string()
                    };
                    self.push(truncation.function);
                    self.push("(");
                    if truncation.unit_first {
                        self.push(&token);
                        self.push(", ");
                        self.expr(value, 0)?;
                    } else {
                        self.expr(value, 0)?;
                        self.push(", ");
                        self.push(&token);
                    }
                    self.push(")");
                    return Ok(());
                }
                return self.unit_function(kind, value, *unit);
            }
            (SqlKind::Ceil, [value, SqlNode::Literal(SqlLiteral::TimeUnit(unit))]) => {
                return self.unit_function(kind, value, *unit);
            }
            (SqlKind::Sum0, _) => {
                self.push("COALESCE(SUM(");
                if call.distinct {
                    self.push("DISTINCT ");
                }
                self.list(operands)?;
                self.push("), 0)");
                return Ok(());
            }
            (SqlKind::SingleValue, _) => {
                if let Some(rewrite) = self.dialect.single_value_rewrite {
                    let rewritten = rewrite(node);
                    return self.expr(&rewritten, 0);
                }
            }
            _ => {}
        }

        match kind.syntax() {
            SqlSyntax::Binary => {
                let [left, right] = operands else {
                    return Err(arity_error(kind, "2", operands.len()));
                };
                let prec = kind.precedence();
                let right_prec = if kind.is_associative() { prec } else { prec + 1 };
                self.expr(left, prec)?;
                self.push(&format!(" {} ", kind.name()));
                self.expr(right, right_prec)?;
            }
            SqlSyntax::Prefix => {
                let [operand] = operands else {
                    return Err(arity_error(kind, "1", operands.len()));
                };
                self.push(kind.name());
                if *kind == SqlKind::Not {
                    self.push(" ");
                }
                let start = self.buf.len();
                self.expr(operand, kind.precedence() + 1)?;
                // `--5` would open a line comment
                if kind.name().ends_with('-') && self.buf[start..].starts_with('-') {
                    self.buf.insert(start, ' ');
                }
            }
            SqlSyntax::Postfix => {
                let [operand] = operands else {
                    return Err(arity_error(kind, "1", operands.len()));
                };
                self.expr(operand, kind.precedence() + 1)?;
                self.push(" ");
                self.push(kind.name());
            }
            SqlSyntax::Special => self.special(kind, operands)?,
            SqlSyntax::Function => {
                self.push(kind.name());
                self.push("(");
                if call.distinct {
                    self.push("DISTINCT ");
                }
                self.list(operands)?;
                self.push(")");
            }
        }
        Ok(())
    }

    /// `FLOOR(x TO unit)` / `CEIL(x TO unit)`
    fn unit_function(
        &mut self,
        kind: &SqlKind,
        value: &SqlNode,
        unit: TimeUnit,
    ) -> SqlResult<()> {
        self.push(kind.name());
        self.push("(");
        self.expr(value, 0)?;
        self.push(" TO ");
        self.push(unit.name());
        self.push(")");
        Ok(())
    }

    fn special(&mut self, kind: &SqlKind, operands: &[SqlNode]) -> SqlResult<()> {
        let prec = kind.precedence();
        match kind {
            SqlKind::In => {
                let Some((value, list)) = operands.split_first() else {
                    return Err(arity_error(kind, "2 or more", 0));
                };
                if list.is_empty() {
                    return Err(arity_error(kind, "2 or more", 1));
                }
                self.expr(value, prec + 1)?;
                self.push(" IN ");
                match list {
                    [query] if query.is_query() => self.subquery(query)?,
                    _ => {
                        self.push("(");
                        self.list(list)?;
                        self.push(")");
                    }
                }
            }
            _ => {
                let [value, low, high] = operands else {
                    return Err(arity_error(kind, "3", operands.len()));
                };
                self.expr(value, prec + 1)?;
                self.push(" BETWEEN ");
                self.expr(low, prec + 1)?;
                self.push(" AND ");
                self.expr(high, prec + 1)?;
            }
        }
        Ok(())
    }
}

fn arity_error(kind: &SqlKind, expected: &str, actual: usize) -> SqlError {
    SqlError::InvalidNode(format!(
        "{} expects {expected} operand(s), got {actual}",
        kind.name()
    ))
}

/// Single-quoted string literal with embedded quotes doubled
fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
