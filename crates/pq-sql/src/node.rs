//! Generic SQL syntax tree, independent of any dialect

use pq_core::{IntervalQualifier, PolyType, TimeUnit, Value};
use serde::{Deserialize, Serialize};

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlLiteral {
    Null,
    Boolean(bool),
    /// Exact numeric, kept as written
    Exact(String),
    /// Approximate numeric, kept as written
    Approx(String),
    /// Character string
    Char(String),
    Date(String),
    Time(String),
    Timestamp(String),
    /// `INTERVAL '<value>' <qualifier>`
    Interval {
        value: String,
        qualifier: IntervalQualifier,
    },
    /// Bare time-unit keyword, the second operand of FLOOR/CEIL
    TimeUnit(TimeUnit),
}

/// Operators and functions a call may apply
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlKind {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Not,
    IsNull,
    IsNotNull,
    In,
    Like,
    Between,
    Plus,
    Minus,
    Times,
    Divide,
    /// Prefix `-`
    Negate,
    Floor,
    Ceil,
    Count,
    Sum,
    /// SUM that yields 0 over an empty input
    Sum0,
    Min,
    Max,
    Avg,
    SingleValue,
    /// Any other function, by name
    Function(String),
}

/// How a call is laid out in SQL text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlSyntax {
    /// `a op b`
    Binary,
    /// `op a`
    Prefix,
    /// `a op`
    Postfix,
    /// `name(a, b)`
    Function,
    /// IN and BETWEEN
    Special,
}

impl SqlKind {
    /// Keyword or function name
    pub fn name(&self) -> &str {
        match self {
            SqlKind::Equals => "=",
            SqlKind::NotEquals => "<>",
            SqlKind::LessThan => "<",
            SqlKind::LessThanOrEqual => "<=",
            SqlKind::GreaterThan => ">",
            SqlKind::GreaterThanOrEqual => ">=",
            SqlKind::And => "AND",
            SqlKind::Or => "OR",
            SqlKind::Not => "NOT",
            SqlKind::IsNull => "IS NULL",
            SqlKind::IsNotNull => "IS NOT NULL",
            SqlKind::In => "IN",
            SqlKind::Like => "LIKE",
            SqlKind::Between => "BETWEEN",
            SqlKind::Plus => "+",
            SqlKind::Minus => "-",
            SqlKind::Times => "*",
            SqlKind::Divide => "/",
            SqlKind::Negate => "-",
            SqlKind::Floor => "FLOOR",
            SqlKind::Ceil => "CEIL",
            SqlKind::Count => "COUNT",
            SqlKind::Sum => "SUM",
            SqlKind::Sum0 => "$SUM0",
            SqlKind::Min => "MIN",
            SqlKind::Max => "MAX",
            SqlKind::Avg => "AVG",
            SqlKind::SingleValue => "SINGLE_VALUE",
            SqlKind::Function(name) => name,
        }
    }

    pub fn syntax(&self) -> SqlSyntax {
        match self {
            SqlKind::Equals
            | SqlKind::NotEquals
            | SqlKind::LessThan
            | SqlKind::LessThanOrEqual
            | SqlKind::GreaterThan
            | SqlKind::GreaterThanOrEqual
            | SqlKind::And
            | SqlKind::Or
            | SqlKind::Like
            | SqlKind::Plus
            | SqlKind::Minus
            | SqlKind::Times
            | SqlKind::Divide => SqlSyntax::Binary,
            SqlKind::Not | SqlKind::Negate => SqlSyntax::Prefix,
            SqlKind::IsNull | SqlKind::IsNotNull => SqlSyntax::Postfix,
            SqlKind::In | SqlKind::Between => SqlSyntax::Special,
            _ => SqlSyntax::Function,
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(&self) -> u8 {
        match self {
            SqlKind::Or => 1,
            SqlKind::And => 2,
            SqlKind::Not => 3,
            SqlKind::Equals
            | SqlKind::NotEquals
            | SqlKind::LessThan
            | SqlKind::LessThanOrEqual
            | SqlKind::GreaterThan
            | SqlKind::GreaterThanOrEqual
            | SqlKind::Like
            | SqlKind::In
            | SqlKind::Between
            | SqlKind::IsNull
            | SqlKind::IsNotNull => 4,
            SqlKind::Plus | SqlKind::Minus => 5,
            SqlKind::Times | SqlKind::Divide => 6,
            SqlKind::Negate => 7,
            _ => ATOM_PRECEDENCE,
        }
    }

    /// `a op (b op c)` equals `(a op b) op c`
    pub fn is_associative(&self) -> bool {
        matches!(
            self,
            SqlKind::And | SqlKind::Or | SqlKind::Plus | SqlKind::Times
        )
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            SqlKind::Count
                | SqlKind::Sum
                | SqlKind::Sum0
                | SqlKind::Min
                | SqlKind::Max
                | SqlKind::Avg
                | SqlKind::SingleValue
        )
    }
}

/// Precedence of leaves and function-style calls
pub const ATOM_PRECEDENCE: u8 = 10;

/// Operator application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlCall {
    pub kind: SqlKind,
    pub operands: Vec<SqlNode>,
    /// `AGG(DISTINCT ...)`
    pub distinct: bool,
}

/// Set operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl SetOpKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            SetOpKind::Union => "UNION",
            SetOpKind::UnionAll => "UNION ALL",
            SetOpKind::Intersect => "INTERSECT",
            SetOpKind::Except => "EXCEPT",
        }
    }
}

/// Join kinds in a FROM clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SqlJoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl SqlJoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            SqlJoinKind::Inner => "INNER JOIN",
            SqlJoinKind::Left => "LEFT JOIN",
            SqlJoinKind::Right => "RIGHT JOIN",
            SqlJoinKind::Full => "FULL JOIN",
            SqlJoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// SELECT query block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SqlSelect {
    pub distinct: bool,
    /// Empty means `*`
    pub select_list: Vec<SqlNode>,
    pub from: Option<SqlNode>,
    pub where_clause: Option<SqlNode>,
    pub group_by: Vec<SqlNode>,
    pub having: Option<SqlNode>,
    /// [`SqlNode::OrderItem`]s or plain expressions
    pub order_by: Vec<SqlNode>,
    pub offset: Option<SqlNode>,
    pub fetch: Option<SqlNode>,
}

impl SqlSelect {
    pub fn new(select_list: Vec<SqlNode>) -> Self {
        Self {
            select_list,
            ..Self::default()
        }
    }

    pub fn from_item(self, from: SqlNode) -> Self {
        Self {
            from: Some(from),
            ..self
        }
    }

    pub fn filter(self, condition: SqlNode) -> Self {
        Self {
            where_clause: Some(condition),
            ..self
        }
    }

    pub fn group_by(self, group_by: Vec<SqlNode>) -> Self {
        Self { group_by, ..self }
    }

    pub fn order_by(self, order_by: Vec<SqlNode>) -> Self {
        Self { order_by, ..self }
    }

    /// Skip `offset` rows and keep at most `fetch`
    pub fn paginate(self, offset: Option<u64>, fetch: Option<u64>) -> Self {
        Self {
            offset: offset.map(SqlNode::exact),
            fetch: fetch.map(SqlNode::exact),
            ..self
        }
    }

    pub fn into_node(self) -> SqlNode {
        SqlNode::Select(Box::new(self))
    }
}

/// A node of the generic SQL syntax tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlNode {
    /// Possibly qualified name (`t.col`)
    Identifier(Vec<String>),
    /// `*`
    Star,
    Literal(SqlLiteral),
    Call(SqlCall),
    /// `CAST(expr AS target)`; the target is resolved per dialect
    Cast {
        expr: Box<SqlNode>,
        target: PolyType,
    },
    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    Case {
        operand: Option<Box<SqlNode>>,
        whens: Vec<(SqlNode, SqlNode)>,
        else_result: Option<Box<SqlNode>>,
    },
    /// `?` parameter, with its type when known
    DynamicParam {
        index: usize,
        param_type: Option<PolyType>,
    },
    /// Array value constructor `ARRAY[...]`
    Array(Vec<SqlNode>),
    /// Window aggregate `call OVER (PARTITION BY .. ORDER BY ..)`
    Over {
        call: Box<SqlNode>,
        partition_by: Vec<SqlNode>,
        order_by: Vec<SqlNode>,
    },
    /// `expr AS alias`
    As { expr: Box<SqlNode>, alias: String },
    /// ORDER BY element
    OrderItem {
        expr: Box<SqlNode>,
        descending: bool,
        nulls_first: Option<bool>,
    },
    /// FROM-clause join
    Join {
        left: Box<SqlNode>,
        right: Box<SqlNode>,
        kind: SqlJoinKind,
        condition: Option<Box<SqlNode>>,
    },
    Select(Box<SqlSelect>),
    SetOp {
        kind: SetOpKind,
        left: Box<SqlNode>,
        right: Box<SqlNode>,
    },
    /// `VALUES (..), (..)`
    Values(Vec<Vec<SqlNode>>),
}

impl SqlNode {
    /// Unqualified identifier
    pub fn ident(name: impl Into<String>) -> Self {
        SqlNode::Identifier(vec![name.into()])
    }

    /// Qualified identifier from its parts
    pub fn compound_ident<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> Self {
        SqlNode::Identifier(parts.into_iter().map(Into::into).collect())
    }

    pub fn null() -> Self {
        SqlNode::Literal(SqlLiteral::Null)
    }

    /// Exact numeric literal
    pub fn exact(n: impl std::fmt::Display) -> Self {
        SqlNode::Literal(SqlLiteral::Exact(n.to_string()))
    }

    /// Character string literal
    pub fn string(s: impl Into<String>) -> Self {
        SqlNode::Literal(SqlLiteral::Char(s.into()))
    }

    pub fn time_unit(unit: TimeUnit) -> Self {
        SqlNode::Literal(SqlLiteral::TimeUnit(unit))
    }

    pub fn call(kind: SqlKind, operands: Vec<SqlNode>) -> Self {
        SqlNode::Call(SqlCall {
            kind,
            operands,
            distinct: false,
        })
    }

    /// Aggregate call with DISTINCT
    pub fn distinct_call(kind: SqlKind, operands: Vec<SqlNode>) -> Self {
        SqlNode::Call(SqlCall {
            kind,
            operands,
            distinct: true,
        })
    }

    pub fn cast(expr: SqlNode, target: PolyType) -> Self {
        SqlNode::Cast {
            expr: Box::new(expr),
            target,
        }
    }

    pub fn alias(self, alias: impl Into<String>) -> Self {
        SqlNode::As {
            expr: Box::new(self),
            alias: alias.into(),
        }
    }

    /// Literal for a runtime value
    pub fn from_value(value: &Value) -> Self {
        let literal = match value {
            Value::Null => SqlLiteral::Null,
            Value::Boolean(b) => SqlLiteral::Boolean(*b),
            Value::TinyInt(v) => SqlLiteral::Exact(v.to_string()),
            Value::SmallInt(v) => SqlLiteral::Exact(v.to_string()),
            Value::Integer(v) => SqlLiteral::Exact(v.to_string()),
            Value::BigInt(v) => SqlLiteral::Exact(v.to_string()),
            Value::Decimal(v) => SqlLiteral::Exact(v.to_string()),
            Value::Real(v) => SqlLiteral::Approx(v.to_string()),
            Value::Double(v) => SqlLiteral::Approx(v.to_string()),
            Value::String(s) => SqlLiteral::Char(s.clone()),
            Value::Date(d) => SqlLiteral::Date(d.to_string()),
            Value::Time(t) => SqlLiteral::Time(t.to_string()),
            Value::Timestamp(ts) => SqlLiteral::Timestamp(ts.to_string()),
            Value::Array(items) => {
                return SqlNode::Array(items.iter().map(SqlNode::from_value).collect())
            }
        };
        SqlNode::Literal(literal)
    }

    /// SELECT, set operations and VALUES
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            SqlNode::Select(_) | SqlNode::SetOp { .. } | SqlNode::Values(_)
        )
    }

    /// Whether an aggregate call occurs in this expression, not descending
    /// into sub-queries
    pub fn contains_aggregate(&self) -> bool {
        match self {
            SqlNode::Call(call) => {
                call.kind.is_aggregate() || call.operands.iter().any(SqlNode::contains_aggregate)
            }
            SqlNode::Cast { expr, .. } | SqlNode::As { expr, .. } => expr.contains_aggregate(),
            SqlNode::OrderItem { expr, .. } => expr.contains_aggregate(),
            SqlNode::Case {
                operand,
                whens,
                else_result,
            } => {
                operand.as_deref().is_some_and(SqlNode::contains_aggregate)
                    || whens
                        .iter()
                        .any(|(w, t)| w.contains_aggregate() || t.contains_aggregate())
                    || else_result.as_deref().is_some_and(SqlNode::contains_aggregate)
            }
            SqlNode::Array(items) => items.iter().any(SqlNode::contains_aggregate),
            _ => false,
        }
    }
}
