//! Canonical type system shared by every store compiler

use serde::{Deserialize, Serialize};

/// Valid bit widths for integer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntBitWidth {
    /// 8-bit (TINYINT)
    I8,
    /// 16-bit (SMALLINT)
    I16,
    /// 32-bit (INTEGER)
    I32,
    /// 64-bit (BIGINT)
    I64,
}

impl std::fmt::Display for IntBitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntBitWidth::I8 => write!(f, "8"),
            IntBitWidth::I16 => write!(f, "16"),
            IntBitWidth::I32 => write!(f, "32"),
            IntBitWidth::I64 => write!(f, "64"),
        }
    }
}

/// Valid bit widths for floating-point types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FloatBitWidth {
    /// 32-bit (REAL)
    F32,
    /// 64-bit (DOUBLE)
    F64,
}

impl std::fmt::Display for FloatBitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloatBitWidth::F32 => write!(f, "32"),
            FloatBitWidth::F64 => write!(f, "64"),
        }
    }
}

/// Units used by interval qualifiers and by FLOOR/CEIL truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Millennium,
    Century,
    Decade,
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
}

impl TimeUnit {
    /// Upper-case SQL keyword for this unit
    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Millennium => "MILLENNIUM",
            TimeUnit::Century => "CENTURY",
            TimeUnit::Decade => "DECADE",
            TimeUnit::Year => "YEAR",
            TimeUnit::Quarter => "QUARTER",
            TimeUnit::Month => "MONTH",
            TimeUnit::Week => "WEEK",
            TimeUnit::Day => "DAY",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Second => "SECOND",
            TimeUnit::Millisecond => "MILLISECOND",
            TimeUnit::Microsecond => "MICROSECOND",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The interval subtypes. All of them belong to one type family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalQualifier {
    YearMonth,
    Year,
    Month,
    Day,
    DayHour,
    DayMinute,
    DaySecond,
    Hour,
    HourMinute,
    HourSecond,
    Minute,
    MinuteSecond,
    Second,
}

impl IntervalQualifier {
    /// Leading unit of the qualifier (`DAY` for `DAY TO SECOND`)
    pub fn start_unit(&self) -> TimeUnit {
        match self {
            IntervalQualifier::YearMonth | IntervalQualifier::Year => TimeUnit::Year,
            IntervalQualifier::Month => TimeUnit::Month,
            IntervalQualifier::Day
            | IntervalQualifier::DayHour
            | IntervalQualifier::DayMinute
            | IntervalQualifier::DaySecond => TimeUnit::Day,
            IntervalQualifier::Hour
            | IntervalQualifier::HourMinute
            | IntervalQualifier::HourSecond => TimeUnit::Hour,
            IntervalQualifier::Minute | IntervalQualifier::MinuteSecond => TimeUnit::Minute,
            IntervalQualifier::Second => TimeUnit::Second,
        }
    }

    /// Trailing unit for ranged qualifiers (`SECOND` for `DAY TO SECOND`)
    pub fn end_unit(&self) -> Option<TimeUnit> {
        match self {
            IntervalQualifier::YearMonth => Some(TimeUnit::Month),
            IntervalQualifier::DayHour => Some(TimeUnit::Hour),
            IntervalQualifier::DayMinute | IntervalQualifier::HourMinute => Some(TimeUnit::Minute),
            IntervalQualifier::DaySecond
            | IntervalQualifier::HourSecond
            | IntervalQualifier::MinuteSecond => Some(TimeUnit::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for IntervalQualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.end_unit() {
            Some(end) => write!(f, "{} TO {}", self.start_unit(), end),
            None => write!(f, "{}", self.start_unit()),
        }
    }
}

/// Binary-large-object-like types that stores hold as opaque bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultimediaKind {
    File,
    Image,
    Video,
    Sound,
}

/// Canonical data types understood by every compiler in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolyType {
    /// BOOLEAN
    Boolean,
    /// TINYINT(8), SMALLINT(16), INTEGER(32), BIGINT(64)
    Integer { bits: IntBitWidth },
    /// Exact numeric with optional precision and scale
    Decimal {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    /// REAL(32), DOUBLE(64)
    Float { bits: FloatBitWidth },
    /// Fixed-length character string
    Char { length: Option<u32> },
    /// Variable-length character string
    String { max_length: Option<u32> },
    /// DATE
    Date,
    /// TIME
    Time,
    /// TIMESTAMP
    Timestamp,
    /// INTERVAL with its qualifier
    Interval(IntervalQualifier),
    /// VARBINARY
    Binary,
    /// FILE / IMAGE / VIDEO / SOUND
    Multimedia(MultimediaKind),
    /// JSON document
    Json,
    /// Array with a component type; nesting is allowed
    Array(Box<PolyType>),
    /// Type of the bare NULL literal
    Null,
}

impl PolyType {
    pub const TINYINT: PolyType = PolyType::Integer {
        bits: IntBitWidth::I8,
    };
    pub const SMALLINT: PolyType = PolyType::Integer {
        bits: IntBitWidth::I16,
    };
    pub const INTEGER: PolyType = PolyType::Integer {
        bits: IntBitWidth::I32,
    };
    pub const BIGINT: PolyType = PolyType::Integer {
        bits: IntBitWidth::I64,
    };
    pub const REAL: PolyType = PolyType::Float {
        bits: FloatBitWidth::F32,
    };
    pub const DOUBLE: PolyType = PolyType::Float {
        bits: FloatBitWidth::F64,
    };
    pub const VARCHAR: PolyType = PolyType::String { max_length: None };

    /// Array of the given component type
    pub fn array_of(component: PolyType) -> PolyType {
        PolyType::Array(Box::new(component))
    }

    /// Returns true if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PolyType::Integer { .. } | PolyType::Float { .. } | PolyType::Decimal { .. }
        )
    }

    /// Returns true if this is an integer type of any width
    pub fn is_integer(&self) -> bool {
        matches!(self, PolyType::Integer { .. })
    }

    /// Returns true if this is a character type
    pub fn is_string(&self) -> bool {
        matches!(self, PolyType::String { .. } | PolyType::Char { .. })
    }

    /// Returns true for every interval subtype
    pub fn is_interval(&self) -> bool {
        matches!(self, PolyType::Interval(_))
    }

    /// Returns true for FILE, IMAGE, VIDEO and SOUND
    pub fn is_multimedia(&self) -> bool {
        matches!(self, PolyType::Multimedia(_))
    }

    /// Returns true for DATE, TIME and TIMESTAMP
    pub fn is_temporal(&self) -> bool {
        matches!(self, PolyType::Date | PolyType::Time | PolyType::Timestamp)
    }

    /// Component type of an array, `None` for scalars
    pub fn component_type(&self) -> Option<&PolyType> {
        match self {
            PolyType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Number of array levels wrapping the scalar component (0 for scalars)
    pub fn array_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let PolyType::Array(component) = current {
            depth += 1;
            current = component;
        }
        depth
    }

    /// Scalar type at the bottom of any array nesting
    pub fn innermost_component(&self) -> &PolyType {
        let mut current = self;
        while let PolyType::Array(component) = current {
            current = component;
        }
        current
    }

    /// Bare type name without parameters (`VARCHAR`, not `VARCHAR(20)`)
    pub fn type_name(&self) -> &'static str {
        match self {
            PolyType::Boolean => "BOOLEAN",
            PolyType::Integer {
                bits: IntBitWidth::I8,
            } => "TINYINT",
            PolyType::Integer {
                bits: IntBitWidth::I16,
            } => "SMALLINT",
            PolyType::Integer {
                bits: IntBitWidth::I32,
            } => "INTEGER",
            PolyType::Integer {
                bits: IntBitWidth::I64,
            } => "BIGINT",
            PolyType::Decimal { .. } => "DECIMAL",
            PolyType::Float {
                bits: FloatBitWidth::F32,
            } => "REAL",
            PolyType::Float {
                bits: FloatBitWidth::F64,
            } => "DOUBLE",
            PolyType::Char { .. } => "CHAR",
            PolyType::String { .. } => "VARCHAR",
            PolyType::Date => "DATE",
            PolyType::Time => "TIME",
            PolyType::Timestamp => "TIMESTAMP",
            PolyType::Interval(_) => "INTERVAL",
            PolyType::Binary => "VARBINARY",
            PolyType::Multimedia(MultimediaKind::File) => "FILE",
            PolyType::Multimedia(MultimediaKind::Image) => "IMAGE",
            PolyType::Multimedia(MultimediaKind::Video) => "VIDEO",
            PolyType::Multimedia(MultimediaKind::Sound) => "SOUND",
            PolyType::Json => "JSON",
            PolyType::Array(_) => "ARRAY",
            PolyType::Null => "NULL",
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> String {
        match self {
            PolyType::Decimal {
                precision: Some(p),
                scale: Some(s),
            } => format!("DECIMAL({p},{s})"),
            PolyType::Decimal {
                precision: Some(p), ..
            } => format!("DECIMAL({p})"),
            PolyType::Char { length: Some(n) } => format!("CHAR({n})"),
            PolyType::String {
                max_length: Some(n),
            } => format!("VARCHAR({n})"),
            PolyType::Interval(qualifier) => format!("INTERVAL {qualifier}"),
            PolyType::Array(inner) => format!("{} ARRAY", inner.display_name()),
            other => other.type_name().to_string(),
        }
    }
}

impl std::fmt::Display for PolyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Parse a type string (catalog metadata, config) into a PolyType.
///
/// Returns `None` when the string names no canonical type.
pub fn parse_poly_type(s: &str) -> Option<PolyType> {
    let upper = s.trim().to_uppercase();

    let parsed = match upper.as_str() {
        "BOOL" | "BOOLEAN" => PolyType::Boolean,
        "TINYINT" | "INT1" => PolyType::TINYINT,
        "SMALLINT" | "INT2" => PolyType::SMALLINT,
        "INT" | "INTEGER" | "INT4" => PolyType::INTEGER,
        "BIGINT" | "INT8" => PolyType::BIGINT,
        "REAL" | "FLOAT4" => PolyType::REAL,
        "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => PolyType::DOUBLE,
        "DECIMAL" | "NUMERIC" => PolyType::Decimal {
            precision: None,
            scale: None,
        },
        "CHAR" | "CHARACTER" => PolyType::Char { length: None },
        "VARCHAR" | "TEXT" | "STRING" | "CHARACTER VARYING" => PolyType::VARCHAR,
        "DATE" => PolyType::Date,
        "TIME" => PolyType::Time,
        "TIMESTAMP" => PolyType::Timestamp,
        "VARBINARY" | "BINARY" | "BLOB" | "BYTEA" => PolyType::Binary,
        "FILE" => PolyType::Multimedia(MultimediaKind::File),
        "IMAGE" => PolyType::Multimedia(MultimediaKind::Image),
        "VIDEO" => PolyType::Multimedia(MultimediaKind::Video),
        "SOUND" | "AUDIO" => PolyType::Multimedia(MultimediaKind::Sound),
        "JSON" => PolyType::Json,
        _ => return try_parse_compound(&upper),
    };
    Some(parsed)
}

/// Parse arrays (`INTEGER[]`, `INTEGER ARRAY`), intervals and
/// parameterized types like `VARCHAR(255)` and `DECIMAL(10,2)`
fn try_parse_compound(upper: &str) -> Option<PolyType> {
    if let Some(inner) = upper.strip_suffix("[]") {
        return parse_poly_type(inner).map(PolyType::array_of);
    }
    if let Some(inner) = upper.strip_suffix(" ARRAY") {
        return parse_poly_type(inner).map(PolyType::array_of);
    }
    if let Some(qualifier) = upper.strip_prefix("INTERVAL ") {
        return parse_interval_qualifier(qualifier.trim()).map(PolyType::Interval);
    }

    let open = upper.find('(')?;
    let close = upper.rfind(')')?;
    let base = upper[..open].trim();
    let params = &upper[open + 1..close];

    match base {
        "VARCHAR" | "CHARACTER VARYING" => {
            let len: u32 = params.trim().parse().ok()?;
            Some(PolyType::String {
                max_length: Some(len),
            })
        }
        "CHAR" | "CHARACTER" => {
            let len: u32 = params.trim().parse().ok()?;
            Some(PolyType::Char { length: Some(len) })
        }
        "DECIMAL" | "NUMERIC" => {
            let parts: Vec<&str> = params.split(',').collect();
            let precision: u16 = parts.first()?.trim().parse().ok()?;
            let scale: Option<u16> = parts.get(1).and_then(|s| s.trim().parse().ok());
            Some(PolyType::Decimal {
                precision: Some(precision),
                scale,
            })
        }
        _ => None,
    }
}

fn parse_interval_qualifier(s: &str) -> Option<IntervalQualifier> {
    let normalized: Vec<&str> = s.split_whitespace().collect();
    let qualifier = match normalized.as_slice() {
        ["YEAR"] => IntervalQualifier::Year,
        ["YEAR", "TO", "MONTH"] => IntervalQualifier::YearMonth,
        ["MONTH"] => IntervalQualifier::Month,
        ["DAY"] => IntervalQualifier::Day,
        ["DAY", "TO", "HOUR"] => IntervalQualifier::DayHour,
        ["DAY", "TO", "MINUTE"] => IntervalQualifier::DayMinute,
        ["DAY", "TO", "SECOND"] => IntervalQualifier::DaySecond,
        ["HOUR"] => IntervalQualifier::Hour,
        ["HOUR", "TO", "MINUTE"] => IntervalQualifier::HourMinute,
        ["HOUR", "TO", "SECOND"] => IntervalQualifier::HourSecond,
        ["MINUTE"] => IntervalQualifier::Minute,
        ["MINUTE", "TO", "SECOND"] => IntervalQualifier::MinuteSecond,
        ["SECOND"] => IntervalQualifier::Second,
        _ => return None,
    };
    Some(qualifier)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
