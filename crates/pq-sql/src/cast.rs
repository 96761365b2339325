//! Cast-target resolution
//!
//! Dialects override the cast target for a handful of types and fall back to
//! the shared default resolver for the rest. Targets with no native type name
//! in a dialect are emitted as verbatim tokens carrying a leading sentinel so
//! they are never confused with regular identifiers; unparsing strips it.

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use pq_core::{MultimediaKind, PolyType};

/// Marks a verbatim cast token
pub const ALIEN_TYPE_SENTINEL: char = '_';

/// Resolved cast target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastSpec {
    token: String,
}

impl CastSpec {
    /// A standard SQL type name
    pub fn standard(name: impl Into<String>) -> Self {
        Self { token: name.into() }
    }

    /// A dialect-specific type name written verbatim
    pub fn alien(name: impl AsRef<str>) -> Self {
        Self {
            token: format!("{ALIEN_TYPE_SENTINEL}{}", name.as_ref()),
        }
    }

    /// Token as resolved, sentinel included
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_alien(&self) -> bool {
        self.token.starts_with(ALIEN_TYPE_SENTINEL)
    }

    /// Text written into SQL, sentinel stripped
    pub fn unparse(&self) -> &str {
        self.token
            .strip_prefix(ALIEN_TYPE_SENTINEL)
            .unwrap_or(&self.token)
    }

    fn with_suffix(self, suffix: &str) -> Self {
        Self {
            token: self.token + suffix,
        }
    }
}

impl std::fmt::Display for CastSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.unparse())
    }
}

/// Resolve the cast target for `ty` under `dialect`.
///
/// Arrays of any nesting depth resolve to the innermost scalar's keyword
/// followed by one `[]` per level.
pub fn cast_spec(dialect: &SqlDialect, ty: &PolyType) -> SqlResult<CastSpec> {
    if let PolyType::Array(_) = ty {
        let component = ty.innermost_component();
        let brackets = "[]".repeat(ty.array_depth());
        let scalar = match dialect.cast_spec.and_then(|hook| hook(component)) {
            Some(spec) => spec,
            None => CastSpec::alien(scalar_keyword(dialect, component)?),
        };
        return Ok(scalar.with_suffix(&brackets));
    }
    match dialect.cast_spec.and_then(|hook| hook(ty)) {
        Some(spec) => Ok(spec),
        None => default_cast_spec(dialect, ty),
    }
}

/// Shared resolver: standard names with precision clamped to the dialect's
/// type system
pub fn default_cast_spec(dialect: &SqlDialect, ty: &PolyType) -> SqlResult<CastSpec> {
    let clamp = |n: u32| match (dialect.max_precision)(ty) {
        Some(max) => n.min(max),
        None => n,
    };
    let spec = match ty {
        PolyType::Decimal {
            precision: Some(p),
            scale,
        } => {
            let p = clamp(u32::from(*p));
            match scale {
                Some(s) => format!("DECIMAL({p}, {s})"),
                None => format!("DECIMAL({p})"),
            }
        }
        PolyType::Char { length: Some(n) } => format!("CHAR({})", clamp(*n)),
        PolyType::String {
            max_length: Some(n),
        } => format!("VARCHAR({})", clamp(*n)),
        PolyType::Interval(qualifier) => format!("INTERVAL {qualifier}"),
        PolyType::Multimedia(_) => "BLOB".to_string(),
        PolyType::Array(_) => return cast_spec(dialect, ty),
        PolyType::Null => {
            return Err(SqlError::UnsupportedCastTarget {
                poly_type: ty.clone(),
                dialect: dialect.name(),
            })
        }
        other => other.type_name().to_string(),
    };
    Ok(CastSpec::standard(spec))
}

/// Bare keyword for an array component with no dialect override
fn scalar_keyword(dialect: &SqlDialect, ty: &PolyType) -> SqlResult<&'static str> {
    match ty {
        PolyType::Null => Err(SqlError::UnsupportedCastTarget {
            poly_type: PolyType::array_of(PolyType::Null),
            dialect: dialect.name(),
        }),
        PolyType::Multimedia(MultimediaKind::File)
        | PolyType::Multimedia(MultimediaKind::Image)
        | PolyType::Multimedia(MultimediaKind::Video)
        | PolyType::Multimedia(MultimediaKind::Sound) => Ok("BLOB"),
        other => Ok(other.type_name()),
    }
}

#[cfg(test)]
#[path = "cast_test.rs"]
mod tests;
