//! Shared serde helper functions

/// Serde default function that returns `true`.
pub fn default_true() -> bool {
    true
}
