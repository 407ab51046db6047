//! # Search Highlight
//!
//! Prefix matching used to highlight catalog items. Never filters.

/// True iff `query` is non-empty and a case-insensitive prefix of `name`
pub fn is_match(query: &str, name: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    name.to_lowercase().starts_with(&query.to_lowercase())
}
