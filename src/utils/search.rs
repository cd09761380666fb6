//! Text folding and LIKE patterns for catalog and member search.
//!
//! Searchable fields are stored a second time in lowercase so matching does
//! not depend on SQLite's ASCII-only case folding.

/// Case-folded form stored in the `*_key` columns and applied to queries.
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// `%term%` with `\`, `%` and `_` escaped; pair with `ESCAPE '\'`.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in fold(term).chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
