//! String value generators.

/// `"<column>_<draw>"`, e.g. `name_42`.
pub fn labelled(column: &str, draw: i64) -> String {
    format!("{column}_{draw}")
}
