//! Identifier checks for declared field and alias names.

use std::sync::OnceLock;

use regex::Regex;

/// Compiled identifier pattern, built lazily and kept for the life of the program.
fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
    })
}

/// Check whether `name` is usable as a field or alias name.
///
/// Names must start with a letter or underscore and contain only ASCII
/// letters, digits and underscores. Dots are rejected because `model.field`
/// paths split on them.
pub fn is_identifier(name: &str) -> bool {
    identifier_pattern().is_match(name)
}
