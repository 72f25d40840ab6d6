//! Scope serialization with provider-specific delimiters.

/// Delimiter used when a provider declares an empty one.
pub const DEFAULT_SCOPE_DELIMITER: &str = " ";

fn effective(delimiter: &str) -> &str {
    if delimiter.is_empty() {
        DEFAULT_SCOPE_DELIMITER
    } else {
        delimiter
    }
}

/// Join scopes with the delimiter.
pub fn join_scope<S: AsRef<str>>(scope: &[S], delimiter: &str) -> String {
    scope
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(effective(delimiter))
}

/// Split a delimited scope string, dropping empty fragments.
pub fn split_scope(scope: &str, delimiter: &str) -> Vec<String> {
    scope
        .split(effective(delimiter))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
