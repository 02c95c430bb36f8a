use regex::Regex;
use std::sync::LazyLock;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid regex"));

/// Remove annotations like "(tjl)" or "(temp)" from a printed name.
pub fn strip_annotations(name: &str) -> String {
    PARENTHESIZED.replace_all(name, "").into_owned()
}

/// Reorder "First [Middle] Last" into "Last First [Middle]".
pub fn last_name_first(name: &str) -> String {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    match parts.pop() {
        Some(last) if !parts.is_empty() => format!("{} {}", last, parts.join(" ")),
        Some(only) => only.to_string(),
        None => String::new(),
    }
}

/// Name as written to the remittance file, before uppercasing.
pub fn normalize_name(raw: &str) -> String {
    last_name_first(&strip_annotations(raw))
}
