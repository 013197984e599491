//! Track title cleaning
//!
//! Turns a source locator such as `music/03. Blue Train.mp3` into the
//! human-facing title `Blue Train`. The cleaned title is what the store
//! sorts and searches on, and what the console shows.

/// Placeholder returned for an empty locator
pub const EMPTY_PATH_TITLE: &str = "[Empty Path]";

/// Placeholder returned when cleaning strips everything
pub const UNNAMED_TITLE: &str = "[Unnamed]";

/// Clean a source locator down to its display title.
///
/// Steps, in order:
/// 1. Drop everything up to the last `/` or `\`
/// 2. Drop the final extension (a leading dot, as in `.hidden`, is kept)
/// 3. Leave `.` and `..` alone (the original locator is returned)
/// 4. Drop a numeric track prefix such as `01. `, `7 ` or `  12.`
pub fn clean_title(full_path: &str) -> String {
    if full_path.is_empty() {
        return EMPTY_PATH_TITLE.to_string();
    }

    let file_name = match full_path.rfind(|c| c == '/' || c == '\\') {
        Some(idx) => &full_path[idx + 1..],
        None => full_path,
    };

    let stem = match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    };

    if stem == "." || stem == ".." {
        return full_path.to_string();
    }

    let cleaned = strip_numeric_prefix(stem);
    if cleaned.is_empty() {
        UNNAMED_TITLE.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Lowercased projection used for case-insensitive ordering and matching
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Remove a leading `\s*\d+\.?\s*` prefix, if present
fn strip_numeric_prefix(stem: &str) -> &str {
    let rest = stem.trim_start();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    if digits_end == 0 {
        return stem;
    }

    let rest = &rest[digits_end..];
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.trim_start()
}
