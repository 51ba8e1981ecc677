//! Comma-separated tag input.

/// Split a tag field into trimmed tags, keeping order and dropping empty pieces.
///
/// `"a, b ,c"` becomes `["a", "b", "c"]`; an empty field yields no tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render tags back into the editable form used by the edit dialog.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}
