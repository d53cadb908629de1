//! Filename sanitization for staged and copied downloads.

const NAME_MAX: usize = 255;

/// Makes `name` safe to use as a single path component.
///
/// Separators, NUL and control characters become `_`; leading and trailing
/// dots, spaces and underscores are trimmed; the result is capped at 255 bytes
/// on a char boundary. May return an empty string.
pub fn sanitize_file_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let mut take = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(take) {
        take -= 1;
    }
    trimmed[..take].to_string()
}
