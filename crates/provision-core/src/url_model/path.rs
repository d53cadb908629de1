//! Filename extraction from URL path.

/// Returns the last non-empty path segment of `url`, still percent-encoded.
///
/// Query and fragment never contribute. Returns `None` if the URL cannot be
/// parsed or has no usable segment.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|s| !s.is_empty())
        .last()?;
    match segment {
        "." | ".." => None,
        s => Some(s.to_string()),
    }
}
