/// Characters that are not allowed in artifact file names
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maps a URL (or any string) to a filesystem-safe identifier
///
/// Each of `< > : " / \ | ? *` is replaced with `_`; everything else is kept.
///
/// # Examples
///
/// ```
/// use scroopy::url::sanitize_title;
///
/// assert_eq!(sanitize_title("https://example.com/a?b=c"), "https___example.com_a_b=c");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
