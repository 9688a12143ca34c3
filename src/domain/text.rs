pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` characters, marking the cut with an
/// ellipsis. A truncated result is exactly `max_len` characters long.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    let marker = ELLIPSIS.chars().count();
    if max_len <= marker {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - marker).collect();
    out.push_str(ELLIPSIS);
    out
}
