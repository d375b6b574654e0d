/// Shortens `text` to at most `max` bytes for log output, appending `...`
/// when something was cut. Never splits a UTF-8 sequence.
pub fn truncate_for_log(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &text[..end])
}
