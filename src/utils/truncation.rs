const MAX_ERROR_LENGTH: usize = 500;
const MAX_SNIPPET_LENGTH: usize = 300;

fn truncate_at(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Clip upstream error bodies before they reach logs or error messages.
pub fn truncate_error(error: &str) -> String {
    truncate_at(error, MAX_ERROR_LENGTH)
}

/// Clip an HTML snippet for terminal display.
pub fn truncate_snippet(snippet: &str) -> String {
    truncate_at(snippet.trim(), MAX_SNIPPET_LENGTH)
}
