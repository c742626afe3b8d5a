// src/exec/preview.rs

/// Maximum length (in characters) of a process output preview.
pub const PREVIEW_MAX_CHARS: usize = 200;

/// First non-blank line of `stderr`, else of `stdout`, flattened and bounded
/// to [`PREVIEW_MAX_CHARS`].
pub fn output_preview(stderr: &str, stdout: &str) -> Option<String> {
    first_non_blank_line(stderr)
        .or_else(|| first_non_blank_line(stdout))
        .map(|line| truncate_chars(&flatten_newlines(line), PREVIEW_MAX_CHARS))
}

fn first_non_blank_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

/// Replace line breaks with single spaces.
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
