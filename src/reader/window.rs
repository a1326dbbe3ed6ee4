//! Fixed-width window rendering.

/// Prefix when the window starts at the beginning of the line.
pub const LINE_START: &str = "▶ ";
/// Prefix when text precedes the window.
pub const MORE_BEFORE: &str = "-- ";
/// Suffix when the window reaches the end of the line.
pub const LINE_END: &str = " ◀";
/// Suffix when text follows the window.
pub const MORE_AFTER: &str = " --";

/// Render the window of `line` starting at character `offset`.
///
/// Takes at most `show_length` characters, trims them, and adds markers:
/// `▶ ` at offset zero and `-- ` otherwise, ` ◀` once
/// `offset + show_length >= line length` and ` --` otherwise. Lengths count
/// `char`s. An empty line renders as an empty string.
///
/// # Examples
///
/// ```
/// use fishreader::reader::render_window;
///
/// assert_eq!(render_window("Hello World", 0, 5), "▶ Hello --");
/// assert_eq!(render_window("Hello World", 5, 5), "-- Worl --");
/// assert_eq!(render_window("Hello World", 10, 5), "-- d ◀");
/// ```
pub fn render_window(line: &str, offset: usize, show_length: usize) -> String {
    if line.is_empty() {
        return String::new();
    }

    let total = line.chars().count();
    let start = byte_offset(line, offset);
    let end = start + byte_offset(&line[start..], show_length);
    let content = line[start..end].trim();

    let prefix = if offset == 0 { LINE_START } else { MORE_BEFORE };
    let suffix = if offset.saturating_add(show_length) >= total {
        LINE_END
    } else {
        MORE_AFTER
    };

    let mut rendered = String::with_capacity(prefix.len() + content.len() + suffix.len());
    rendered.push_str(prefix);
    rendered.push_str(content);
    rendered.push_str(suffix);
    rendered
}

/// Byte index of the `chars`-th character, clamped to the end of `text`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

/// Strip the markers [`render_window`] adds, leaving the window text.
pub fn window_text(rendered: &str) -> &str {
    let text = rendered
        .strip_prefix(LINE_START)
        .or_else(|| rendered.strip_prefix(MORE_BEFORE))
        .unwrap_or(rendered);
    text.strip_suffix(LINE_END)
        .or_else(|| text.strip_suffix(MORE_AFTER))
        .unwrap_or(text)
}
