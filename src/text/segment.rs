//! Chapter segmentation for plain-text novels.
//!
//! Chinese web novels mark chapters with headings like `第十二章 风起`,
//! `楔子` or `序章`. A line containing such a marker starts a new chapter;
//! everything else is content of the chapter currently open.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::model::Chapter;

/// Title of the synthetic chapter holding lines before the first heading.
pub const PREFACE_TITLE: &str = "header";

/// Any prefix, a chapter marker, then optional title text. The prefix is
/// greedy, so the last marker on a line is the one that counts.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(第[0-9０-９一二三四五六七八九十百千万零〇两]+章|楔子|序章|引子)\s*(.*)$")
        .unwrap()
});

/// Characters at least one of which every chapter marker contains.
const MARKER_CHARS: [char; 3] = ['章', '楔', '引'];

/// Return the chapter title if `line` is a heading.
///
/// The title is the marker followed by the trimmed trailing text, joined by
/// a single space. When a line holds several markers, the last one wins.
///
/// # Examples
///
/// ```
/// use fishreader::text::heading_title;
///
/// assert_eq!(heading_title("第1章 开始").as_deref(), Some("第1章 开始"));
/// assert_eq!(heading_title("  楔子").as_deref(), Some("楔子"));
/// assert_eq!(heading_title("Hello"), None);
/// ```
pub fn heading_title(line: &str) -> Option<String> {
    if !line.contains(MARKER_CHARS) {
        return None;
    }
    let caps = HEADING_RE.captures(line)?;
    let marker = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
    if rest.is_empty() {
        Some(marker.to_string())
    } else {
        Some(format!("{marker} {rest}"))
    }
}

/// Split text into chapters.
///
/// Lines before the first heading go to a preface chapter titled
/// [`PREFACE_TITLE`], which is emitted even when empty. Heading lines are
/// consumed as titles. Consecutive headings yield empty chapters. Blank or
/// whitespace-only input yields no chapters at all.
///
/// # Examples
///
/// ```
/// use fishreader::text::segment;
///
/// let chapters = segment("Intro line\n第1章 开始\nHello\nWorld\n第2章 继续\nBye");
/// assert_eq!(chapters.len(), 3);
/// assert_eq!(chapters[0].lines, ["Intro line"]);
/// assert_eq!(chapters[1].title, "第1章 开始");
/// assert_eq!(chapters[2].lines, ["Bye"]);
/// ```
pub fn segment(text: &str) -> Vec<Chapter> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chapters = Vec::new();
    let mut current = Chapter::new(PREFACE_TITLE);

    for line in Lines::new(text) {
        match heading_title(line) {
            Some(title) => chapters.push(std::mem::replace(&mut current, Chapter::new(title))),
            None => current.lines.push(line.to_string()),
        }
    }

    chapters.push(current);
    chapters
}

/// Line iterator splitting on `\n` and dropping one trailing `\r`.
///
/// Unlike [`str::lines`], a trailing newline yields a final empty line, so
/// the line count of the input is preserved exactly.
pub(crate) struct Lines<'a> {
    rest: Option<&'a str>,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { rest: Some(text) }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        let line = match memchr::memchr(b'\n', rest.as_bytes()) {
            Some(pos) => {
                self.rest = Some(&rest[pos + 1..]);
                &rest[..pos]
            }
            None => {
                self.rest = None;
                rest
            }
        };
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}
