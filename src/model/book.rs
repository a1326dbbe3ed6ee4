//! Loaded book content.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::text::TextEncoding;

/// A chapter: a title and the raw lines that follow its heading.
///
/// Lines keep their original order and include blank lines. The heading line
/// itself is not part of `lines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub lines: Vec<String>,
}

impl Chapter {
    /// Create an empty chapter with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Builder: add a line.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Number of lines in the chapter.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the chapter holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// A fully loaded book.
///
/// Books are immutable once loaded and shared as `Arc<Book>` between the
/// library and any readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub title: String,
    pub path: PathBuf,
    /// Encoding the source bytes were decoded from.
    #[serde(serialize_with = "serialize_encoding")]
    pub encoding: TextEncoding,
    /// Detector confidence for `encoding`, in `0.0..=1.0`.
    pub confidence: f32,
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Create a book with no chapters.
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            encoding: TextEncoding::Utf8,
            confidence: 1.0,
            chapters: Vec::new(),
        }
    }

    /// Builder: add a chapter.
    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// Source file of this book.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Chapter at `index`, if any.
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Number of chapters.
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Total number of lines across all chapters.
    pub fn line_count(&self) -> usize {
        self.chapters.iter().map(Chapter::len).sum()
    }
}

fn serialize_encoding<S: serde::Serializer>(
    encoding: &TextEncoding,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(encoding.name())
}
