//! Status-bar reading cursor.

use std::sync::Arc;

use log::debug;

use super::window::render_window;
use crate::config::ReaderConfig;
use crate::model::{Book, Chapter};

/// Title reported when no chapter is available.
pub const NO_CHAPTER_TITLE: &str = "无章节";

/// Position within a book. Ordering is reading order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub chapter: usize,
    pub line: usize,
    /// Character offset within the line.
    pub offset: usize,
}

/// Pages through a book a few characters at a time.
///
/// Every navigation method updates the cursor and returns the newly rendered
/// window. Navigation stops at the first and last position; it never wraps
/// and never reads past either end. Requests outside the book leave the
/// cursor untouched.
///
/// Not thread-safe: drive it from a single event handler.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use fishreader::{Book, Chapter, ReaderConfig, StatusBarReader};
///
/// let book = Book::new("demo.txt", "demo.txt")
///     .with_chapter(Chapter::new("第1章 开始").with_line("Hello World"));
/// let mut reader = StatusBarReader::with_book(ReaderConfig::new(5), Arc::new(book));
///
/// assert_eq!(reader.render(), "▶ Hello --");
/// assert_eq!(reader.next_line(), "-- Worl --");
/// assert_eq!(reader.next_line(), "-- d ◀");
/// assert_eq!(reader.current_chapter_title(), "第1章 开始");
/// ```
#[derive(Debug, Clone)]
pub struct StatusBarReader {
    config: ReaderConfig,
    book: Option<Arc<Book>>,
    cursor: Cursor,
    rendered: String,
}

impl StatusBarReader {
    /// Create a reader with no book.
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            config,
            book: None,
            cursor: Cursor::default(),
            rendered: String::new(),
        }
    }

    /// Create a reader positioned at the start of `book`.
    pub fn with_book(config: ReaderConfig, book: Arc<Book>) -> Self {
        let mut reader = Self::new(config);
        reader.set_book(book);
        reader
    }

    /// Switch to `book` and rewind to chapter 0, line 0, offset 0.
    pub fn set_book(&mut self, book: Arc<Book>) -> &str {
        debug!(
            "reader: set book {} ({} chapters)",
            book.title,
            book.chapter_count()
        );
        self.book = Some(book);
        self.cursor = Cursor::default();
        self.refresh()
    }

    /// Drop the current book.
    pub fn clear_book(&mut self) {
        self.book = None;
        self.cursor = Cursor::default();
        self.rendered.clear();
    }

    pub fn book(&self) -> Option<&Arc<Book>> {
        self.book.as_ref()
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Apply new settings and re-render at the current position.
    pub fn set_config(&mut self, config: ReaderConfig) -> &str {
        self.config = config;
        self.refresh()
    }

    pub fn position(&self) -> Cursor {
        self.cursor
    }

    pub fn chapter_count(&self) -> usize {
        self.book.as_ref().map_or(0, |book| book.chapter_count())
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.book.as_ref()?.chapter(self.cursor.chapter)
    }

    /// The full line under the cursor, or `""` if there is none.
    pub fn current_line(&self) -> &str {
        self.current_chapter()
            .and_then(|chapter| chapter.line(self.cursor.line))
            .unwrap_or("")
    }

    pub fn current_chapter_title(&self) -> &str {
        self.current_chapter()
            .map(|chapter| chapter.title.as_str())
            .filter(|title| !title.is_empty())
            .unwrap_or(NO_CHAPTER_TITLE)
    }

    /// The window at the current position.
    pub fn render(&self) -> &str {
        &self.rendered
    }

    /// Advance one window. At the end of a line, move to the next line; at
    /// the end of a chapter, to the next chapter.
    ///
    /// Blank lines and empty chapters are stepped over like any other, so
    /// repeated calls always reach the last line of the book.
    pub fn next_line(&mut self) -> &str {
        let total = self.current_line().chars().count();
        let step = self.show_length();

        if self.cursor.offset.saturating_add(step) < total {
            self.cursor.offset += step;
            return self.refresh();
        }

        let line_count = self.current_chapter().map_or(0, Chapter::len);
        if self.cursor.line + 1 < line_count {
            self.cursor.line += 1;
            self.cursor.offset = 0;
            self.refresh()
        } else {
            self.next_chapter()
        }
    }

    /// Step back one window. At the start of a line, move to the start of
    /// the previous line; at the first line, to the previous chapter.
    pub fn prev_line(&mut self) -> &str {
        if self.cursor.offset > 0 {
            self.cursor.offset -= self.show_length().min(self.cursor.offset);
            self.refresh()
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.refresh()
        } else {
            self.prev_chapter()
        }
    }

    /// Jump to the start of the next chapter. No-op in the last chapter.
    pub fn next_chapter(&mut self) -> &str {
        let next = self.cursor.chapter + 1;
        if next < self.chapter_count() {
            self.jump_to(next);
        }
        self.render()
    }

    /// Jump to the start of the previous chapter. No-op in the first chapter.
    pub fn prev_chapter(&mut self) -> &str {
        if self.book.is_some() && self.cursor.chapter > 0 {
            self.jump_to(self.cursor.chapter - 1);
        }
        self.render()
    }

    /// Jump to the start of chapter `index`. Out-of-range indices are ignored.
    pub fn set_chapter(&mut self, index: usize) -> &str {
        if index < self.chapter_count() {
            self.jump_to(index);
        } else {
            debug!(
                "reader: chapter {index} out of range ({} chapters)",
                self.chapter_count()
            );
        }
        self.render()
    }

    fn jump_to(&mut self, chapter: usize) {
        self.cursor = Cursor {
            chapter,
            line: 0,
            offset: 0,
        };
        self.refresh();
    }

    fn show_length(&self) -> usize {
        self.config.show_length.max(1)
    }

    fn refresh(&mut self) -> &str {
        self.rendered = render_window(self.current_line(), self.cursor.offset, self.show_length());
        &self.rendered
    }
}
