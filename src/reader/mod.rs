//! Pagination over a loaded book for single-line displays.
//!
//! [`StatusBarReader`] holds a chapter / line / offset cursor and renders the
//! current window with [`render_window`]. Hosts call a navigation method on
//! each key press and show the returned string next to
//! [`StatusBarReader::current_chapter_title`].

mod status_bar;
mod window;

pub use status_bar::{Cursor, NO_CHAPTER_TITLE, StatusBarReader};
pub use window::{LINE_END, LINE_START, MORE_AFTER, MORE_BEFORE, render_window, window_text};
