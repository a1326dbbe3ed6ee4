//! # fishreader
//!
//! A small library for reading plain-text novels a few characters at a time,
//! for example in an editor status bar.
//!
//! ## Features
//!
//! - Detect the encoding of `.txt` files (UTF-8, UTF-16, GBK, Big5,
//!   Shift_JIS, ...) and normalize them to UTF-8
//! - Split novels into chapters on headings like `第十二章`, `楔子`, `序章`
//! - Scan a directory tree of novels and load each book lazily, once
//! - Page through a book with a chapter / line / offset cursor
//!
//! ## Quick Start
//!
//! ```no_run
//! use fishreader::{Library, ReaderConfig, StatusBarReader};
//!
//! # async fn run() -> fishreader::Result<()> {
//! let library = Library::open("novels").await?;
//! let first = library.books()[0];
//! let book = library.expand_book(first).await?;
//!
//! let mut reader = StatusBarReader::with_book(ReaderConfig::default(), book);
//! println!("{}: {}", reader.current_chapter_title(), reader.render());
//! reader.next_line();
//! println!("{}: {}", reader.current_chapter_title(), reader.render());
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with Text Directly
//!
//! The text pipeline is also usable without the file system:
//!
//! ```
//! use fishreader::{normalize, segment};
//!
//! let normalized = normalize("楔子\n很久以前\n第1章 开始\n正文".as_bytes());
//! let chapters = segment(&normalized.text);
//!
//! assert_eq!(chapters.len(), 3);
//! assert_eq!(chapters[1].title, "楔子");
//! assert_eq!(chapters[2].lines, ["正文"]);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod reader;
pub mod text;
pub(crate) mod util;

pub use config::{Config, ReaderConfig};
pub use error::{Error, Result};
pub use model::{
    Book, BookState, Chapter, ContentNode, Library, NodeId, NodeKind, load_book, load_directory,
};
pub use reader::{Cursor, StatusBarReader};
pub use text::{Normalized, TextEncoding, normalize, segment};
