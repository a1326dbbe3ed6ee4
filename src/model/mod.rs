//! Content tree: directories, lazily loaded books, and their chapters.
//!
//! This module contains:
//! - The library arena and its file-system loader
//! - Node types and the per-book load slot
//! - Loaded book and chapter data

mod book;
mod library;
mod node;

pub use book::{Book, Chapter};
pub use library::{Library, load_book, load_directory};
pub use node::{BookSlot, BookState, ContentNode, NodeId, NodeKind};
