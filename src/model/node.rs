//! Library tree nodes.
//!
//! The library is an arena of [`ContentNode`]s addressed by [`NodeId`].
//! Directory shape is fixed when the library is built; the only thing that
//! changes afterward is a book slot going from unloaded to loaded, once.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;

use super::book::Book;
use super::library::load_book;
use crate::error::Result;

/// Stable index of a node within its [`Library`](super::Library).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directory or a book in the library.
#[derive(Debug)]
pub struct ContentNode {
    pub title: String,
    /// Containing directory, `None` for the root.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// What a node is. Chapters live inside a loaded [`Book`], not in the arena.
#[derive(Debug)]
pub enum NodeKind {
    /// Subdirectories and books, in file-system enumeration order.
    Directory { children: Vec<NodeId> },
    Book(BookSlot),
}

impl ContentNode {
    pub(crate) fn directory(title: String, children: Vec<NodeId>) -> Self {
        Self {
            title,
            parent: None,
            kind: NodeKind::Directory { children },
        }
    }

    pub(crate) fn book(title: String, source: PathBuf) -> Self {
        Self {
            title,
            parent: None,
            kind: NodeKind::Book(BookSlot::new(source)),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub fn is_book(&self) -> bool {
        matches!(self.kind, NodeKind::Book(_))
    }

    /// Child ids of a directory; empty for books.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory { children } => children,
            NodeKind::Book(_) => &[],
        }
    }

    pub fn as_book(&self) -> Option<&BookSlot> {
        match &self.kind {
            NodeKind::Book(slot) => Some(slot),
            NodeKind::Directory { .. } => None,
        }
    }
}

/// Observable load state of a book.
#[derive(Debug, Clone, Copy)]
pub enum BookState<'a> {
    /// Not read yet. `path` is where the content will come from.
    Unloaded { path: &'a Path },
    Loaded(&'a Arc<Book>),
}

impl BookState<'_> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, BookState::Loaded(_))
    }
}

/// Lazy-load slot for one book file.
///
/// The cell is assigned at most once. Concurrent [`load`](Self::load) calls
/// share a single in-flight read; a failed read leaves the slot unloaded so
/// a later call can retry.
#[derive(Debug)]
pub struct BookSlot {
    source: PathBuf,
    loaded: OnceCell<Arc<Book>>,
}

impl BookSlot {
    pub(crate) fn new(source: PathBuf) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// The backing file, whether or not it has been loaded.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The backing file while the book is unloaded, `None` once loaded.
    pub fn source_ref(&self) -> Option<&Path> {
        if self.loaded.initialized() {
            None
        } else {
            Some(&self.source)
        }
    }

    pub fn state(&self) -> BookState<'_> {
        match self.loaded.get() {
            Some(book) => BookState::Loaded(book),
            None => BookState::Unloaded {
                path: &self.source,
            },
        }
    }

    /// The loaded book, if loading has completed.
    pub fn get(&self) -> Option<&Arc<Book>> {
        self.loaded.get()
    }

    /// Load the book on first call; return the cached book afterward.
    pub async fn load(&self) -> Result<Arc<Book>> {
        let book = self
            .loaded
            .get_or_try_init(|| async { load_book(&self.source).await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(book))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_node() {
        let node = ContentNode::directory("books".into(), vec![NodeId(0), NodeId(1)]);
        assert!(node.is_directory());
        assert!(!node.is_book());
        assert_eq!(node.children(), &[NodeId(0), NodeId(1)]);
        assert!(node.as_book().is_none());
    }

    #[test]
    fn test_unloaded_book_node() {
        let node = ContentNode::book("a.txt".into(), PathBuf::from("/lib/a.txt"));
        assert!(node.is_book());
        assert!(node.children().is_empty());

        let slot = node.as_book().unwrap();
        assert_eq!(slot.source_ref(), Some(Path::new("/lib/a.txt")));
        assert!(slot.get().is_none());
        assert!(matches!(
            slot.state(),
            BookState::Unloaded { path } if path == Path::new("/lib/a.txt")
        ));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
