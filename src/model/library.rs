//! Building a library from the file system and loading books on demand.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use log::{debug, warn};
use tokio::fs;

use super::book::Book;
use super::node::{BookSlot, BookState, ContentNode, NodeId};
use crate::error::{Error, Result};
use crate::text::{normalize, segment};
use crate::util::{display_title, has_text_extension};

/// A tree of directories and lazily loaded books.
///
/// Directory structure is read eagerly; book contents are read on the first
/// [`expand_book`](Self::expand_book) for that node. `Library` is `Send +
/// Sync`, so it can be shared through an `Arc` by several UI handlers.
#[derive(Debug)]
pub struct Library {
    nodes: Vec<ContentNode>,
    root: NodeId,
}

impl Library {
    /// Open a library rooted at `path`.
    ///
    /// A directory is scanned recursively; a single file becomes a library
    /// whose root is one unloaded book.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .await
            .map_err(|source| Error::read(path, source))?;
        if metadata.is_dir() {
            Self::load_directory(path).await
        } else {
            Ok(Self::single_book(path))
        }
    }

    /// Scan `path` recursively into a directory skeleton.
    ///
    /// Files become unloaded books regardless of extension; no file content
    /// is read. An unreadable subdirectory is logged and left out while its
    /// siblings still load. Only an unreadable root is an error.
    pub async fn load_directory(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut builder = Builder::default();
        let root = builder.scan_directory(path).await?;
        debug!(
            "scanned {}: {} nodes",
            path.display(),
            builder.nodes.len()
        );
        Ok(builder.finish(root))
    }

    /// A library holding a single unloaded book.
    pub fn single_book(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let node = ContentNode::book(display_title(&path), path);
        Self {
            nodes: vec![node],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes (directories and books).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: every library holds at least its root node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&ContentNode> {
        self.nodes.get(id.index())
    }

    /// Children of a directory. Empty for books and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(ContentNode::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    fn book_slot(&self, id: NodeId) -> Option<&BookSlot> {
        self.node(id)?.as_book()
    }

    /// Load state of a book node, `None` for directories and unknown ids.
    pub fn book_state(&self, id: NodeId) -> Option<BookState<'_>> {
        self.book_slot(id).map(BookSlot::state)
    }

    /// All nodes in depth-first tree order, paired with their depth.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, self.root)];
        while let Some((depth, id)) = stack.pop() {
            order.push((depth, id));
            for &child in self.children(id).iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        order
    }

    /// Book ids in depth-first tree order.
    pub fn books(&self) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .map(|(_, id)| id)
            .filter(|&id| self.book_slot(id).is_some())
            .collect()
    }

    /// Find the book backed by `path`.
    pub fn find_book(&self, path: &Path) -> Option<NodeId> {
        self.books()
            .into_iter()
            .find(|&id| self.book_slot(id).is_some_and(|slot| slot.source() == path))
    }

    /// Load a book's chapters on first call and return the cached book after.
    ///
    /// Concurrent calls for the same node share one read of the file. Hosts
    /// holding views of this node should refresh them once this returns.
    pub async fn expand_book(&self, id: NodeId) -> Result<Arc<Book>> {
        let slot = self.book_slot(id).ok_or(Error::NotABook(id))?;
        slot.load().await
    }
}

/// Scan `path` recursively into a directory skeleton.
pub async fn load_directory(path: impl AsRef<Path>) -> Result<Library> {
    Library::load_directory(path).await
}

/// Read, decode and segment one book file.
///
/// Files without a recognized text extension are still read and decoded,
/// but load with zero chapters.
pub async fn load_book(path: impl AsRef<Path>) -> Result<Book> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .await
        .map_err(|source| Error::read(path, source))?;

    let normalized = normalize(&bytes);
    let chapters = if has_text_extension(path) {
        segment(&normalized.text)
    } else {
        debug!("{} is not a text file, loading without chapters", path.display());
        Vec::new()
    };

    debug!(
        "loaded {}: {} chapters ({}, confidence {:.2})",
        path.display(),
        chapters.len(),
        normalized.encoding,
        normalized.confidence
    );

    Ok(Book {
        title: display_title(path),
        path: path.to_path_buf(),
        encoding: normalized.encoding,
        confidence: normalized.confidence,
        chapters,
    })
}

type ScanFuture<'a> = Pin<Box<dyn Future<Output = Result<NodeId>> + Send + 'a>>;

/// Append-only arena used while scanning.
#[derive(Default)]
struct Builder {
    nodes: Vec<ContentNode>,
}

impl Builder {
    fn push(&mut self, node: ContentNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Scan one directory. On failure every node allocated for it is dropped
    /// again, so no orphans remain in the arena.
    fn scan_directory<'a>(&'a mut self, path: &'a Path) -> ScanFuture<'a> {
        Box::pin(async move {
            let mark = self.nodes.len();
            match self.scan_entries(path).await {
                Ok(children) => {
                    let id = self.push(ContentNode::directory(display_title(path), children));
                    for child in self.nodes[id.index()].children().to_vec() {
                        self.nodes[child.index()].parent = Some(id);
                    }
                    Ok(id)
                }
                Err(err) => {
                    self.nodes.truncate(mark);
                    Err(err)
                }
            }
        })
    }

    async fn scan_entries(&mut self, path: &Path) -> Result<Vec<NodeId>> {
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|source| Error::read(path, source))?;
        let mut children = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| Error::read(path, source))?
        {
            let entry_path = entry.path();
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!("skipping {}: {err}", entry_path.display());
                    continue;
                }
            };

            if file_type.is_dir() {
                match self.scan_directory(&entry_path).await {
                    Ok(id) => children.push(id),
                    Err(err) => warn!("skipping directory {}: {err}", entry_path.display()),
                }
            } else if file_type.is_file() || (file_type.is_symlink() && is_file(&entry_path).await)
            {
                let title = display_title(&entry_path);
                children.push(self.push(ContentNode::book(title, entry_path)));
            } else {
                debug!("skipping {}: not a regular file", entry_path.display());
            }
        }

        Ok(children)
    }

    fn finish(self, root: NodeId) -> Library {
        Library {
            nodes: self.nodes,
            root,
        }
    }
}

/// Symlinks count as books only when they resolve to files. Symlinked
/// directories are not followed, which rules out cycles.
async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
