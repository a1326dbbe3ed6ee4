//! Library loading tests.
//!
//! Build real directory trees in a temp dir, scan them, and expand books
//! lazily.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fishreader::{BookState, Error, Library, NodeId, TextEncoding, load_book};
use tempfile::TempDir;

const NOVEL: &str = "Intro line\n第1章 开始\nHello\nWorld\n第2章 继续\nBye";

fn write(dir: &Path, name: &str, contents: impl AsRef<[u8]>) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn titles(library: &Library, ids: &[NodeId]) -> Vec<String> {
    let mut titles: Vec<String> = ids
        .iter()
        .map(|&id| library.node(id).unwrap().title.clone())
        .collect();
    titles.sort();
    titles
}

// ============================================================================
// Directory Scanning Tests
// ============================================================================

#[tokio::test]
async fn test_scan_builds_skeleton_without_reading_books() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", NOVEL);
    write(temp.path(), "notes.md", "# not a novel");
    write(temp.path(), "wuxia/b.txt", NOVEL);
    write(temp.path(), "wuxia/old/c.txt", NOVEL);
    fs::create_dir(temp.path().join("empty")).unwrap();

    let library = Library::load_directory(temp.path()).await.unwrap();
    let root = library.root();

    assert_eq!(
        titles(&library, library.children(root)),
        ["a.txt", "empty", "notes.md", "wuxia"]
    );
    assert_eq!(library.books().len(), 4);

    for id in library.books() {
        let state = library.book_state(id).unwrap();
        assert!(!state.is_loaded());
        let slot = library.node(id).unwrap().as_book().unwrap();
        assert!(slot.source_ref().is_some());
    }

    let wuxia = library
        .children(root)
        .iter()
        .copied()
        .find(|&id| library.node(id).unwrap().title == "wuxia")
        .unwrap();
    assert!(library.node(wuxia).unwrap().is_directory());
    assert_eq!(titles(&library, library.children(wuxia)), ["b.txt", "old"]);
    assert_eq!(library.parent(wuxia), Some(root));
}

#[tokio::test]
async fn test_missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let err = Library::load_directory(temp.path().join("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Read { .. }));

    let err = Library::open(temp.path().join("nope")).await.unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[tokio::test]
async fn test_open_single_file() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "novel.txt", NOVEL);

    let library = Library::open(temp.path().join("novel.txt")).await.unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.books(), [library.root()]);

    let book = library.expand_book(library.root()).await.unwrap();
    assert_eq!(book.title, "novel.txt");
    assert_eq!(book.chapter_count(), 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_subdirectory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", NOVEL);
    write(temp.path(), "locked/b.txt", NOVEL);
    write(temp.path(), "open/c.txt", NOVEL);
    let locked = temp.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to check in that case.
    let readable_anyway = fs::read_dir(&locked).is_ok();

    let library = Library::load_directory(temp.path()).await.unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable_anyway {
        assert_eq!(
            titles(&library, library.children(library.root())),
            ["a.txt", "open"]
        );
        assert_eq!(library.books().len(), 2);
        // Skipped subtrees leave no orphan nodes behind.
        assert_eq!(library.len(), 4);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinks() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "real/a.txt", NOVEL);
    std::os::unix::fs::symlink(temp.path().join("real/a.txt"), temp.path().join("link.txt"))
        .unwrap();
    std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("loop")).unwrap();

    let library = Library::load_directory(temp.path()).await.unwrap();
    assert_eq!(
        titles(&library, library.children(library.root())),
        ["link.txt", "real"]
    );
}

// ============================================================================
// Lazy Loading Tests
// ============================================================================

#[tokio::test]
async fn test_expand_book_loads_chapters() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", NOVEL);

    let library = Library::load_directory(temp.path()).await.unwrap();
    let id = library.find_book(&temp.path().join("a.txt")).unwrap();

    let book = library.expand_book(id).await.unwrap();
    let titles: Vec<&str> = book.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["header", "第1章 开始", "第2章 继续"]);
    assert_eq!(book.chapters[0].lines, ["Intro line"]);
    assert_eq!(book.chapters[1].lines, ["Hello", "World"]);
    assert_eq!(book.chapters[2].lines, ["Bye"]);

    let slot = library.node(id).unwrap().as_book().unwrap();
    assert!(slot.source_ref().is_none());
    assert!(matches!(library.book_state(id), Some(BookState::Loaded(_))));
}

#[tokio::test]
async fn test_expand_book_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", NOVEL);

    let library = Library::load_directory(temp.path()).await.unwrap();
    let id = library.books()[0];

    let first = library.expand_book(id).await.unwrap();
    // A second expand must not touch the file again.
    fs::remove_file(temp.path().join("a.txt")).unwrap();
    let second = library.expand_book(id).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.chapter_count(), 3);
    let slot = library.node(id).unwrap().as_book().unwrap();
    assert!(slot.source_ref().is_none());
}

#[tokio::test]
async fn test_concurrent_expands_share_one_load() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", NOVEL);

    let library = Arc::new(Library::load_directory(temp.path()).await.unwrap());
    let id = library.books()[0];

    let (a, b) = tokio::join!(library.expand_book(id), library.expand_book(id));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.chapter_count(), 3);
}

#[tokio::test]
async fn test_failed_load_can_be_retried() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("later.txt");
    let library = Library::single_book(&path);
    let root = library.root();

    let err = library.expand_book(root).await.unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(!library.book_state(root).unwrap().is_loaded());

    write(temp.path(), "later.txt", NOVEL);
    let book = library.expand_book(root).await.unwrap();
    assert_eq!(book.chapter_count(), 3);
}

#[tokio::test]
async fn test_expand_directory_is_not_a_book() {
    let temp = TempDir::new().unwrap();
    let library = Library::load_directory(temp.path()).await.unwrap();
    let root = library.root();

    let err = library.expand_book(root).await.unwrap_err();
    assert!(matches!(err, Error::NotABook(id) if id == root));
    assert!(library.children(root).is_empty());
}

// ============================================================================
// Book Loading Tests
// ============================================================================

#[tokio::test]
async fn test_non_text_extension_loads_without_chapters() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "novel.md", NOVEL);

    let book = load_book(temp.path().join("novel.md")).await.unwrap();
    assert_eq!(book.chapter_count(), 0);
}

#[tokio::test]
async fn test_empty_file_loads_without_chapters() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "empty.txt", "");
    write(temp.path(), "blank.txt", "  \r\n\n");

    assert_eq!(load_book(temp.path().join("empty.txt")).await.unwrap().chapter_count(), 0);
    assert_eq!(load_book(temp.path().join("blank.txt")).await.unwrap().chapter_count(), 0);
}

#[tokio::test]
async fn test_gbk_file_is_decoded() {
    let text = "第一章 山雨欲来\n这是一个测试。我们今天去公园散步，天气很好，阳光明媚。\n\
        他说：“你好，世界！”她笑了笑，没有回答，只是转身向湖边走去。\n"
        .repeat(6);
    let (bytes, _, _) = encoding_rs::GBK.encode(&text);

    let temp = TempDir::new().unwrap();
    write(temp.path(), "gbk.txt", &bytes);

    let book = load_book(temp.path().join("gbk.txt")).await.unwrap();
    assert!(matches!(book.encoding, TextEncoding::Gbk | TextEncoding::Gb18030));
    // Empty preface, then six chapters with the same heading.
    assert_eq!(book.chapter_count(), 7);
    assert_eq!(book.chapters[1].title, "第一章 山雨欲来");
    assert!(book.chapters[1].lines[0].starts_with("这是一个测试"));
}

#[tokio::test]
async fn test_uppercase_extension_is_segmented() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "NOVEL.TXT", NOVEL);

    let book = load_book(temp.path().join("NOVEL.TXT")).await.unwrap();
    assert_eq!(book.chapter_count(), 3);
}
