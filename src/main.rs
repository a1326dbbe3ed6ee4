//! fishreader - read plain-text novels a few characters at a time

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use fishreader::{BookState, Config, Library, NodeId, NodeKind, ReaderConfig, StatusBarReader};

#[derive(Parser)]
#[command(name = "fishreader")]
#[command(version, about = "Read plain-text novels a few characters at a time", long_about = None)]
#[command(after_help = "EXAMPLES:
    fishreader tree ~/novels --expand      List books and their chapters
    fishreader read novel.txt -w 30        Page through a novel
    fishreader detect novel.txt            Show the detected encoding")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the library tree
    Tree {
        /// Library root (defaults to the configured root path)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Load every book and list its chapters
        #[arg(short, long)]
        expand: bool,

        /// Emit JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },

    /// List the chapters of a book
    Chapters {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the detected encoding of a file
    Detect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Read a book on stdin: j/k next/previous line, l/h next/previous
    /// chapter, a number jumps to that chapter, q quits
    Read {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chapter index to start at
        #[arg(short, long)]
        chapter: Option<usize>,

        /// Window width in characters
        #[arg(short, long)]
        width: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };

    match cli.command {
        Command::Tree { path, expand, json } => {
            let root = path.unwrap_or_else(|| config.resolved_root());
            show_tree(&root, expand, json).await
        }
        Command::Chapters { file } => show_chapters(&file).await,
        Command::Detect { file } => detect(&file).await,
        Command::Read {
            file,
            chapter,
            width,
        } => {
            let config = match width {
                Some(width) => config.with_show_length(width),
                None => config,
            };
            config.validate().map_err(|e| e.to_string())?;
            read(&file, config.reader, chapter).await
        }
    }
}

async fn show_tree(root: &Path, expand: bool, json: bool) -> Result<(), String> {
    let library = Library::open(root).await.map_err(|e| e.to_string())?;

    if expand {
        for id in library.books() {
            if let Err(e) = library.expand_book(id).await {
                log::warn!("{e}");
            }
        }
    }

    if json {
        let entry = tree_entry(&library, library.root());
        let output = serde_json::to_string_pretty(&entry).map_err(|e| e.to_string())?;
        println!("{output}");
        return Ok(());
    }

    for (depth, id) in library.walk() {
        let Some(node) = library.node(id) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        match &node.kind {
            NodeKind::Directory { .. } => println!("{indent}{}/", node.title),
            NodeKind::Book(slot) => match slot.state() {
                BookState::Unloaded { .. } => println!("{indent}{}", node.title),
                BookState::Loaded(book) => {
                    println!(
                        "{indent}{} [{} chapters, {}]",
                        node.title,
                        book.chapter_count(),
                        book.encoding
                    );
                    for chapter in &book.chapters {
                        println!("{indent}    {}", chapter.title);
                    }
                }
            },
        }
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TreeEntry<'a> {
    Directory {
        title: &'a str,
        children: Vec<TreeEntry<'a>>,
    },
    Book {
        title: &'a str,
        path: &'a Path,
        #[serde(skip_serializing_if = "Option::is_none")]
        encoding: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        chapters: Option<Vec<ChapterEntry<'a>>>,
    },
}

#[derive(Serialize)]
struct ChapterEntry<'a> {
    title: &'a str,
    lines: usize,
}

fn tree_entry(library: &Library, id: NodeId) -> TreeEntry<'_> {
    let Some(node) = library.node(id) else {
        return TreeEntry::Directory {
            title: "",
            children: Vec::new(),
        };
    };

    match &node.kind {
        NodeKind::Directory { children } => TreeEntry::Directory {
            title: &node.title,
            children: children
                .iter()
                .map(|&child| tree_entry(library, child))
                .collect(),
        },
        NodeKind::Book(slot) => {
            let loaded = slot.get();
            TreeEntry::Book {
                title: &node.title,
                path: slot.source(),
                encoding: loaded.map(|book| book.encoding.name()),
                chapters: loaded.map(|book| {
                    book.chapters
                        .iter()
                        .map(|chapter| ChapterEntry {
                            title: &chapter.title,
                            lines: chapter.len(),
                        })
                        .collect()
                }),
            }
        }
    }
}

async fn show_chapters(file: &Path) -> Result<(), String> {
    let book = fishreader::load_book(file)
        .await
        .map_err(|e| e.to_string())?;

    println!("File: {}", file.display());
    println!("Encoding: {} ({:.0}%)", book.encoding, book.confidence * 100.0);
    println!("Chapters: {}", book.chapter_count());
    for (index, chapter) in book.chapters.iter().enumerate() {
        println!("{index:>5}  {} ({} lines)", chapter.title, chapter.len());
    }

    Ok(())
}

async fn detect(file: &Path) -> Result<(), String> {
    let bytes = tokio::fs::read(file)
        .await
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let normalized = fishreader::normalize(&bytes);

    println!("File: {}", file.display());
    println!("Encoding: {}", normalized.encoding);
    println!("Confidence: {:.2}", normalized.confidence);
    println!("Characters: {}", normalized.text.chars().count());

    Ok(())
}

async fn read(file: &Path, config: ReaderConfig, chapter: Option<usize>) -> Result<(), String> {
    let book = fishreader::load_book(file)
        .await
        .map_err(|e| e.to_string())?;
    let mut reader = StatusBarReader::with_book(config, Arc::new(book));
    if let Some(index) = chapter {
        reader.set_chapter(index);
    }
    print_status(&reader);

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        match line.trim() {
            "q" => break,
            "" | "j" => {
                reader.next_line();
            }
            "k" => {
                reader.prev_line();
            }
            "l" => {
                reader.next_chapter();
            }
            "h" => {
                reader.prev_chapter();
            }
            other => match other.parse::<usize>() {
                Ok(index) => {
                    reader.set_chapter(index);
                }
                Err(_) => {
                    eprintln!("unknown command: {other}");
                    continue;
                }
            },
        }
        print_status(&reader);
    }

    Ok(())
}

fn print_status(reader: &StatusBarReader) {
    println!("{}: {}", reader.current_chapter_title(), reader.render());
}
