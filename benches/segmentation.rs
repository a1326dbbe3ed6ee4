//! Benchmarks for the text pipeline.
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use fishreader::{Book, ReaderConfig, StatusBarReader, normalize, segment};

/// A novel of `chapters` chapters with a short preface.
fn sample_novel(chapters: usize) -> String {
    let mut text = String::from("书名：基准测试\n作者：佚名\n\n");
    for i in 1..=chapters {
        text.push_str(&format!("第{i}章 第{i}回\n"));
        for _ in 0..40 {
            text.push_str("　　天色渐晚，他沿着河岸慢慢走着，心里想着明天的事情。\r\n");
        }
        text.push('\n');
    }
    text
}

// ============================================================================
// Text Pipeline Benchmarks
// ============================================================================

fn bench_normalize_utf8(c: &mut Criterion) {
    let text = sample_novel(200);

    c.bench_function("normalize_utf8", |b| {
        b.iter(|| normalize(text.as_bytes()));
    });
}

fn bench_normalize_gbk(c: &mut Criterion) {
    let text = sample_novel(200);
    let (bytes, _, _) = encoding_rs::GBK.encode(&text);

    c.bench_function("normalize_gbk", |b| {
        b.iter(|| normalize(&bytes));
    });
}

fn bench_segment(c: &mut Criterion) {
    let text = sample_novel(200);

    c.bench_function("segment", |b| {
        b.iter(|| segment(&text));
    });
}

// ============================================================================
// Reader Benchmarks
// ============================================================================

fn bench_read_through(c: &mut Criterion) {
    let mut book = Book::new("bench.txt", "bench.txt");
    book.chapters = segment(&sample_novel(20));
    let book = Arc::new(book);

    c.bench_function("read_through", |b| {
        b.iter(|| {
            let mut reader = StatusBarReader::with_book(ReaderConfig::new(20), book.clone());
            let mut last = reader.position();
            loop {
                reader.next_line();
                if reader.position() == last {
                    break;
                }
                last = reader.position();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_normalize_utf8,
    bench_normalize_gbk,
    bench_segment,
    bench_read_through,
);

criterion_main!(benches);
