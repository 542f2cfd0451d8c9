//! Benchmarks for the CSV interchange codec.
//!
//! Benchmark targets:
//! - Parsing 1k rows: <10ms
//! - Serializing 1k rows: <5ms
//! - Full import of 1k rows into an empty tree: <20ms

// Criterion macros generate items without docs - this is expected for benchmarks
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use promptmenu::io::formats::csv;
use promptmenu::io::validation::check_header;
use promptmenu::io::{ExportService, ImportOptions, ImportService, SequentialIdGenerator};
use promptmenu::models::{Folder, Menu, MenuContext, MenuTree};

const ROW_COUNTS: [usize; 3] = [10, 100, 1_000];

/// Builds interchange text with a mix of plain and quoted fields.
fn sample_text(rows: usize) -> String {
    let mut text = String::from("folder,title,prompt,context");
    for i in 0..rows {
        let row = match i % 3 {
            0 => format!("\nWork,Title {i},Summarize the text,both"),
            1 => format!("\nWork,\"Title, {i}\",\"Say \"\"hi\"\" politely\",selection"),
            _ => format!("\nWork/Code,Title {i},\"Fix this, then explain\",page"),
        };
        text.push_str(&row);
    }
    text
}

fn sample_tree(menus: usize) -> MenuTree {
    let folder = (0..menus).fold(Folder::new("work", "Work"), |folder, i| {
        folder.with_item(Menu::new(
            format!("m{i}"),
            format!("Title {i}"),
            "Rewrite this, keep \"quotes\"",
            MenuContext::Both,
        ))
    });
    MenuTree::from_nodes(vec![folder.into()])
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parse");
    group.measurement_time(Duration::from_secs(5));

    for rows in ROW_COUNTS {
        let text = sample_text(rows);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &text, |b, text| {
            b.iter(|| csv::parse(black_box(text), check_header));
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_serialize");
    group.measurement_time(Duration::from_secs(5));
    let service = ExportService::new();

    for menus in ROW_COUNTS {
        let tree = sample_tree(menus);
        group.throughput(Throughput::Elements(menus as u64));
        group.bench_with_input(BenchmarkId::from_parameter(menus), &tree, |b, tree| {
            b.iter(|| service.export_to_string(black_box(tree)));
        });
    }

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_text");
    let service = ImportService::new();
    let options = ImportOptions::default();

    for rows in ROW_COUNTS {
        let text = sample_text(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &text, |b, text| {
            b.iter(|| {
                let mut tree = MenuTree::new();
                let mut ids = SequentialIdGenerator::new("bench");
                service.import_text(black_box(text), &mut tree, &options, &mut ids)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_import);
criterion_main!(benches);
