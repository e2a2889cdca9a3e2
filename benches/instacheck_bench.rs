use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nu_plugin_instacheck::algo::extract::{self, ExtractConfig, FileInput};
use nu_plugin_instacheck::algo::pipeline::{self, PipelineConfig};
use nu_plugin_instacheck::algo::walk::HandleExtractor;
use nu_plugin_instacheck::algo::{collate, handle};
use serde_json::{json, Value};
use zip::write::SimpleFileOptions;

/// Raw handle spellings in the shapes an export mixes together.
fn generate_raw_handles(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match i % 4 {
            0 => format!("user.{i}"),
            1 => format!("@User_{i}"),
            2 => format!("https://www.instagram.com/user_{i}/?hl=en"),
            _ => format!("  Jos\u{e9}.{i}  "),
        })
        .collect()
}

fn relationship_file(key: &str, n: usize, offset: usize) -> Value {
    let records: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "title": "",
                "media_list_data": [],
                "string_list_data": [{
                    "href": format!("https://www.instagram.com/user_{}", i + offset),
                    "value": format!("user_{}", i + offset),
                    "timestamp": 1_700_000_000 + i
                }]
            })
        })
        .collect();
    json!({ key: records })
}

fn export_zip(n: usize) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let files = [
        ("connections/followers_and_following/followers_1.json", relationship_file("relationships_followers", n, 0)),
        ("connections/followers_and_following/following.json", relationship_file("relationships_following", n, n / 2)),
    ];
    for (name, value) in files {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(value.to_string().as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn bench_canonicalize(c: &mut Criterion) {
    let raws = generate_raw_handles(1000);
    c.bench_function("canonicalize/1000_handles", |b| {
        b.iter(|| {
            for raw in &raws {
                black_box(handle::canonicalize(raw));
            }
        })
    });
}

fn bench_extract_handles(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_extractor");
    let extractor = HandleExtractor::default();
    for size in [100, 1000, 10000] {
        let doc = relationship_file("relationships_following", size, 0);
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| black_box(extractor.extract(doc)))
        });
    }
    group.finish();
}

fn bench_collate(c: &mut Criterion) {
    let raws = generate_raw_handles(5000);
    c.bench_function("collate/sort_5000", |b| {
        b.iter(|| {
            let mut handles = raws.clone();
            collate::sort(&mut handles);
            black_box(handles)
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    let config = PipelineConfig::default();
    for size in [1000, 10000] {
        let files = vec![FileInput::new("export.zip", export_zip(size))];
        group.bench_with_input(BenchmarkId::new("extract", size), &files, |b, files| {
            b.iter(|| black_box(extract::extract(files, &ExtractConfig::default()).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("analyze", size), &files, |b, files| {
            b.iter(|| black_box(pipeline::analyze(files, &config).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_extract_handles,
    bench_collate,
    bench_pipeline,
);
criterion_main!(benches);
