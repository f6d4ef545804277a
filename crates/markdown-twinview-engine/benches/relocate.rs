use criterion::{Criterion, criterion_group, criterion_main};
use markdown_twinview_engine::{
    SyncConfig, extract_from_text, extract_from_tree, locate_in_text, locate_in_tree, parse,
};
use xi_rope::Rope;
mod common;

fn bench_text_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    group.sample_size(10);

    let content = common::generate_markdown_content(500);
    let rope = Rope::from(content.as_str());
    let config = SyncConfig::default();
    let offset = common::offset_of(&content, "Paragraph with", 400, 5);

    group.bench_function("extract", |b| {
        b.iter(|| extract_from_text(std::hint::black_box(&rope), offset, &config));
    });

    let info = extract_from_text(&rope, offset, &config);
    group.bench_function("locate", |b| {
        b.iter(|| locate_in_text(std::hint::black_box(&info), &rope, &config));
    });

    let cell = common::offset_of(&content, "apple", 400, 2);
    let cell_info = extract_from_text(&rope, cell, &config);
    group.bench_function("locate_table_anchor", |b| {
        b.iter(|| locate_in_text(std::hint::black_box(&cell_info), &rope, &config));
    });

    group.finish();
}

fn bench_cross_representation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross");
    group.sample_size(10);

    let content = common::generate_markdown_content(500);
    let rope = Rope::from(content.as_str());
    let config = SyncConfig::default();
    let info = extract_from_text(&rope, common::offset_of(&content, "Nested", 250, 3), &config);

    group.bench_function("parse", |b| {
        b.iter(|| parse(std::hint::black_box(&content)));
    });

    let tree = parse(&content);
    group.bench_function("locate_in_tree", |b| {
        b.iter(|| locate_in_tree(std::hint::black_box(&info), &tree, &config));
    });

    let pos = locate_in_tree(&info, &tree, &config).position;
    group.bench_function("extract_from_tree", |b| {
        b.iter(|| extract_from_tree(&tree, std::hint::black_box(pos), &config));
    });

    group.finish();
}

criterion_group!(benches, bench_text_round_trip, bench_cross_representation);
criterion_main!(benches);
