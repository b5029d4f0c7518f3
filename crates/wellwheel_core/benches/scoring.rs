use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wellwheel_core::ranking::{SearchResultItem, rank, watch_url};
use wellwheel_core::topic::score_catalog_topic;
use wellwheel_core::wheel::{DEFAULT_SIZE, layout_wheel, render_svg};
use wellwheel_core::{AnswerSet, Topic, questions_for};

fn full_answers() -> AnswerSet {
    Topic::ALL
        .iter()
        .flat_map(|&t| questions_for(t).iter())
        .map(|q| (q.id.clone(), "3".to_string()))
        .collect()
}

fn bench_score_all_topics(c: &mut Criterion) {
    let answers = full_answers();
    c.bench_function("score_all_topics", |b| {
        b.iter(|| {
            for t in Topic::ALL {
                black_box(score_catalog_topic(t, black_box(&answers)));
            }
        })
    });
}

fn bench_rank_page(c: &mut Criterion) {
    let items: Vec<SearchResultItem> = (0..50)
        .map(|i| SearchResultItem {
            id: format!("v{i}"),
            title: format!("Dry eye relief tip number {i} for screen time"),
            thumbnail: String::new(),
            url: watch_url(&format!("v{i}")),
            published_at: None,
        })
        .collect();
    c.bench_function("rank_playlist_page", |b| {
        b.iter(|| black_box(rank(items.clone(), black_box("dry eye"))))
    });
}

fn bench_wheel_svg(c: &mut Criterion) {
    let scores: HashMap<Topic, f64> = Topic::ALL.iter().map(|&t| (t, 0.7)).collect();
    c.bench_function("wheel_layout_and_svg", |b| {
        b.iter(|| black_box(render_svg(&layout_wheel(black_box(&scores), DEFAULT_SIZE))))
    });
}

criterion_group!(benches, bench_score_all_topics, bench_rank_page, bench_wheel_svg);
criterion_main!(benches);
