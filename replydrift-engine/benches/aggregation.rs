//! Benchmarks for pooled aggregation and bucketing
//!
//! Run with: cargo bench --bench aggregation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use replydrift_engine::{
    bucket_sentiment, ConversationTree, EmptyBucketPolicy, HourOfDay, InMemoryStore,
    LexiconScorer, Post, SentimentAggregator, TimeSettings, Weekday,
};

const TEXTS: [&str; 4] = [
    "My bag is lost and nobody is helping",
    "Thanks, that was really quick",
    "Flight delayed again, not happy",
    "Great crew and a smooth landing",
];

/// Generate `count` conversations of a root with three leaves and one chain
fn generate(count: usize) -> (InMemoryStore, Vec<ConversationTree>) {
    let mut store = InMemoryStore::new();
    let mut trees = Vec::with_capacity(count);
    let start = 1_609_459_200_000i64;

    for i in 0..count as u64 {
        let root = i * 10;
        let ts = start + (i as i64) * 3_600_000;
        store.insert(Post::new(root, 1, TEXTS[(i % 4) as usize], ts));
        for (offset, parent) in [(1, root), (2, root), (3, root), (4, root + 3)] {
            let text = TEXTS[((i + offset) % 4) as usize];
            store.insert(Post::new(root + offset, 2, text, ts + offset as i64).reply_to(parent));
        }
        trees.push(
            ConversationTree::from_replies(
                root,
                [(root + 1, root), (root + 2, root), (root + 3, root), (root + 4, root + 3)],
            )
            .unwrap(),
        );
    }

    (store, trees)
}

fn bench_average_sentiment(c: &mut Criterion) {
    let mut group = c.benchmark_group("average_sentiment");
    let scorer = LexiconScorer::english().unwrap();

    for count in [100, 1_000, 10_000] {
        let (store, trees) = generate(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &trees, |b, trees| {
            let aggregator = SentimentAggregator::new(&store, scorer.clone());
            b.iter(|| aggregator.average_sentiment(black_box(trees)).unwrap());
        });
    }

    group.finish();
}

fn bench_bucketing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucket_sentiment");
    let scorer = LexiconScorer::english().unwrap();
    let time = TimeSettings::default();
    let (store, trees) = generate(5_000);
    let aggregator = SentimentAggregator::new(&store, scorer);

    group.bench_function("weekday", |b| {
        b.iter(|| {
            bucket_sentiment::<Weekday, _, _, _>(
                &aggregator,
                black_box(&trees),
                &time,
                EmptyBucketPolicy::Skip,
            )
            .unwrap()
        });
    });

    group.bench_function("hour", |b| {
        b.iter(|| {
            bucket_sentiment::<HourOfDay, _, _, _>(
                &aggregator,
                black_box(&trees),
                &time,
                EmptyBucketPolicy::Skip,
            )
            .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_average_sentiment, bench_bucketing);
criterion_main!(benches);
