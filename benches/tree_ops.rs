use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::prelude::*;
use rand::rngs::StdRng;
use wordtree::wordtree::harness::tokenizer::tokenize;
use wordtree::WordTree;

const TEXT: &str = "It was the best of times, it was the worst of times, it was the age of \
    wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of \
    incredulity, it was the season of Light, it was the season of Darkness, it was the spring \
    of hope, it was the winter of despair.";

fn words() -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(1);
    let base = tokenize(TEXT);
    (0..5_000)
        .map(|i| format!("{}{}", base[i % base.len()], rng.gen_range(0..500)))
        .collect()
}

fn benchmark(c: &mut Criterion) {
    let words = words();
    let mut group = c.benchmark_group("word-tree");

    group.bench_function("insert", |b| {
        b.iter(|| {
            let mut tree = WordTree::new();
            for word in &words {
                tree.insert(word.clone());
            }
            black_box(tree.node_count())
        })
    });

    group.bench_function("remove-shuffled", |b| {
        let mut order = words.clone();
        order.shuffle(&mut StdRng::seed_from_u64(2));
        b.iter_batched(
            || words.iter().cloned().collect::<WordTree>(),
            |mut tree| {
                for word in &order {
                    tree.remove(word.as_str());
                }
                black_box(tree.node_count())
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
