use crate::wordtree::btree::tree::WordTree;
use crate::wordtree::config::BenchConfig;
use crate::wordtree::error::Result;
use crate::wordtree::harness::report::{open_sink, OperationKind, ReportSink, Sample, Stopwatch};
use crate::wordtree::harness::tokenizer::tokenize_file;
use rand::prelude::*;
use rand::rngs::StdRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub tokens: usize,
    pub seed: u64,
    pub peak_node_count: usize,
    pub final_node_count: usize,
    pub insert_micros: u64,
    pub delete_micros: u64,
}

/// Indices `0..len` in an order fixed by `seed`.
pub fn deletion_order(len: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rng);
    order
}

/// Inserts every token in order, then removes every token in a shuffled order,
/// sending one sample per operation to the matching sink.
pub fn run(
    tokens: &[String],
    seed: u64,
    inserts: &mut dyn ReportSink,
    deletes: &mut dyn ReportSink,
) -> Result<RunSummary> {
    let mut tree = WordTree::new();
    let mut summary = RunSummary {
        tokens: tokens.len(),
        seed,
        peak_node_count: tree.node_count(),
        final_node_count: 0,
        insert_micros: 0,
        delete_micros: 0,
    };

    let mut stopwatch = Stopwatch::new();
    for token in tokens {
        let ((), time_us) = stopwatch.time(|| tree.insert(token.clone()));
        summary.insert_micros += time_us;
        summary.peak_node_count = summary.peak_node_count.max(tree.node_count());
        inserts.record(&Sample {
            operation: OperationKind::Insert,
            node_count: tree.node_count(),
            time_us,
        })?;
    }
    tracing::info!(
        keys = tree.len(),
        nodes = tree.node_count(),
        height = tree.height(),
        "insert pass done"
    );

    let mut stopwatch = Stopwatch::new();
    for i in deletion_order(tokens.len(), seed) {
        let (removed, time_us) = stopwatch.time(|| tree.remove(tokens[i].as_str()));
        if !removed {
            tracing::warn!(token = %tokens[i], "token missing during delete pass");
        }
        summary.delete_micros += time_us;
        deletes.record(&Sample {
            operation: OperationKind::Delete,
            node_count: tree.node_count(),
            time_us,
        })?;
    }

    inserts.finish()?;
    deletes.finish()?;

    summary.final_node_count = tree.node_count();
    tracing::info!(nodes = summary.final_node_count, "delete pass done");
    tree.destroy();

    Ok(summary)
}

/// Runs the whole benchmark as configured: tokenizes the input file and writes
/// both reports.
pub fn run_with_config(config: &BenchConfig) -> Result<RunSummary> {
    let tokens = tokenize_file(&config.input)?;
    tracing::info!(input = %config.input.display(), tokens = tokens.len(), "loaded tokens");

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "deletion order seed");

    let mut inserts = open_sink(config.format, &config.insert_log)?;
    let mut deletes = open_sink(config.format, &config.delete_log)?;

    run(&tokens, seed, inserts.as_mut(), deletes.as_mut())
}
