use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordtree::wordtree::config::BenchConfig;
use wordtree::wordtree::harness::bench;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wordtree=info,tree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match BenchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    match bench::run_with_config(&config) {
        Ok(summary) => tracing::info!(
            tokens = summary.tokens,
            seed = summary.seed,
            peak_nodes = summary.peak_node_count,
            final_nodes = summary.final_node_count,
            insert_us = summary.insert_micros,
            delete_us = summary.delete_micros,
            "benchmark finished"
        ),
        Err(e) => {
            tracing::error!("benchmark failed: {e}");
            std::process::exit(1);
        }
    }
}
