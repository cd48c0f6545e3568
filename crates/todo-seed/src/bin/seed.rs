//! Seeds the todo database: collections, the sample list and item, and the
//! `todo_items.list_id` index.
//!
//! Run with:
//! ```
//! cargo run -p todo-seed --bin seed
//! ```
//!
//! Configured through `MONGODB_URI`, `TODO_DB` and the `SEED_*` variables,
//! optionally from a `.env` file.

use todo_seed::builders::ScenarioBuilder;
use todo_seed::config::SeedConfig;
use todo_seed::db::{MongoStore, Seeder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SeedConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MongoStore::connect(&config.mongodb_uri, &config.database).await?;
    let seeder = Seeder::new(store).with_policy(config.conflict_policy);

    let result = ScenarioBuilder::from_config(&config)
        .with_metrics(true)
        .build(&seeder)
        .await?;

    // Summary output
    tracing::info!("Seed completed!");
    if let Some(report) = &result.report {
        tracing::info!("  Database: {}", report.database);
        if !report.collections_created.is_empty() {
            tracing::info!("  Created: {}", report.collections_created.join(", "));
        }
        tracing::info!(
            "  Lists: {} inserted, {} replaced, {} skipped",
            report.lists.inserted,
            report.lists.replaced,
            report.lists.skipped
        );
        tracing::info!(
            "  Items: {} inserted, {} replaced, {} skipped",
            report.items.inserted,
            report.items.replaced,
            report.items.skipped
        );
        tracing::info!("  Index: {}", report.index_name);
    }
    if let Some(metrics) = &result.metrics {
        tracing::info!(
            "  Took {} ms ({} ms generating)",
            metrics.seeding_time_ms,
            metrics.generation_time_ms
        );
    }

    Ok(())
}
