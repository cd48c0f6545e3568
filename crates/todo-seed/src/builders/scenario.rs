//! Fluent builder for constructing seeding scenarios.

use std::ops::RangeInclusive;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::OffsetDateTime;

use crate::config::SeedConfig;
use crate::db::{DocumentStore, SeedError, SeedReport, Seeder};
use crate::generators::{ItemGenConfig, ItemGenerator, ListGenConfig, ListGenerator};
use crate::models::{TodoItem, TodoList};
use crate::samples::SampleVariant;

/// Result of building and seeding a scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    /// Generated lists. The sample list is not included.
    pub lists: Vec<TodoList>,
    /// Generated items. The sample item is not included.
    pub items: Vec<TodoItem>,
    /// Seeding summary, `None` if only data was built.
    pub report: Option<SeedReport>,
    /// Metrics from scenario generation (populated if metrics tracking enabled).
    pub metrics: Option<ScenarioMetrics>,
}

/// Performance metrics from scenario generation.
#[derive(Debug, Clone)]
pub struct ScenarioMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    /// Time spent seeding database (milliseconds, 0 if build_data used).
    pub seeding_time_ms: u64,
    pub list_count: usize,
    pub item_count: usize,
}

/// Builder for creating complete seeding scenarios.
///
/// # Example
///
/// ```rust,ignore
/// let seeder = Seeder::new(store).with_policy(ConflictPolicy::Replace);
/// let result = ScenarioBuilder::new()
///     .with_sample(SampleVariant::Api)
///     .with_generated_lists(10)
///     .items_per_list(2..=5)
///     .with_seed(42)
///     .build(&seeder)
///     .await?;
/// ```
pub struct ScenarioBuilder {
    sample: SampleVariant,

    // Generated data
    list_count: usize,
    items_per_list: RangeInclusive<usize>,
    list_config: ListGenConfig,
    item_config: ItemGenConfig,

    // Misc
    seed: Option<u64>,
    clear_first: bool,
    track_metrics: bool,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioBuilder {
    /// Creates a builder that writes only the default sample.
    pub fn new() -> Self {
        Self {
            sample: SampleVariant::default(),
            list_count: 0,
            items_per_list: 1..=3,
            list_config: ListGenConfig::default(),
            item_config: ItemGenConfig::default(),
            seed: None,
            clear_first: false,
            track_metrics: false,
        }
    }

    /// Creates a builder from runtime configuration.
    pub fn from_config(config: &SeedConfig) -> Self {
        let mut builder = Self::new()
            .with_sample(config.sample)
            .with_generated_lists(config.extra_lists)
            .items_per_list(config.items_per_list.clone())
            .clear_first(config.clear_first);
        if let Some(seed) = config.rng_seed {
            builder = builder.with_seed(seed);
        }
        builder
    }

    /// A small demo dataset: the sample plus ten lists of two to five items.
    pub fn demo() -> Self {
        Self::new()
            .with_generated_lists(10)
            .items_per_list(2..=5)
            .with_owner_ids(["1", "2", "3"])
    }

    /// Sets which literal sample is written.
    pub fn with_sample(mut self, variant: SampleVariant) -> Self {
        self.sample = variant;
        self
    }

    /// Sets the number of generated lists.
    pub fn with_generated_lists(mut self, count: usize) -> Self {
        self.list_count = count;
        self
    }

    /// Sets the range of generated items per generated list.
    pub fn items_per_list(mut self, range: RangeInclusive<usize>) -> Self {
        self.items_per_list = range;
        self
    }

    /// Sets the user ids generated lists are assigned to.
    pub fn with_owner_ids<I, T>(mut self, owner_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.list_config.owner_ids = owner_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the item generation configuration.
    pub fn with_item_config(mut self, config: ItemGenConfig) -> Self {
        self.item_config = config;
        self
    }

    /// Sets the random seed. Without one, generated data differs on every run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Drops both collections before seeding.
    pub fn clear_first(mut self, enabled: bool) -> Self {
        self.clear_first = enabled;
        self
    }

    /// Enables metrics tracking for performance analysis.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Builds the generated data without touching the database.
    pub fn build_data(&self, rng: &mut impl Rng) -> ScenarioResult {
        let start_time = self.track_metrics.then(Instant::now);
        let now = OffsetDateTime::now_utc();

        let lists = ListGenerator::with_config(self.list_config.clone())
            .generate_batch(self.list_count, now, rng);
        let items = ItemGenerator::with_config(self.item_config.clone()).generate_for_lists(
            &lists,
            self.items_per_list.clone(),
            now,
            rng,
        );

        let metrics = start_time.map(|start| ScenarioMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            seeding_time_ms: 0,
            list_count: lists.len(),
            item_count: items.len(),
        });

        ScenarioResult {
            lists,
            items,
            report: None,
            metrics,
        }
    }

    /// Builds the scenario and seeds it through `seeder`.
    pub async fn build<S: DocumentStore>(
        self,
        seeder: &Seeder<S>,
    ) -> Result<ScenarioResult, SeedError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut result = self.build_data(&mut rng);

        let seed_start = self.track_metrics.then(Instant::now);

        if self.clear_first {
            seeder.clear_all().await?;
        }

        let report = seeder
            .run_with(self.sample, &result.lists, &result.items)
            .await?;
        result.report = Some(report);

        if let (Some(start), Some(metrics)) = (seed_start, result.metrics.as_mut()) {
            metrics.seeding_time_ms = start.elapsed().as_millis() as u64;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConflictPolicy;
    use crate::db::MemoryStore;

    #[test]
    fn test_build_data_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = ScenarioBuilder::new()
            .with_generated_lists(5)
            .items_per_list(3..=3)
            .with_metrics(true)
            .build_data(&mut rng);

        assert_eq!(result.lists.len(), 5);
        assert_eq!(result.items.len(), 15);
        assert!(result.report.is_none());

        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.list_count, 5);
        assert_eq!(metrics.item_count, 15);
        assert_eq!(metrics.seeding_time_ms, 0);
    }

    #[test]
    fn test_owner_ids_applied() {
        let mut rng = StdRng::seed_from_u64(2);
        let result = ScenarioBuilder::new()
            .with_generated_lists(10)
            .with_owner_ids(["7", "8"])
            .build_data(&mut rng);

        assert!(result.lists.iter().all(|l| l.owner_id == "7" || l.owner_id == "8"));
    }

    #[tokio::test]
    async fn test_sample_only_by_default() {
        let seeder = Seeder::new(MemoryStore::new("todo_db"));
        let result = ScenarioBuilder::new().build(&seeder).await.unwrap();

        assert!(result.lists.is_empty());
        assert!(result.items.is_empty());
        assert_eq!(seeder.store().documents("todo_lists").await.len(), 1);
        assert_eq!(seeder.store().documents("todo_items").await.len(), 1);
    }

    #[tokio::test]
    async fn test_demo_scenario_seeds_everything() {
        let seeder = Seeder::new(MemoryStore::new("todo_db"));
        let result = ScenarioBuilder::demo()
            .with_seed(99)
            .build(&seeder)
            .await
            .unwrap();

        let report = result.report.unwrap();
        assert_eq!(report.lists.inserted, 11);
        assert_eq!(report.items.inserted, result.items.len() + 1);
        assert!(result.items.len() >= 20 && result.items.len() <= 50);

        // Every generated item points at a generated list
        for item in &result.items {
            assert!(result.lists.iter().any(|l| l.list_id == item.list_id));
        }
    }

    #[tokio::test]
    async fn test_seeded_runs_replace_in_place() {
        let seeder = Seeder::new(MemoryStore::new("todo_db")).with_policy(ConflictPolicy::Replace);

        for _ in 0..2 {
            ScenarioBuilder::new()
                .with_generated_lists(3)
                .items_per_list(1..=1)
                .with_seed(5)
                .build(&seeder)
                .await
                .unwrap();
        }

        assert_eq!(seeder.store().documents("todo_lists").await.len(), 4);
        assert_eq!(seeder.store().documents("todo_items").await.len(), 4);
    }

    #[tokio::test]
    async fn test_clear_first_resets_appended_data() {
        let seeder = Seeder::new(MemoryStore::new("todo_db")).with_policy(ConflictPolicy::Append);
        ScenarioBuilder::new().build(&seeder).await.unwrap();
        ScenarioBuilder::new().build(&seeder).await.unwrap();
        assert_eq!(seeder.store().documents("todo_lists").await.len(), 2);

        ScenarioBuilder::new()
            .clear_first(true)
            .build(&seeder)
            .await
            .unwrap();
        assert_eq!(seeder.store().documents("todo_lists").await.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = SeedConfig {
            extra_lists: 4,
            items_per_list: 0..=0,
            rng_seed: Some(3),
            ..SeedConfig::default()
        };
        let builder = ScenarioBuilder::from_config(&config);
        let result = builder.build_data(&mut StdRng::seed_from_u64(3));
        assert_eq!(result.lists.len(), 4);
        assert!(result.items.is_empty());
    }
}
