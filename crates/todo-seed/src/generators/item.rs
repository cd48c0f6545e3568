//! Todo item generation.

use fake::Fake;
use fake::faker::lorem::en::{Sentence, Words};
use rand::Rng;
use rand::seq::SliceRandom;
use time::{Duration, OffsetDateTime};

use super::list::capitalize;
use super::short_id;
use crate::models::{TodoItem, TodoList, TodoPriority, TodoStatus};

/// Configuration for item generation.
#[derive(Debug, Clone)]
pub struct ItemGenConfig {
    /// Tags items draw from.
    pub tag_pool: Vec<String>,
    /// Maximum number of distinct tags per item.
    pub max_tags: usize,
    /// Due dates fall this many days after creation (inclusive range).
    pub due_in_days: (i64, i64),
    /// Weights for Not Started, In Progress, Completed.
    pub status_weights: [f64; 3],
}

impl Default for ItemGenConfig {
    fn default() -> Self {
        Self {
            tag_pool: ["work", "home", "urgent", "api", "review", "errand"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            max_tags: 3,
            due_in_days: (1, 60),
            status_weights: [0.5, 0.3, 0.2],
        }
    }
}

/// Generates todo items belonging to existing lists.
pub struct ItemGenerator {
    config: ItemGenConfig,
}

impl ItemGenerator {
    /// Creates a new item generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ItemGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ItemGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single item in `list`, timestamped `now`.
    pub fn generate(&self, list: &TodoList, now: OffsetDateTime, rng: &mut impl Rng) -> TodoItem {
        let words: Vec<String> = Words(2..6).fake_with_rng(rng);
        let description: String = Sentence(4..12).fake_with_rng(rng);

        let (min_days, max_days) = self.config.due_in_days;
        let due_date = now + Duration::days(rng.gen_range(min_days..=max_days.max(min_days)));

        TodoItem {
            item_id: short_id("item", rng),
            list_id: list.list_id.clone(),
            title: capitalize(&words.join(" ")),
            description,
            due_date,
            status: self.generate_status(rng),
            priority: TodoPriority::ALL[rng.gen_range(0..TodoPriority::ALL.len())],
            tags: self.generate_tags(rng),
            created_at: now,
            updated_at: now,
        }
    }

    /// Generates a number of items for each list, chosen from `per_list`.
    pub fn generate_for_lists(
        &self,
        lists: &[TodoList],
        per_list: std::ops::RangeInclusive<usize>,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Vec<TodoItem> {
        let mut items = Vec::new();
        for list in lists {
            let count = rng.gen_range(per_list.clone());
            items.extend((0..count).map(|_| self.generate(list, now, rng)));
        }
        items
    }

    fn generate_status(&self, rng: &mut impl Rng) -> TodoStatus {
        let total: f64 = self.config.status_weights.iter().sum();
        let mut roll = rng.r#gen::<f64>() * total;
        for (status, weight) in TodoStatus::ALL.iter().zip(self.config.status_weights) {
            if roll < weight {
                return *status;
            }
            roll -= weight;
        }
        TodoStatus::NotStarted
    }

    /// Picks up to `max_tags` distinct tags. Order follows the draw.
    fn generate_tags(&self, rng: &mut impl Rng) -> Vec<String> {
        let count = rng.gen_range(0..=self.config.max_tags.min(self.config.tag_pool.len()));
        self.config
            .tag_pool
            .choose_multiple(rng, count)
            .cloned()
            .collect()
    }
}

impl Default for ItemGenerator {
    fn default() -> Self {
        Self::new()
    }
}
