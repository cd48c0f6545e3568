//! Todo list generation.

use fake::Fake;
use fake::faker::lorem::en::{Sentence, Words};
use rand::Rng;
use time::OffsetDateTime;

use super::short_id;
use crate::models::TodoList;

/// Configuration for list generation.
#[derive(Debug, Clone)]
pub struct ListGenConfig {
    /// User ids lists are assigned to, chosen uniformly.
    pub owner_ids: Vec<String>,
    /// Probability that a list gets a description.
    pub description_rate: f64,
}

impl Default for ListGenConfig {
    fn default() -> Self {
        Self {
            owner_ids: vec!["1".to_string()],
            description_rate: 0.8,
        }
    }
}

/// Generates todo lists with fake titles.
pub struct ListGenerator {
    config: ListGenConfig,
}

impl ListGenerator {
    /// Creates a new list generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ListGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ListGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single list timestamped `now`.
    pub fn generate(&self, now: OffsetDateTime, rng: &mut impl Rng) -> TodoList {
        let owner_id = if self.config.owner_ids.is_empty() {
            "1".to_string()
        } else {
            self.config.owner_ids[rng.gen_range(0..self.config.owner_ids.len())].clone()
        };

        let words: Vec<String> = Words(1..4).fake_with_rng(rng);
        let description = if rng.r#gen::<f64>() < self.config.description_rate {
            Sentence(3..10).fake_with_rng(rng)
        } else {
            String::new()
        };

        TodoList {
            list_id: short_id("list", rng),
            owner_id,
            title: capitalize(&words.join(" ")),
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Generates multiple lists.
    pub fn generate_batch(
        &self,
        count: usize,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Vec<TodoList> {
        (0..count).map(|_| self.generate(now, rng)).collect()
    }
}

impl Default for ListGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
