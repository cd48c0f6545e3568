//! Configuration for seeding runs.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use thiserror::Error;

use crate::samples::SampleVariant;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "todo_db";

/// What to do when a document with the same identifier is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Replace the stored document, or insert if there is none.
    #[default]
    Replace,
    /// Keep the stored document untouched.
    Skip,
    /// Always insert. Re-runs produce duplicate identifiers.
    Append,
}

#[derive(Debug, Error)]
#[error("unknown conflict policy '{0}' (expected 'replace', 'skip' or 'append')")]
pub struct UnknownPolicy(String);

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Replace => "replace",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Append => "append",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "upsert" => Ok(ConflictPolicy::Replace),
            "skip" => Ok(ConflictPolicy::Skip),
            "append" | "insert" => Ok(ConflictPolicy::Append),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Configuration for the `seed` binary.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Driver connection string.
    pub mongodb_uri: String,

    /// Target database name.
    pub database: String,

    /// Which literal sample to write.
    pub sample: SampleVariant,

    /// Re-run behaviour for existing identifiers.
    pub conflict_policy: ConflictPolicy,

    /// Number of generated lists written alongside the sample.
    pub extra_lists: usize,

    /// Number of generated items per generated list.
    pub items_per_list: RangeInclusive<usize>,

    /// Fixed RNG seed for reproducible generated data.
    pub rng_seed: Option<u64>,

    /// Drop both collections before seeding.
    pub clear_first: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            sample: SampleVariant::default(),
            conflict_policy: ConflictPolicy::default(),
            extra_lists: 0,
            items_per_list: 1..=3,
            rng_seed: None,
            clear_first: false,
        }
    }
}

impl SeedConfig {
    /// Loads configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(uri) = lookup("MONGODB_URI") {
            config.mongodb_uri = uri;
        }
        if let Some(database) = lookup("TODO_DB") {
            if database.trim().is_empty() {
                bail!("TODO_DB must not be empty");
            }
            config.database = database;
        }
        if let Some(sample) = lookup("SEED_SAMPLE") {
            config.sample = sample.parse().context("SEED_SAMPLE")?;
        }
        if let Some(policy) = lookup("SEED_CONFLICT") {
            config.conflict_policy = policy.parse().context("SEED_CONFLICT")?;
        }
        if let Some(count) = lookup("SEED_EXTRA_LISTS") {
            config.extra_lists = count
                .trim()
                .parse()
                .context("SEED_EXTRA_LISTS must be a non-negative integer")?;
        }
        if let Some(range) = lookup("SEED_ITEMS_PER_LIST") {
            config.items_per_list =
                parse_range(&range).context("SEED_ITEMS_PER_LIST must look like '1-3' or '2'")?;
        }
        if let Some(seed) = lookup("SEED_RNG_SEED") {
            config.rng_seed = Some(
                seed.trim()
                    .parse()
                    .context("SEED_RNG_SEED must be an unsigned integer")?,
            );
        }
        if let Some(clear) = lookup("SEED_CLEAR") {
            config.clear_first = parse_bool(&clear).context("SEED_CLEAR must be true or false")?;
        }

        Ok(config)
    }
}

/// Parses `"min-max"` or a single `"n"` into an inclusive range.
fn parse_range(value: &str) -> Result<RangeInclusive<usize>> {
    let value = value.trim();
    let (min, max) = match value.split_once('-') {
        Some((min, max)) => (min.trim().parse()?, max.trim().parse()?),
        None => {
            let n = value.parse()?;
            (n, n)
        }
    };
    if min > max {
        bail!("range start {min} is greater than end {max}");
    }
    Ok(min..=max)
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid boolean '{other}'"),
    }
}
