//! Fluent builder APIs for seeding scenarios.
//!
//! The [`ScenarioBuilder`] combines the literal sample documents with
//! optional generated lists and items into a single seeding run.

mod scenario;

pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
