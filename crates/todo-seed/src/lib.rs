//! MongoDB seeding for the todo API.
//!
//! Creates the `todo_lists` and `todo_items` collections, writes one sample
//! list and one sample item, and indexes items by `list_id`. Optionally adds
//! generated lists and items for larger local datasets.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use todo_seed::prelude::*;
//!
//! let store = MongoStore::connect("mongodb://localhost:27017", "todo_db").await?;
//! let report = Seeder::new(store)
//!     .with_policy(ConflictPolicy::Replace)
//!     .run(SampleVariant::Api)
//!     .await?;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod generators;
pub mod models;
pub mod samples;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
    pub use crate::config::{ConflictPolicy, SeedConfig};
    pub use crate::db::{
        DocumentStore, MemoryStore, MongoStore, SeedError, SeedReport, Seeder, WriteTally,
    };
    pub use crate::generators::{ItemGenerator, ListGenerator};
    pub use crate::models::{TodoItem, TodoList, TodoPriority, TodoStatus};
    pub use crate::samples::SampleVariant;
}
