//! Database integration for seeding the todo collections.
//!
//! The [`Seeder`] runs the seeding steps against any [`DocumentStore`]:
//! [`MongoStore`] for a live deployment, [`MemoryStore`] for tests.

mod memory;
mod mongo;
mod seeder;
mod store;

pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use seeder::{SeedError, SeedReport, Seeder, WriteTally};
pub use store::{DocumentStore, UpsertOutcome};
