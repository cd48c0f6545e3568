//! Synthetic entity generators.
//!
//! - [`ListGenerator`]: todo lists with fake titles, spread over owners
//! - [`ItemGenerator`]: todo items with random status, priority, due date and tags

pub mod item;
pub mod list;

pub use item::{ItemGenConfig, ItemGenerator};
pub use list::{ListGenConfig, ListGenerator};

use rand::Rng;

/// Identifier of the form `<prefix>_<8 hex>`, drawn from `rng`.
pub(crate) fn short_id(prefix: &str, rng: &mut impl Rng) -> String {
    let uuid = uuid::Builder::from_random_bytes(rng.r#gen()).into_uuid();
    format!("{prefix}_{}", &uuid.simple().to_string()[..8])
}
