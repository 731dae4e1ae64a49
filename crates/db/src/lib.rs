//! `db` crate: pure persistence layer.
//!
//! Provides typed row structs, the [`AutomationStore`] and
//! [`DefinitionRegistry`] contracts, and two backends for them: Postgres
//! ([`PgStore`]) and an in-process [`MemoryStore`].  No business logic
//! lives here; node graphs are stored as opaque JSON.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repository;
pub mod store;

pub use error::{DbError, StoreOp};
pub use memory::{MemoryStore, Seed};
pub use pg::{DbPool, PgStore};
pub use store::{AutomationStore, DefinitionRegistry};
