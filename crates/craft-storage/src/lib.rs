//! Storage for the crafting backend: a deduplicated craftnode catalogue and
//! the combination index that maps unordered label pairs onto it.
//!
//! Provides the [`CraftnodeStore`] and [`CombinationIndex`] traits defining
//! the storage contract, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: Craftnode, Combination, LabelPair, RecordOutcome
//! - [`validate`]: field-length checks applied before writes
//! - [`traits`]: CraftnodeStore and CombinationIndex trait definitions
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;
pub mod validate;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CombinationIndex, CraftnodeStore};
pub use types::{Combination, Craftnode, CraftnodeSource, LabelPair, RecordOutcome, StoreStats};
pub use validate::FieldViolation;
