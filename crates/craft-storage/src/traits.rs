//! The storage contract: [`CraftnodeStore`] for the deduplicated result
//! catalogue and [`CombinationIndex`] for the unordered-pair index layered on
//! top of it.
//!
//! Reads return `Ok(None)` on a miss; absence is never an error. Writes
//! validate their input first and report uniqueness violations as
//! [`StorageError::ConstraintViolation`].
//!
//! Both backends (InMemoryStore, SqliteStore) implement these traits with
//! identical semantics.

use crate::error::StorageError;
use crate::types::{Combination, Craftnode, RecordOutcome, StoreStats};

/// Durable catalogue of craftnodes, unique by id and by text.
pub trait CraftnodeStore {
    /// Finds the craftnode whose text is exactly `text`.
    ///
    /// No length validation is applied on read.
    fn find_craftnode_by_text(&self, text: &str) -> Result<Option<Craftnode>, StorageError>;

    /// Finds a craftnode by its id.
    fn find_craftnode_by_id(&self, id: &str) -> Result<Option<Craftnode>, StorageError>;

    /// Inserts a new craftnode.
    ///
    /// Fails with `Validation` if a field is out of bounds and with
    /// `ConstraintViolation` if the id or the text is already taken.
    fn insert_craftnode(&mut self, craftnode: &Craftnode) -> Result<(), StorageError>;

    /// Number of stored craftnodes.
    fn count_craftnodes(&self) -> Result<u64, StorageError>;

    /// Craftnodes that no combination references, ordered by text.
    fn find_orphans(&self) -> Result<Vec<Craftnode>, StorageError>;
}

/// Index from unordered label pairs to the craftnode they produce.
pub trait CombinationIndex: CraftnodeStore {
    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// Finds the combination for `{a, b}`, whichever orientation it was
    /// stored in.
    fn find_combination(&self, a: &str, b: &str) -> Result<Option<Combination>, StorageError>;

    /// Finds the craftnode that `{a, b}` produces.
    ///
    /// A combination whose craftnode is missing resolves to `None`.
    fn resolve_combination(&self, a: &str, b: &str) -> Result<Option<Craftnode>, StorageError> {
        match self.find_combination(a, b)? {
            Some(combination) => self.find_craftnode_by_id(&combination.cn_id),
            None => Ok(None),
        }
    }

    /// Number of stored combinations.
    fn count_combinations(&self) -> Result<u64, StorageError>;

    /// Row counts, including orphaned craftnodes.
    fn stats(&self) -> Result<StoreStats, StorageError> {
        Ok(StoreStats {
            craftnodes: self.count_craftnodes()?,
            combinations: self.count_combinations()?,
            orphans: self.find_orphans()?.len() as u64,
        })
    }

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Inserts a combination row pointing at `craftnode_id`.
    ///
    /// The pair is stored in canonical orientation. Fails with
    /// `ConstraintViolation` if `{a, b}` is already recorded in either
    /// orientation. The referenced craftnode is not checked.
    fn insert_combination(
        &mut self,
        a: &str,
        b: &str,
        craftnode_id: &str,
    ) -> Result<(), StorageError>;

    /// Records that `str1` + `str2` produced `candidate`, deduplicating the
    /// craftnode by text.
    ///
    /// All-or-nothing: either the combination (and, if needed, the candidate
    /// craftnode) is written, or nothing is. An already recorded pair and a
    /// craftnode text that already exists are both normal outcomes, so
    /// concurrent identical calls never fail. A candidate whose id belongs to
    /// a craftnode with different text fails with `ConstraintViolation`.
    fn record_combination(
        &mut self,
        str1: &str,
        str2: &str,
        candidate: &Craftnode,
    ) -> Result<RecordOutcome, StorageError>;
}
