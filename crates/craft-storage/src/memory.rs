//! In-memory implementation of [`CraftnodeStore`] and [`CombinationIndex`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It keeps the same uniqueness rules as the SQLite backend:
//! craftnodes are unique by id and by text, and combinations are keyed by
//! their canonical [`LabelPair`].

use std::collections::{BTreeMap, HashMap};

use crate::error::StorageError;
use crate::traits::{CombinationIndex, CraftnodeStore};
use crate::types::{Combination, Craftnode, CraftnodeSource, LabelPair, RecordOutcome};
use crate::validate::{validate_combination, validate_craftnode, validate_record};

/// HashMap-backed craftnode catalogue and combination index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    /// Craftnodes indexed by id.
    craftnodes: HashMap<String, Craftnode>,
    /// Craftnode text -> id (the dedup index).
    ids_by_text: HashMap<String, String>,
    /// Canonical pair -> craftnode id.
    combinations: BTreeMap<LabelPair, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks both uniqueness rules without writing.
    fn check_craftnode_unique(&self, craftnode: &Craftnode) -> Result<(), StorageError> {
        if self.craftnodes.contains_key(&craftnode.id) {
            return Err(StorageError::ConstraintViolation {
                reason: format!("craftnode id '{}' already exists", craftnode.id),
            });
        }
        if self.ids_by_text.contains_key(&craftnode.text) {
            return Err(StorageError::ConstraintViolation {
                reason: format!("craftnode text '{}' already exists", craftnode.text),
            });
        }
        Ok(())
    }

    fn put_craftnode(&mut self, craftnode: &Craftnode) {
        self.ids_by_text
            .insert(craftnode.text.clone(), craftnode.id.clone());
        self.craftnodes
            .insert(craftnode.id.clone(), craftnode.clone());
    }
}

impl CraftnodeStore for InMemoryStore {
    fn find_craftnode_by_text(&self, text: &str) -> Result<Option<Craftnode>, StorageError> {
        Ok(self
            .ids_by_text
            .get(text)
            .and_then(|id| self.craftnodes.get(id))
            .cloned())
    }

    fn find_craftnode_by_id(&self, id: &str) -> Result<Option<Craftnode>, StorageError> {
        Ok(self.craftnodes.get(id).cloned())
    }

    fn insert_craftnode(&mut self, craftnode: &Craftnode) -> Result<(), StorageError> {
        validate_craftnode(craftnode)?;
        self.check_craftnode_unique(craftnode)?;
        self.put_craftnode(craftnode);
        Ok(())
    }

    fn count_craftnodes(&self) -> Result<u64, StorageError> {
        Ok(self.craftnodes.len() as u64)
    }

    fn find_orphans(&self) -> Result<Vec<Craftnode>, StorageError> {
        let mut orphans: Vec<Craftnode> = self
            .craftnodes
            .values()
            .filter(|node| !self.combinations.values().any(|id| *id == node.id))
            .cloned()
            .collect();
        orphans.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(orphans)
    }
}

impl CombinationIndex for InMemoryStore {
    fn find_combination(&self, a: &str, b: &str) -> Result<Option<Combination>, StorageError> {
        let pair = LabelPair::new(a, b);
        Ok(self.combinations.get(&pair).map(|cn_id| Combination {
            str1: pair.first().to_string(),
            str2: pair.second().to_string(),
            cn_id: cn_id.clone(),
        }))
    }

    fn count_combinations(&self) -> Result<u64, StorageError> {
        Ok(self.combinations.len() as u64)
    }

    fn insert_combination(
        &mut self,
        a: &str,
        b: &str,
        craftnode_id: &str,
    ) -> Result<(), StorageError> {
        validate_combination(a, b, craftnode_id)?;
        let pair = LabelPair::new(a, b);
        if self.combinations.contains_key(&pair) {
            return Err(StorageError::ConstraintViolation {
                reason: format!("combination {} already recorded", pair),
            });
        }
        self.combinations.insert(pair, craftnode_id.to_string());
        Ok(())
    }

    fn record_combination(
        &mut self,
        str1: &str,
        str2: &str,
        candidate: &Craftnode,
    ) -> Result<RecordOutcome, StorageError> {
        validate_record(str1, str2, candidate)?;
        let pair = LabelPair::new(str1, str2);

        if let Some(cn_id) = self.combinations.get(&pair) {
            return Ok(RecordOutcome::AlreadyRecorded {
                craftnode_id: cn_id.clone(),
            });
        }

        // Every check runs before the first mutation, so a failure leaves
        // the store untouched.
        let (craftnode_id, source) = match self.ids_by_text.get(&candidate.text) {
            Some(id) => (id.clone(), CraftnodeSource::Existing),
            None => {
                self.check_craftnode_unique(candidate)?;
                self.put_craftnode(candidate);
                (candidate.id.clone(), CraftnodeSource::New)
            }
        };
        self.combinations.insert(pair, craftnode_id.clone());

        Ok(RecordOutcome::Stored {
            craftnode_id,
            source,
        })
    }
}
