//! SQLite implementation of [`CraftnodeStore`] and [`CombinationIndex`].
//!
//! [`SqliteStore`] keeps both tables in one database file with WAL mode and
//! automatic schema migrations. Compound writes run inside an immediate
//! (write-locking) transaction, so concurrent writers on other connections
//! are serialized by SQLite rather than racing between check and insert.

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::error::StorageError;
use crate::traits::{CombinationIndex, CraftnodeStore};
use crate::types::{Combination, Craftnode, CraftnodeSource, LabelPair, RecordOutcome};
use crate::validate::{validate_combination, validate_craftnode, validate_record};

const CRAFTNODE_COLUMNS: &str = "id, text, emoji, tags, modelUrl, previewUrl";

// Legacy databases allowed NULL ids and texts. Such rows are never returned.
const READABLE_CRAFTNODE: &str = "id IS NOT NULL AND text IS NOT NULL";

/// SQLite-backed craftnode catalogue and combination index.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

// ---------------------------------------------------------------------------
// Row helpers. They take `&Connection` so they run equally on the store's
// connection and inside a transaction.
// ---------------------------------------------------------------------------

fn read_craftnode(row: &Row<'_>) -> rusqlite::Result<Craftnode> {
    Ok(Craftnode {
        id: row.get(0)?,
        text: row.get(1)?,
        // Legacy rows may carry a NULL emoji.
        emoji: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tags: row.get(3)?,
        model_url: row.get(4)?,
        preview_url: row.get(5)?,
    })
}

fn craftnode_by_text(conn: &Connection, text: &str) -> Result<Option<Craftnode>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CRAFTNODE_COLUMNS} FROM craftnode WHERE text = ?1 AND {READABLE_CRAFTNODE}"
    ))?;
    Ok(stmt.query_row(params![text], read_craftnode).optional()?)
}

fn craftnode_by_id(conn: &Connection, id: &str) -> Result<Option<Craftnode>, StorageError> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CRAFTNODE_COLUMNS} FROM craftnode WHERE id = ?1 AND {READABLE_CRAFTNODE}"
    ))?;
    Ok(stmt.query_row(params![id], read_craftnode).optional()?)
}

/// Looks a pair up in both orientations. Rows written before pairs were
/// canonicalized may be stored either way round; the canonical row wins if
/// both exist. Legacy rows with a NULL `cnId` read as a miss.
fn combination_for(conn: &Connection, pair: &LabelPair) -> Result<Option<Combination>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT str1, str2, cnId FROM combinations
         WHERE ((str1 = ?1 AND str2 = ?2) OR (str1 = ?2 AND str2 = ?1))
           AND cnId IS NOT NULL
         ORDER BY str1 = ?1 DESC
         LIMIT 1",
    )?;
    let row = stmt
        .query_row(params![pair.first(), pair.second()], |row| {
            Ok(Combination {
                str1: row.get(0)?,
                str2: row.get(1)?,
                cn_id: row.get(2)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

impl CraftnodeStore for SqliteStore {
    fn find_craftnode_by_text(&self, text: &str) -> Result<Option<Craftnode>, StorageError> {
        craftnode_by_text(&self.conn, text)
    }

    fn find_craftnode_by_id(&self, id: &str) -> Result<Option<Craftnode>, StorageError> {
        craftnode_by_id(&self.conn, id)
    }

    fn insert_craftnode(&mut self, craftnode: &Craftnode) -> Result<(), StorageError> {
        validate_craftnode(craftnode)?;
        self.conn.execute(
            &format!("INSERT INTO craftnode ({CRAFTNODE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                craftnode.id,
                craftnode.text,
                craftnode.emoji,
                craftnode.tags,
                craftnode.model_url,
                craftnode.preview_url,
            ],
        )?;
        Ok(())
    }

    fn count_craftnodes(&self) -> Result<u64, StorageError> {
        count_rows(&self.conn, "craftnode")
    }

    fn find_orphans(&self) -> Result<Vec<Craftnode>, StorageError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {CRAFTNODE_COLUMNS} FROM craftnode c
             WHERE {READABLE_CRAFTNODE}
               AND NOT EXISTS (SELECT 1 FROM combinations WHERE cnId = c.id)
             ORDER BY text"
        ))?;
        let rows = stmt.query_map([], read_craftnode)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

impl CombinationIndex for SqliteStore {
    fn find_combination(&self, a: &str, b: &str) -> Result<Option<Combination>, StorageError> {
        combination_for(&self.conn, &LabelPair::new(a, b))
    }

    fn count_combinations(&self) -> Result<u64, StorageError> {
        count_rows(&self.conn, "combinations")
    }

    fn insert_combination(
        &mut self,
        a: &str,
        b: &str,
        craftnode_id: &str,
    ) -> Result<(), StorageError> {
        validate_combination(a, b, craftnode_id)?;
        let pair = LabelPair::new(a, b);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if combination_for(&tx, &pair)?.is_some() {
            return Err(StorageError::ConstraintViolation {
                reason: format!("combination {} already recorded", pair),
            });
        }
        tx.execute(
            "INSERT INTO combinations (str1, str2, cnId) VALUES (?1, ?2, ?3)",
            params![pair.first(), pair.second(), craftnode_id],
        )?;
        tx.commit()?;
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

        // Dropping `tx` without commit rolls back everything below.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(existing) = combination_for(&tx, &pair)? {
            return Ok(RecordOutcome::AlreadyRecorded {
                craftnode_id: existing.cn_id,
            });
        }

        let (craftnode_id, source) = match craftnode_by_text(&tx, &candidate.text)? {
            Some(existing) => (existing.id, CraftnodeSource::Existing),
            None => {
                // Insert-or-ignore on text; a legacy row with this text and
                // a NULL id takes the candidate's id instead. An id collision
                // with a different text is not covered by the conflict target
                // and still fails.
                let inserted = tx.execute(
                    &format!(
                        "INSERT INTO craftnode ({CRAFTNODE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                         ON CONFLICT(text) DO UPDATE SET id = excluded.id WHERE id IS NULL"
                    ),
                    params![
                        candidate.id,
                        candidate.text,
                        candidate.emoji,
                        candidate.tags,
                        candidate.model_url,
                        candidate.preview_url,
                    ],
                )?;
                if inserted == 1 {
                    (candidate.id.clone(), CraftnodeSource::New)
                } else {
                    let existing = craftnode_by_text(&tx, &candidate.text)?.ok_or_else(|| {
                        StorageError::ConstraintViolation {
                            reason: format!("craftnode text '{}' conflicted but is absent", candidate.text),
                        }
                    })?;
                    (existing.id, CraftnodeSource::Existing)
                }
            }
        };

        // Dead legacy rows for this pair would otherwise shadow the new one.
        tx.execute(
            "DELETE FROM combinations
             WHERE ((str1 = ?1 AND str2 = ?2) OR (str1 = ?2 AND str2 = ?1))
               AND cnId IS NULL",
            params![pair.first(), pair.second()],
        )?;
        let inserted = tx.execute(
            "INSERT INTO combinations (str1, str2, cnId) VALUES (?1, ?2, ?3)
             ON CONFLICT(str1, str2) DO NOTHING",
            params![pair.first(), pair.second(), craftnode_id],
        )?;
        if inserted == 0 {
            let existing = combination_for(&tx, &pair)?.map(|c| c.cn_id).unwrap_or(craftnode_id);
            return Ok(RecordOutcome::AlreadyRecorded {
                craftnode_id: existing,
            });
        }

        tx.commit()?;
        Ok(RecordOutcome::Stored {
            craftnode_id,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;
    use crate::schema::create_legacy_database;

    fn mud(id: &str) -> Craftnode {
        Craftnode::new(id, "Mud", "🟤")
    }

    #[test]
    fn miss_returns_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.find_craftnode_by_text("Mud").unwrap().is_none());
        assert!(store.find_craftnode_by_id("c1").unwrap().is_none());
        assert!(store.find_combination("Water", "Earth").unwrap().is_none());
        assert!(store.resolve_combination("Water", "Earth").unwrap().is_none());
    }

    #[test]
    fn crafting_scenario() {
        let mut store = SqliteStore::in_memory().unwrap();

        let outcome = store.record_combination("Water", "Earth", &mud("c1")).unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::Stored {
                craftnode_id: "c1".into(),
                source: CraftnodeSource::New,
            }
        );

        let resolved = store.resolve_combination("Earth", "Water").unwrap().unwrap();
        assert_eq!(resolved.id, "c1");
        assert_eq!(resolved.text, "Mud");

        let outcome = store.record_combination("Water", "Dust", &mud("c2")).unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::Stored {
                craftnode_id: "c1".into(),
                source: CraftnodeSource::Existing,
            }
        );

        assert_eq!(store.count_craftnodes().unwrap(), 1);
        assert!(store.find_craftnode_by_id("c2").unwrap().is_none());
        assert_eq!(store.resolve_combination("Dust", "Water").unwrap().unwrap().id, "c1");
    }

    #[test]
    fn insert_is_symmetric_and_blocks_reverse_orientation() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_craftnode(&mud("c1")).unwrap();
        store.insert_combination("Water", "Earth", "c1").unwrap();

        let forward = store.find_combination("Water", "Earth").unwrap().unwrap();
        let reverse = store.find_combination("Earth", "Water").unwrap().unwrap();
        assert_eq!(forward, reverse);
        assert_eq!(forward.cn_id, "c1");
        // Stored canonically, not in caller orientation.
        assert_eq!((forward.str1.as_str(), forward.str2.as_str()), ("Earth", "Water"));

        store.insert_craftnode(&Craftnode::new("c2", "Steam", "💨")).unwrap();
        let err = store.insert_combination("Earth", "Water", "c2").unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));
        assert_eq!(store.resolve_combination("Water", "Earth").unwrap().unwrap().id, "c1");
    }

    #[test]
    fn legacy_reversed_row_still_resolves() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_craftnode(&mud("c1")).unwrap();
        // Non-canonical orientation, as the original server stored it.
        store
            .conn
            .execute(
                "INSERT INTO combinations (str1, str2, cnId) VALUES ('Water', 'Earth', 'c1')",
                [],
            )
            .unwrap();

        assert_eq!(store.resolve_combination("Earth", "Water").unwrap().unwrap().id, "c1");
        let err = store.insert_combination("Earth", "Water", "c1").unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));

        let outcome = store.record_combination("Earth", "Water", &mud("c9")).unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::AlreadyRecorded {
                craftnode_id: "c1".into()
            }
        );
    }

    #[test]
    fn duplicate_text_and_id_are_constraint_violations() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_craftnode(&mud("c1")).unwrap();

        let err = store.insert_craftnode(&mud("c2")).unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));

        let err = store
            .insert_craftnode(&Craftnode::new("c1", "Steam", "💨"))
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));
        assert_eq!(store.count_craftnodes().unwrap(), 1);
    }

    #[test]
    fn id_collision_on_record_rolls_back() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.record_combination("Water", "Earth", &mud("c1")).unwrap();

        let err = store
            .record_combination("Water", "Fire", &Craftnode::new("c1", "Steam", "💨"))
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation { .. }));
        assert!(store.find_combination("Water", "Fire").unwrap().is_none());
        assert!(store.find_craftnode_by_text("Steam").unwrap().is_none());
    }

    #[test]
    fn validation_happens_before_any_write() {
        let mut store = SqliteStore::in_memory().unwrap();
        let long = "x".repeat(101);

        let err = store.record_combination(&long, "Earth", &mud("c1")).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        let err = store
            .insert_craftnode(&Craftnode::new("c1", long.clone(), "x"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert_eq!(store.count_craftnodes().unwrap(), 0);

        let exact = "x".repeat(100);
        store.record_combination(&exact, "Earth", &Craftnode::new("c1", exact.clone(), "x")).unwrap();
        assert!(store.find_craftnode_by_text(&exact).unwrap().is_some());
    }

    #[test]
    fn dangling_combination_resolves_to_none() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_combination("Water", "Earth", "ghost").unwrap();
        assert!(store.find_combination("Water", "Earth").unwrap().is_some());
        assert!(store.resolve_combination("Water", "Earth").unwrap().is_none());
    }

    #[test]
    fn orphans_and_stats() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.record_combination("Water", "Earth", &mud("c1")).unwrap();
        store.insert_craftnode(&Craftnode::new("c2", "Steam", "💨")).unwrap();

        let orphans = store.find_orphans().unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].id, "c2");

        let stats = store.stats().unwrap();
        assert_eq!(stats.craftnodes, 2);
        assert_eq!(stats.combinations, 1);
        assert_eq!(stats.orphans, 1);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("craft.db");
        let path = path.to_str().unwrap();

        {
            let mut store = SqliteStore::new(path).unwrap();
            let mut node = mud("c1");
            node.tags = Some("earthy".into());
            node.preview_url = Some("https://assets.example/mud.png".into());
            store.record_combination("Water", "Earth", &node).unwrap();
        }

        let store = SqliteStore::new(path).unwrap();
        let node = store.resolve_combination("Earth", "Water").unwrap().unwrap();
        assert_eq!(node.tags.as_deref(), Some("earthy"));
        assert_eq!(node.preview_url.as_deref(), Some("https://assets.example/mud.png"));
        assert_eq!(node.model_url, None);
    }

    #[test]
    fn legacy_null_ids_read_as_misses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.sqlite");
        let path = path.to_str().unwrap();
        create_legacy_database(
            path,
            "INSERT INTO craftnode (id, text, emoji) VALUES (NULL, 'Mud', 'x');
             INSERT INTO combinations (str1, str2, cnId) VALUES ('Water', 'Earth', NULL);",
        );

        let mut store = SqliteStore::new(path).unwrap();
        assert!(store.find_combination("Water", "Earth").unwrap().is_none());
        assert!(store.resolve_combination("Earth", "Water").unwrap().is_none());
        assert!(store.find_craftnode_by_text("Mud").unwrap().is_none());
        assert!(store.find_orphans().unwrap().is_empty());
        assert_eq!(store.stats().unwrap().orphans, 0);

        // Recording the pair repairs both rows in place.
        let outcome = store.record_combination("Water", "Earth", &mud("c1")).unwrap();
        assert_eq!(
            outcome,
            RecordOutcome::Stored {
                craftnode_id: "c1".to_string(),
                source: CraftnodeSource::New,
            }
        );
        let node = store.resolve_combination("Earth", "Water").unwrap().unwrap();
        assert_eq!(node.id, "c1");
        assert_eq!(node.emoji, "x");
        assert_eq!(store.count_craftnodes().unwrap(), 1);
        assert_eq!(store.count_combinations().unwrap(), 1);
    }

    #[test]
    fn concurrent_writers_on_separate_connections() {
        const WRITERS: usize = 8;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("craft.db");
        let path = path.to_str().unwrap().to_string();

        // Open (and migrate) sequentially; only the writes race.
        let stores: Vec<SqliteStore> = (0..WRITERS)
            .map(|_| SqliteStore::new(&path).unwrap())
            .collect();
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = stores
            .into_iter()
            .enumerate()
            .map(|(i, mut store)| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.record_combination("Water", "Earth", &mud(&format!("c{i}")))
                })
            })
            .collect();

        let outcomes: Vec<RecordOutcome> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();

        let stored = outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Stored { .. }))
            .count();
        assert_eq!(stored, 1);

        let winner = outcomes
            .iter()
            .find(|o| matches!(o, RecordOutcome::Stored { .. }))
            .unwrap()
            .craftnode_id()
            .to_string();
        assert!(outcomes.iter().all(|o| o.craftnode_id() == winner));

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.count_craftnodes().unwrap(), 1);
        assert_eq!(store.count_combinations().unwrap(), 1);
    }
}
