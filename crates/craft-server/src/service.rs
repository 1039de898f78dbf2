//! CraftService: the single coordinator between HTTP handlers and the
//! craftnode store.
//!
//! All business logic flows through [`CraftService`]. Handlers are thin
//! wrappers that delegate to these methods.

use craft_storage::{
    CombinationIndex, CraftnodeSource, CraftnodeStore, RecordOutcome, SqliteStore,
};

use crate::error::ApiError;
use crate::schema::combinations::{StoreCombinationRequest, StoreCombinationResponse};
use crate::schema::common::LookupResponse;
use crate::schema::health::HealthResponse;

/// How a store request was settled, for status-code selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Created,
    AlreadyRecorded,
}

/// Holds the process-wide store, opened once at startup.
pub struct CraftService {
    store: SqliteStore,
}

impl CraftService {
    /// Opens the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(CraftService { store })
    }

    /// Uses an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let store = SqliteStore::in_memory()
            .map_err(|e| ApiError::InternalError(format!("failed to open test store: {}", e)))?;
        Ok(CraftService { store })
    }

    /// Resolves the craftnode an unordered pair produces.
    pub fn check_combination(&self, str1: &str, str2: &str) -> Result<LookupResponse, ApiError> {
        let Some(combination) = self.store.find_combination(str1, str2)? else {
            return Ok(LookupResponse::from_option(None));
        };

        let craftnode = self.store.find_craftnode_by_id(&combination.cn_id)?;
        if craftnode.is_none() {
            tracing::warn!(
                str1 = %combination.str1,
                str2 = %combination.str2,
                cn_id = %combination.cn_id,
                "combination references a missing craftnode"
            );
        }
        Ok(LookupResponse::from_option(craftnode))
    }

    /// Finds a craftnode by its label.
    pub fn check_craftnode(&self, text: &str) -> Result<LookupResponse, ApiError> {
        let craftnode = self.store.find_craftnode_by_text(text)?;
        Ok(LookupResponse::from_option(craftnode))
    }

    /// Records a newly played combination, reusing an existing craftnode
    /// with the same text.
    pub fn store_combination(
        &mut self,
        req: StoreCombinationRequest,
    ) -> Result<(StoreStatus, StoreCombinationResponse), ApiError> {
        let candidate = req.craft_node.into_craftnode();
        let outcome = match self
            .store
            .record_combination(&req.str1, &req.str2, &candidate)
        {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(str1 = %req.str1, str2 = %req.str2, error = %err, "store combination failed");
                return Err(err.into());
            }
        };

        let (status, message) = match &outcome {
            RecordOutcome::Stored {
                source: CraftnodeSource::Existing,
                ..
            } => (
                StoreStatus::Created,
                "Combination stored with existing craftNode",
            ),
            RecordOutcome::Stored {
                source: CraftnodeSource::New,
                ..
            } => (StoreStatus::Created, "Combination stored with new craftNode"),
            RecordOutcome::AlreadyRecorded { .. } => {
                (StoreStatus::AlreadyRecorded, "Combination already recorded")
            }
        };
        tracing::info!(
            str1 = %req.str1,
            str2 = %req.str2,
            cn_id = %outcome.craftnode_id(),
            "{}",
            message
        );

        Ok((
            status,
            StoreCombinationResponse {
                message: message.to_string(),
                cn_id: outcome.craftnode_id().to_string(),
            },
        ))
    }

    pub fn health(&self) -> Result<HealthResponse, ApiError> {
        Ok(HealthResponse {
            status: "ok",
            craftnodes: self.store.count_craftnodes()?,
            combinations: self.store.count_combinations()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::combinations::CraftnodeCandidate;

    fn request(str1: &str, str2: &str, id: &str, text: &str) -> StoreCombinationRequest {
        StoreCombinationRequest {
            str1: str1.into(),
            str2: str2.into(),
            craft_node: CraftnodeCandidate {
                id: Some(id.into()),
                text: text.into(),
                emoji: "🟤".into(),
                tags: None,
                model_url: None,
                preview_url: None,
            },
        }
    }

    #[test]
    fn store_then_check_both_orientations() {
        let mut service = CraftService::in_memory().unwrap();
        let (status, resp) = service
            .store_combination(request("Water", "Earth", "c1", "Mud"))
            .unwrap();
        assert_eq!(status, StoreStatus::Created);
        assert_eq!(resp.message, "Combination stored with new craftNode");

        let lookup = service.check_combination("Earth", "Water").unwrap();
        assert!(lookup.exists);
        assert_eq!(lookup.result.unwrap().id, "c1");

        let (_, resp) = service
            .store_combination(request("Water", "Dust", "c2", "Mud"))
            .unwrap();
        assert_eq!(resp.message, "Combination stored with existing craftNode");
        assert_eq!(resp.cn_id, "c1");

        let (status, resp) = service
            .store_combination(request("Earth", "Water", "c3", "Swamp"))
            .unwrap();
        assert_eq!(status, StoreStatus::AlreadyRecorded);
        assert_eq!(resp.cn_id, "c1");
        assert!(!service.check_craftnode("Swamp").unwrap().exists);
    }

    #[test]
    fn validation_maps_to_api_error() {
        let mut service = CraftService::in_memory().unwrap();
        let err = service
            .store_combination(request(&"w".repeat(101), "Earth", "c1", "Mud"))
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationFailed(ref v) if v[0].field == "str1"));
    }

    #[test]
    fn health_counts_rows() {
        let mut service = CraftService::in_memory().unwrap();
        service
            .store_combination(request("Water", "Earth", "c1", "Mud"))
            .unwrap();
        let health = service.health().unwrap();
        assert_eq!(health.craftnodes, 1);
        assert_eq!(health.combinations, 1);
    }
}
