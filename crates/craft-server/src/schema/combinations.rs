//! Combination lookup and store request/response types.

use craft_storage::Craftnode;
use serde::{Deserialize, Serialize};

/// Query for `GET /combination?str1=&str2=`.
///
/// Missing parameters read as empty labels, which never match.
#[derive(Debug, Clone, Deserialize)]
pub struct CombinationQuery {
    #[serde(default)]
    pub str1: String,
    #[serde(default)]
    pub str2: String,
}

/// Body of `POST /combination`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCombinationRequest {
    pub str1: String,
    pub str2: String,
    pub craft_node: CraftnodeCandidate,
}

/// The craftnode a client proposes for a newly played combination.
///
/// The id is optional; the server assigns one when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftnodeCandidate {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl CraftnodeCandidate {
    pub fn into_craftnode(self) -> Craftnode {
        Craftnode {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            text: self.text,
            emoji: self.emoji,
            tags: self.tags,
            model_url: self.model_url,
            preview_url: self.preview_url,
        }
    }
}

/// Response of `POST /combination`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCombinationResponse {
    pub message: String,
    /// The craftnode the pair now resolves to.
    pub cn_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_without_id_gets_one() {
        let candidate: CraftnodeCandidate =
            serde_json::from_value(serde_json::json!({ "text": "Mud", "emoji": "🟤" })).unwrap();
        let node = candidate.into_craftnode();
        assert_eq!(node.text, "Mud");
        assert!(uuid::Uuid::parse_str(&node.id).is_ok());
    }

    #[test]
    fn request_uses_wire_field_names() {
        let req: StoreCombinationRequest = serde_json::from_value(serde_json::json!({
            "str1": "Water",
            "str2": "Earth",
            "craftNode": {
                "id": "c1",
                "text": "Mud",
                "emoji": "🟤",
                "tags": null,
                "previewUrl": "https://assets.example/mud.png",
                "modelUrl": null
            }
        }))
        .unwrap();
        let node = req.craft_node.into_craftnode();
        assert_eq!(node.id, "c1");
        assert_eq!(node.preview_url.as_deref(), Some("https://assets.example/mud.png"));
        assert_eq!(node.model_url, None);
    }
}
