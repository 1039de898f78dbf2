//! Storage-layer record types: craftnodes, combinations, and the unordered
//! label pair that keys the combination index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A generated result of combining two labels.
///
/// `text` is the dedup key: no two craftnodes share it. The `id` is chosen by
/// whoever creates the record and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Craftnode {
    pub id: String,
    pub text: String,
    pub emoji: String,
    pub tags: Option<String>,
    pub model_url: Option<String>,
    pub preview_url: Option<String>,
}

impl Craftnode {
    /// Creates a craftnode with no tags or asset references.
    pub fn new(id: impl Into<String>, text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Craftnode {
            id: id.into(),
            text: text.into(),
            emoji: emoji.into(),
            tags: None,
            model_url: None,
            preview_url: None,
        }
    }
}

/// A stored fact: `str1` combined with `str2` yields the craftnode `cn_id`.
///
/// The labels are reported in the orientation they were stored in, which is
/// not necessarily the orientation a caller looked them up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub str1: String,
    pub str2: String,
    pub cn_id: String,
}

/// An unordered pair of labels in canonical orientation.
///
/// The lexicographically smaller label always comes first, so `(a, b)` and
/// `(b, a)` produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelPair {
    first: String,
    second: String,
}

impl LabelPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            LabelPair { first: a, second: b }
        } else {
            LabelPair { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for LabelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Where the craftnode of a freshly recorded combination came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftnodeSource {
    /// A craftnode with the same text already existed and was reused.
    Existing,
    /// The candidate craftnode was inserted.
    New,
}

/// Result of [`CombinationIndex::record_combination`](crate::traits::CombinationIndex::record_combination).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new combination row was written.
    Stored {
        craftnode_id: String,
        source: CraftnodeSource,
    },
    /// The pair was already recorded (in either orientation); nothing was
    /// written. `craftnode_id` is what the existing row points at.
    AlreadyRecorded { craftnode_id: String },
}

impl RecordOutcome {
    pub fn craftnode_id(&self) -> &str {
        match self {
            RecordOutcome::Stored { craftnode_id, .. }
            | RecordOutcome::AlreadyRecorded { craftnode_id } => craftnode_id,
        }
    }
}

/// Row counts for operator tooling and health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    pub craftnodes: u64,
    pub combinations: u64,
    /// Craftnodes that no combination references.
    pub orphans: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_canonical_in_both_orientations() {
        let ab = LabelPair::new("Water", "Earth");
        let ba = LabelPair::new("Earth", "Water");
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "Earth");
        assert_eq!(ab.second(), "Water");
    }

    #[test]
    fn pair_of_identical_labels() {
        let pair = LabelPair::new("Fire", "Fire");
        assert_eq!(pair.first(), "Fire");
        assert_eq!(pair.second(), "Fire");
        assert_eq!(pair.to_string(), "(Fire, Fire)");
    }

    #[test]
    fn craftnode_serializes_with_camel_case_fields() {
        let mut node = Craftnode::new("c1", "Mud", "🟤");
        node.model_url = Some("https://assets.example/mud.glb".into());

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["modelUrl"], "https://assets.example/mud.glb");
        assert!(json["previewUrl"].is_null());
        assert!(json["tags"].is_null());

        let back: Craftnode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn outcome_exposes_craftnode_id() {
        let stored = RecordOutcome::Stored {
            craftnode_id: "c1".into(),
            source: CraftnodeSource::New,
        };
        let already = RecordOutcome::AlreadyRecorded {
            craftnode_id: "c2".into(),
        };
        assert_eq!(stored.craftnode_id(), "c1");
        assert_eq!(already.craftnode_id(), "c2");
    }
}
