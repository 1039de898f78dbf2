//! Field-length and presence checks applied before any write.
//!
//! Lengths are counted in characters (Unicode scalar values), matching what
//! SQLite's `length()` reports for TEXT columns, so the checks here and the
//! table constraints agree on every boundary.

use serde::Serialize;

use crate::error::StorageError;
use crate::types::Craftnode;

/// Maximum length of a combination label or craftnode text.
pub const MAX_LABEL_CHARS: usize = 100;
/// Maximum length of a craftnode emoji.
pub const MAX_EMOJI_CHARS: usize = 64;
/// Maximum length of a model or preview URL.
pub const MAX_URL_CHARS: usize = 255;

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field path as it appears on the wire (e.g. `craftNode.text`).
    pub field: String,
    pub message: String,
}

fn violation(field: String, message: String) -> FieldViolation {
    FieldViolation { field, message }
}

fn field_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_required(field: String, value: &str, max: usize, out: &mut Vec<FieldViolation>) {
    if value.is_empty() {
        out.push(violation(field, "must not be empty".into()));
    } else {
        check_max(field, value, max, out);
    }
}

fn check_max(field: String, value: &str, max: usize, out: &mut Vec<FieldViolation>) {
    let len = value.chars().count();
    if len > max {
        out.push(violation(
            field,
            format!("must be at most {max} characters (got {len})"),
        ));
    }
}

fn check_craftnode(prefix: &str, node: &Craftnode, out: &mut Vec<FieldViolation>) {
    if node.id.is_empty() {
        out.push(violation(field_name(prefix, "id"), "must not be empty".into()));
    }
    check_required(field_name(prefix, "text"), &node.text, MAX_LABEL_CHARS, out);
    check_max(field_name(prefix, "emoji"), &node.emoji, MAX_EMOJI_CHARS, out);
    if let Some(url) = &node.model_url {
        check_max(field_name(prefix, "modelUrl"), url, MAX_URL_CHARS, out);
    }
    if let Some(url) = &node.preview_url {
        check_max(field_name(prefix, "previewUrl"), url, MAX_URL_CHARS, out);
    }
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), StorageError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(StorageError::Validation(violations))
    }
}

/// Validates a craftnode on its own.
pub fn validate_craftnode(node: &Craftnode) -> Result<(), StorageError> {
    let mut out = Vec::new();
    check_craftnode("", node, &mut out);
    finish(out)
}

/// Validates a combination row: both labels and the referenced id.
pub fn validate_combination(str1: &str, str2: &str, craftnode_id: &str) -> Result<(), StorageError> {
    let mut out = Vec::new();
    check_required("str1".into(), str1, MAX_LABEL_CHARS, &mut out);
    check_required("str2".into(), str2, MAX_LABEL_CHARS, &mut out);
    if craftnode_id.is_empty() {
        out.push(violation("cnId".into(), "must not be empty".into()));
    }
    finish(out)
}

/// Validates the full input of a record-combination request, reporting every
/// violation at once.
pub fn validate_record(str1: &str, str2: &str, candidate: &Craftnode) -> Result<(), StorageError> {
    let mut out = Vec::new();
    check_required("str1".into(), str1, MAX_LABEL_CHARS, &mut out);
    check_required("str2".into(), str2, MAX_LABEL_CHARS, &mut out);
    check_craftnode("craftNode", candidate, &mut out);
    finish(out)
}
