//! Core types for the JSON Patch module.

use recombobulator_json_pointer::{parse_json_pointer, Path};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Why an operation could not be applied. Each variant carries the
/// operation's pointer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INVALID_INDEX: {0}")]
    InvalidIndex(String),
    #[error("INVALID_TARGET: {0}")]
    InvalidTarget(String),
}

// ── Operation ─────────────────────────────────────────────────────────────

/// A JSON Patch operation in its RFC 6902 wire form.
///
/// ```
/// use recombobulator::PatchOperation;
///
/// let op: PatchOperation =
///     serde_json::from_str(r#"{"op":"replace","path":"/b/0","value":"11"}"#).unwrap();
/// assert_eq!(op.op_name(), "replace");
/// assert_eq!(op.path(), "/b/0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
}

/// An ordered list of operations.
pub type Patch = Vec<PatchOperation>;

impl PatchOperation {
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOperation::Add { .. } => "add",
            PatchOperation::Remove { .. } => "remove",
            PatchOperation::Replace { .. } => "replace",
        }
    }

    /// The slash-delimited pointer this operation targets.
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. } => path,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => {
                Some(value)
            }
            PatchOperation::Remove { .. } => None,
        }
    }

    /// The decoded pointer steps.
    pub fn steps(&self) -> Path {
        parse_json_pointer(self.path())
    }
}
