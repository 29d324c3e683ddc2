//! JSON Patch apply logic.

use recombobulator_json_pointer::{find_mut, parse_index, JsonPointerError};
use serde_json::{Map, Value};

use super::types::{PatchError, PatchOperation};

// ── Path navigation ───────────────────────────────────────────────────────

/// The container an operation's last step is applied to.
enum Parent<'a> {
    Object(&'a mut Map<String, Value>),
    Array(&'a mut Vec<Value>),
}

fn parent_of<'a>(
    doc: &'a mut Value,
    parent_path: &[String],
    pointer: &str,
) -> Result<Parent<'a>, PatchError> {
    let parent = find_mut(doc, parent_path).map_err(|err| match err {
        JsonPointerError::NotFound => PatchError::NotFound(pointer.to_owned()),
        JsonPointerError::InvalidIndex => PatchError::InvalidIndex(pointer.to_owned()),
        JsonPointerError::NotAContainer => PatchError::InvalidTarget(pointer.to_owned()),
    })?;
    match parent {
        Value::Object(map) => Ok(Parent::Object(map)),
        Value::Array(arr) => Ok(Parent::Array(arr)),
        _ => Err(PatchError::InvalidTarget(pointer.to_owned())),
    }
}

fn array_index(key: &str, pointer: &str) -> Result<usize, PatchError> {
    parse_index(key).map_err(|_| PatchError::InvalidIndex(pointer.to_owned()))
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(
    doc: &mut Value,
    path: &[String],
    pointer: &str,
    value: Value,
) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match parent_of(doc, parent_path, pointer)? {
        Parent::Object(map) => {
            map.insert(key.clone(), value);
        }
        Parent::Array(arr) if key == "-" => arr.push(value),
        Parent::Array(arr) => {
            let idx = array_index(key, pointer)?;
            arr.insert(idx.min(arr.len()), value);
        }
    }
    Ok(())
}

fn apply_remove(doc: &mut Value, path: &[String], pointer: &str) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = Value::Null;
        return Ok(());
    };
    match parent_of(doc, parent_path, pointer)? {
        Parent::Object(map) => {
            map.shift_remove(key.as_str());
        }
        Parent::Array(arr) => {
            let idx = array_index(key, pointer)?;
            if idx < arr.len() {
                arr.remove(idx);
            }
        }
    }
    Ok(())
}

fn apply_replace(
    doc: &mut Value,
    path: &[String],
    pointer: &str,
    value: Value,
) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match parent_of(doc, parent_path, pointer)? {
        Parent::Object(map) => {
            map.insert(key.clone(), value);
        }
        Parent::Array(arr) => {
            let idx = array_index(key, pointer)?;
            match arr.get_mut(idx) {
                Some(slot) => *slot = value,
                None => arr.push(value),
            }
        }
    }
    Ok(())
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document (in-place mutation).
pub fn apply_op(doc: &mut Value, op: &PatchOperation) -> Result<(), PatchError> {
    let path = op.steps();
    match op {
        PatchOperation::Add { path: pointer, value } => {
            apply_add(doc, &path, pointer, value.clone())
        }
        PatchOperation::Remove { path: pointer } => apply_remove(doc, &path, pointer),
        PatchOperation::Replace { path: pointer, value } => {
            apply_replace(doc, &path, pointer, value.clone())
        }
    }
}

/// Apply operations in order, stopping at the first failure.
///
/// The document is left with every operation before the failing one applied.
pub fn apply_patch(doc: &mut Value, ops: &[PatchOperation]) -> Result<(), PatchError> {
    ops.iter().try_for_each(|op| apply_op(doc, op))
}

// ── Tests ─────────────────────────────────────────────────────────────────
