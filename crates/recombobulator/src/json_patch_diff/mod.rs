//! JSON Patch diff: generate a JSON Patch from two document values.
//!
//! Arrays are compared position by position, exactly like objects keyed by
//! index. This is what makes reordering an unkeyed array noisy, and why the
//! recombobulator rewrites configured arrays into objects before diffing.

use recombobulator_json_pointer::format_json_pointer;
use serde_json::{Map, Value};

use crate::json_patch::types::PatchOperation;

// ── Public API ────────────────────────────────────────────────────────────

/// Generate a JSON Patch (list of operations) that transforms `src` into `dst`.
///
/// Only `add`, `remove` and `replace` are produced. For each container the
/// source's keys are visited last to first (emitting removals and
/// replacements), then keys new in `dst` are added in `dst` order.
pub fn diff(src: &Value, dst: &Value) -> Vec<PatchOperation> {
    let mut ops = Vec::new();
    let mut path = Vec::new();
    diff_at_path(&mut ops, &mut path, src, dst);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<PatchOperation>, path: &mut Vec<String>, src: &Value, dst: &Value) {
    match (src, dst) {
        (Value::Object(s), Value::Object(d)) => diff_obj(ops, path, s, d),
        (Value::Array(s), Value::Array(d)) => diff_arr(ops, path, s, d),
        _ if src == dst => {}
        _ => ops.push(PatchOperation::Replace {
            path: format_json_pointer(path),
            value: dst.clone(),
        }),
    }
}

fn diff_child(
    ops: &mut Vec<PatchOperation>,
    path: &mut Vec<String>,
    key: String,
    src: Option<&Value>,
    dst: Option<&Value>,
) {
    path.push(key);
    match (src, dst) {
        (Some(s), Some(d)) => diff_at_path(ops, path, s, d),
        (Some(_), None) => ops.push(PatchOperation::Remove {
            path: format_json_pointer(path),
        }),
        (None, Some(d)) => ops.push(PatchOperation::Add {
            path: format_json_pointer(path),
            value: d.clone(),
        }),
        (None, None) => {}
    }
    path.pop();
}

fn diff_obj(
    ops: &mut Vec<PatchOperation>,
    path: &mut Vec<String>,
    src: &Map<String, Value>,
    dst: &Map<String, Value>,
) {
    for (key, src_val) in src.iter().rev() {
        diff_child(ops, path, key.clone(), Some(src_val), dst.get(key));
    }
    for (key, dst_val) in dst {
        if !src.contains_key(key) {
            diff_child(ops, path, key.clone(), None, Some(dst_val));
        }
    }
}

fn diff_arr(ops: &mut Vec<PatchOperation>, path: &mut Vec<String>, src: &[Value], dst: &[Value]) {
    // Trailing removals run from the highest index down, so earlier indices
    // stay valid while the patch is applied.
    for (i, src_val) in src.iter().enumerate().rev() {
        diff_child(ops, path, i.to_string(), Some(src_val), dst.get(i));
    }
    for (i, dst_val) in dst.iter().enumerate().skip(src.len()) {
        diff_child(ops, path, i.to_string(), None, Some(dst_val));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
