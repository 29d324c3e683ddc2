//! JSON Pointer (RFC 6901) utilities.
//!
//! Patch operations produced by the diff address values with pointers such as
//! `/collection/xxx-yyy-zzz/status`. This crate converts between pointer
//! strings and decoded path steps, and resolves steps against a
//! `serde_json::Value` for in-place edits.
//!
//! # Example
//!
//! ```
//! use recombobulator_json_pointer::{find_mut, format_json_pointer, parse_json_pointer};
//!
//! let path = parse_json_pointer("/collection/a~1b");
//! assert_eq!(path, vec!["collection".to_string(), "a/b".to_string()]);
//! assert_eq!(format_json_pointer(&path), "/collection/a~1b");
//!
//! let mut doc = serde_json::json!({"collection": {"a/b": 1}});
//! *find_mut(&mut doc, &path).unwrap() = serde_json::json!(2);
//! assert_eq!(doc["collection"]["a/b"], 2);
//! ```

use serde_json::Value;
use thiserror::Error;

/// A single decoded pointer step (object key or array index).
pub type PathStep = String;

/// A decoded JSON Pointer.
pub type Path = Vec<PathStep>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("NOT_A_CONTAINER")]
    NotAContainer,
}

/// Unescapes a pointer step: `~1` becomes `/`, then `~0` becomes `~`.
///
/// ```
/// use recombobulator_json_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("~01"), "~1");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_owned();
    }
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer step: `~` becomes `~0`, then `/` becomes `~1`.
///
/// ```
/// use recombobulator_json_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("2018/08/14"), "2018~108~114");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains(['/', '~']) {
        return component.to_owned();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parses a pointer string into decoded steps.
///
/// The empty pointer is the root. A pointer without a leading `/` is read as
/// if it had one, so `"a/b"` and `"/a/b"` decode alike.
///
/// ```
/// use recombobulator_json_pointer::parse_json_pointer;
///
/// assert!(parse_json_pointer("").is_empty());
/// assert_eq!(parse_json_pointer("/"), vec![String::new()]);
/// assert_eq!(parse_json_pointer("/b/0"), vec!["b", "0"]);
/// ```
pub fn parse_json_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let body = pointer.strip_prefix('/').unwrap_or(pointer);
    body.split('/').map(unescape_component).collect()
}

/// Formats decoded steps as a pointer string. The root formats as `""`.
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::with_capacity(path.iter().map(|s| s.len() + 1).sum());
    for step in path {
        out.push('/');
        out.push_str(&escape_component(step));
    }
    out
}

/// Returns true for a canonical array index: decimal digits without a
/// leading zero (`"0"` itself is allowed).
pub fn is_valid_index(step: &str) -> bool {
    let bytes = step.as_bytes();
    match bytes {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        _ => bytes.iter().all(u8::is_ascii_digit),
    }
}

/// Parses `step` as an array index.
pub fn parse_index(step: &str) -> Result<usize, JsonPointerError> {
    if !is_valid_index(step) {
        return Err(JsonPointerError::InvalidIndex);
    }
    step.parse().map_err(|_| JsonPointerError::InvalidIndex)
}

/// Resolves `path` to a mutable reference, reporting why resolution failed.
///
/// # Errors
///
/// - [`JsonPointerError::NotFound`] when an object key or array element is
///   missing.
/// - [`JsonPointerError::InvalidIndex`] when an array step is not an index.
/// - [`JsonPointerError::NotAContainer`] when a step descends into a scalar.
pub fn find_mut<'a>(
    val: &'a mut Value,
    path: &[String],
) -> Result<&'a mut Value, JsonPointerError> {
    let mut current = val;
    for step in path {
        current = match current {
            Value::Object(map) => map.get_mut(step).ok_or(JsonPointerError::NotFound)?,
            Value::Array(arr) => {
                let idx = parse_index(step)?;
                arr.get_mut(idx).ok_or(JsonPointerError::NotFound)?
            }
            _ => return Err(JsonPointerError::NotAContainer),
        };
    }
    Ok(current)
}
