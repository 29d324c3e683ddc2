#![allow(dead_code)]

pub mod capture;

use recombobulator::{Collections, Document, Patch, Recombobulator};
use serde_json::Value;

pub fn doc(value: Value) -> Document {
    Document::from(value)
}

/// A recombobulator keyed by `(dotted path, key field)` pairs.
pub fn keyed(keys: &[(&str, &str)]) -> Recombobulator {
    let collections = keys
        .iter()
        .fold(Collections::new(), |acc, (path, key)| acc.with_key(*path, *key));
    Recombobulator::new(collections)
}

/// The RFC 6902 wire form of a patch.
pub fn wire(patch: &Patch) -> Value {
    serde_json::to_value(patch).unwrap_or_else(|e| panic!("patch did not serialize: {e}"))
}
