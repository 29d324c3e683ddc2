//! De-canonicalization: objects at keyed paths turn back into arrays.
//!
//! ```text
//! cats: { "3000": { birthDate: "3000" } }
//! ```
//!
//! becomes
//!
//! ```text
//! cats: [{ birthDate: "3000" }]
//! ```
//!
//! Elements come out in the canonical object's key order. The original array
//! order was discarded by [`Recombobulator::flatten`] and cannot be restored.

use serde_json::Value;

use crate::config::CollectionPath;
use crate::document::Document;
use crate::Recombobulator;

impl Recombobulator {
    /// Restores nested arrays throughout a canonical document.
    pub fn unflatten(&self, doc: Value) -> Document {
        self.unflatten_at(doc, &CollectionPath::root())
    }

    /// Restores nested arrays in `doc`, found at `parent`.
    pub fn unflatten_at(&self, doc: Value, parent: &CollectionPath) -> Document {
        let mut path = parent.segments().to_vec();
        self.unflatten_value(doc, &mut path)
    }

    fn unflatten_value(&self, doc: Value, path: &mut Vec<String>) -> Document {
        match doc {
            Value::Object(entries) if self.collections().key_at(path).is_some() => Document::Array(
                entries
                    .into_iter()
                    .map(|(_, element)| self.unflatten_members(element, path))
                    .collect(),
            ),
            other => self.unflatten_members(other, path),
        }
    }

    // An element shares its collection's path; only its properties extend it.
    fn unflatten_members(&self, doc: Value, path: &mut Vec<String>) -> Document {
        match doc {
            Value::Array(items) => Document::Array(
                items
                    .into_iter()
                    .map(|item| self.unflatten_members(item, path))
                    .collect(),
            ),
            Value::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(name, value)| {
                        path.push(name);
                        let restored = self.unflatten_value(value, path);
                        let name = path.pop().unwrap_or_default();
                        (name, restored)
                    })
                    .collect(),
            ),
            scalar => Document::from(scalar),
        }
    }
}
