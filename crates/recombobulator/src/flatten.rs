//! Canonicalization: keyed arrays become objects keyed by element identity.
//!
//! ```text
//! collection: [{ collectionId: "xxx-yyy-zzz" }]
//! ```
//!
//! becomes
//!
//! ```text
//! collection: { "xxx-yyy-zzz": { collectionId: "xxx-yyy-zzz" } }
//! ```
//!
//! Every date is written as an ISO-8601 string on the way, so two documents
//! holding the same instant never differ structurally.

use serde_json::{Map, Number, Value};

use crate::config::CollectionPath;
use crate::date::to_iso_string;
use crate::document::Document;
use crate::Recombobulator;

/// Key used for elements that lack the configured key field.
pub const UNDEFINED_KEY: &str = "undefined";

impl Recombobulator {
    /// Canonicalizes a whole document.
    pub fn flatten(&self, doc: &Document) -> Value {
        self.flatten_at(doc, &CollectionPath::root())
    }

    /// Canonicalizes `doc` as if it were found at `location`.
    pub fn flatten_at(&self, doc: &Document, location: &CollectionPath) -> Value {
        let mut path = location.segments().to_vec();
        self.flatten_value(doc, &mut path)
    }

    fn flatten_value(&self, doc: &Document, path: &mut Vec<String>) -> Value {
        match doc {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(*b),
            Document::Number(n) => Value::Number(n.clone()),
            Document::String(s) => Value::String(s.clone()),
            Document::Date(d) => Value::String(to_iso_string(d)),
            Document::Array(items) => match self.collections().key_at(path) {
                Some(key) => Value::Object(self.flatten_collection(items, key, path)),
                None => Value::Array(
                    items
                        .iter()
                        .map(|item| self.flatten_value(item, path))
                        .collect(),
                ),
            },
            Document::Object(map) => {
                let mut out = Map::new();
                for (name, value) in map {
                    path.push(name.clone());
                    out.insert(name.clone(), self.flatten_value(value, path));
                    path.pop();
                }
                Value::Object(out)
            }
        }
    }

    // Elements keep the collection's own path. A repeated key overwrites the
    // earlier element in place.
    fn flatten_collection(
        &self,
        items: &[Document],
        key: &str,
        path: &mut Vec<String>,
    ) -> Map<String, Value> {
        let mut out = Map::new();
        for item in items {
            out.insert(element_key(item, key), self.flatten_value(item, path));
        }
        out
    }
}

fn element_key(item: &Document, key: &str) -> String {
    item.get(key).map_or_else(|| UNDEFINED_KEY.to_owned(), coerce_key)
}

/// String coercion of a key field value.
fn coerce_key(value: &Document) -> String {
    match value {
        Document::Null => "null".to_owned(),
        Document::Bool(b) => b.to_string(),
        Document::Number(n) => number_key(n),
        Document::String(s) => s.clone(),
        Document::Date(d) => to_iso_string(d),
        Document::Array(items) => items
            .iter()
            .map(|item| match item {
                Document::Null => String::new(),
                other => coerce_key(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Document::Object(_) => "[object Object]".to_owned(),
    }
}

/// Formats a number the way JavaScript's `String(n)` does: plain decimal for
/// magnitudes in `[1e-6, 1e21)`, exponent form with an explicit sign outside,
/// and no fraction for integral floats, so `9` and `9.0` share a key.
fn number_key(n: &Number) -> String {
    let Some(f) = n.as_f64().filter(|_| n.is_f64()) else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_owned();
    }
    if (1e-6..1e21).contains(&f.abs()) {
        return f.to_string();
    }
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Collections;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn key_of(value: Value) -> String {
        coerce_key(&Document::from(value))
    }

    #[test]
    fn key_coercion() {
        assert_eq!(key_of(json!("abc")), "abc");
        assert_eq!(key_of(json!(9)), "9");
        assert_eq!(key_of(json!(-3)), "-3");
        assert_eq!(key_of(json!(10.0)), "10");
        assert_eq!(key_of(json!(-0.0)), "0");
        assert_eq!(key_of(json!(1.5)), "1.5");
        assert_eq!(key_of(json!(true)), "true");
        assert_eq!(key_of(json!(null)), "null");
        assert_eq!(key_of(json!({"a": 1})), "[object Object]");
        assert_eq!(key_of(json!([1, null, "x"])), "1,,x");
    }

    #[test]
    fn float_keys_follow_javascript_formatting() {
        assert_eq!(key_of(json!(0.000001)), "0.000001");
        assert_eq!(key_of(json!(123.456)), "123.456");
        assert_eq!(key_of(json!(-0.5)), "-0.5");
        assert_eq!(key_of(json!(1e-7)), "1e-7");
        assert_eq!(key_of(json!(1.5e-9)), "1.5e-9");
        assert_eq!(key_of(json!(1e21)), "1e+21");
        assert_eq!(key_of(json!(2.5e22)), "2.5e+22");
        assert_eq!(key_of(json!(1e20)), "100000000000000000000");
    }

    #[test]
    fn small_float_ids_key_in_plain_decimal() {
        let r = Recombobulator::new(Collections::new().with_key("c", "id"));
        let flat = r.flatten(&Document::from(json!({"c": [{"id": 0.000001}]})));
        assert_eq!(flat, json!({"c": {"0.000001": {"id": 0.000001}}}));
    }

    #[test]
    fn date_keys_use_iso_form() {
        let date = Utc.with_ymd_and_hms(2018, 8, 14, 21, 17, 42).unwrap();
        assert_eq!(coerce_key(&Document::Date(date)), "2018-08-14T21:17:42.000Z");
    }

    #[test]
    fn missing_key_field_uses_sentinel() {
        let r = Recombobulator::new(Collections::new().with_key("c", "id"));
        let flat = r.flatten(&Document::from(json!({"c": [{"name": "no id"}, "scalar"]})));
        assert_eq!(flat, json!({"c": {"undefined": "scalar"}}));
    }

    #[test]
    fn flatten_at_uses_the_given_location() {
        let r = Recombobulator::new(Collections::new().with_key("outer.items", "id"));
        let subtree = Document::from(json!([{"id": "a"}]));
        assert_eq!(
            r.flatten_at(&subtree, &CollectionPath::parse("outer.items")),
            json!({"a": {"id": "a"}})
        );
        assert_eq!(r.flatten(&subtree), json!([{"id": "a"}]));
    }

    #[test]
    fn input_is_left_untouched() {
        let r = Recombobulator::new(Collections::new().with_key("c", "id"));
        let doc = Document::from(json!({"c": [{"id": 1}]}));
        let before = doc.clone();
        let _ = r.flatten(&doc);
        assert_eq!(doc, before);
    }
}
