//! Per-path collection configuration.
//!
//! Configuration maps a dotted path from the document root (for example
//! `collection.nestedCollection`) to a [`CollectionSpec`]. Paths match by
//! exact equality of their segments; array indices never appear in a path,
//! so every element of an array shares the array's own path.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid collection configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A dotted path split into field-name segments. The root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(Vec<String>);

impl CollectionPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Splits `dotted` on `.`; `""` parses to the root.
    pub fn parse(dotted: &str) -> Self {
        if dotted.is_empty() {
            return Self::root();
        }
        Self(dotted.split('.').map(str::to_owned).collect())
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[String]> for CollectionPath {
    fn borrow(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for CollectionPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<Vec<String>> for CollectionPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// What is known about the values found at one path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSpec {
    /// Field whose value identifies an element of the array at this path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Scalars at this path are restored to dates by `remodel_dates`.
    ///
    /// Deserializes from a boolean, a number (non-zero is `true`) or the
    /// strings `"true"`, `"false"` and `""`. The string `"false"` reads as
    /// `false`; any other string is rejected rather than taken as truthy.
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "is_false")]
    pub is_date: bool,
}

impl CollectionSpec {
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            is_date: false,
        }
    }

    pub fn date() -> Self {
        Self {
            key: None,
            is_date: true,
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Accepts booleans, integers and the strings `"true"`/`"false"`/`""`.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct TruthyVisitor;

    impl Visitor<'_> for TruthyVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, an integer or the string \"true\"/\"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }

    deserializer.deserialize_any(TruthyVisitor)
}

/// The immutable configuration of a [`Recombobulator`](crate::Recombobulator).
///
/// ```
/// use recombobulator::Collections;
///
/// let collections = Collections::new()
///     .with_key("collection", "collectionId")
///     .with_key("collection.nestedCollection", "id")
///     .with_date("collection.createdAt");
/// assert_eq!(collections.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    specs: HashMap<CollectionPath, CollectionSpec>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spec at `path`, replacing any previous one.
    pub fn with(mut self, path: impl Into<CollectionPath>, spec: CollectionSpec) -> Self {
        self.specs.insert(path.into(), spec);
        self
    }

    /// Marks the array at `path` as a collection keyed by `key`.
    pub fn with_key(mut self, path: impl Into<CollectionPath>, key: impl Into<String>) -> Self {
        self.specs.entry(path.into()).or_default().key = Some(key.into());
        self
    }

    /// Marks scalars at `path` as dates.
    pub fn with_date(mut self, path: impl Into<CollectionPath>) -> Self {
        self.specs.entry(path.into()).or_default().is_date = true;
        self
    }

    /// Reads the `{ "<dotted.path>": { "key": ..., "isDate": ... } }` form.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, path: &[String]) -> Option<&CollectionSpec> {
        self.specs.get(path)
    }

    /// The key field configured at `path`. An empty key counts as unset.
    pub fn key_at(&self, path: &[String]) -> Option<&str> {
        self.get(path)
            .and_then(|spec| spec.key.as_deref())
            .filter(|key| !key.is_empty())
    }

    pub fn is_date_at(&self, path: &[String]) -> bool {
        self.get(path).is_some_and(|spec| spec.is_date)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CollectionPath, &CollectionSpec)> {
        self.specs.iter()
    }
}

impl<P: Into<CollectionPath>> FromIterator<(P, CollectionSpec)> for Collections {
    fn from_iter<I: IntoIterator<Item = (P, CollectionSpec)>>(iter: I) -> Self {
        Self {
            specs: iter.into_iter().map(|(p, spec)| (p.into(), spec)).collect(),
        }
    }
}

impl Serialize for Collections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<_> = self.specs.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        serializer.collect_map(entries.into_iter().map(|(path, spec)| (path.to_string(), spec)))
    }
}

impl<'de> Deserialize<'de> for Collections {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, CollectionSpec>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(path, spec)| (CollectionPath::parse(&path), spec))
            .collect())
    }
}
