//! The [`Recombobulator`]: diff and patch over canonicalized documents.

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::config::Collections;
use crate::document::Document;
use crate::json_patch::{apply_patch, Patch, PatchError};
use crate::json_patch_diff::diff;

/// Diffs and patches documents whose configured arrays are keyed,
/// order-independent collections.
///
/// ```
/// use recombobulator::{Collections, Document, Recombobulator};
/// use serde_json::json;
///
/// let r = Recombobulator::new(Collections::new().with_key("b", "id"));
/// let old = Document::from(json!({"b": [{"id": 1}, {"id": 2}]}));
/// let new = Document::from(json!({"b": [{"id": 2}, {"id": 1}]}));
/// assert!(r.compare(&old, &new).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recombobulator {
    collections: Collections,
}

/// Options for [`Recombobulator::apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions<'a> {
    /// Document the changes are applied to. Defaults to `user_old`.
    pub db: Option<&'a Document>,
    /// Operations whose path matches are dropped before applying.
    pub ignore: Option<&'a Regex>,
}

impl<'a> ApplyOptions<'a> {
    pub fn with_db(mut self, db: &'a Document) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_ignore(mut self, ignore: &'a Regex) -> Self {
        self.ignore = Some(ignore);
        self
    }
}

impl From<Collections> for Recombobulator {
    fn from(collections: Collections) -> Self {
        Self::new(collections)
    }
}

impl Recombobulator {
    pub fn new(collections: Collections) -> Self {
        Self { collections }
    }

    pub fn collections(&self) -> &Collections {
        &self.collections
    }

    /// Patch turning the canonical form of `old` into that of `new`.
    ///
    /// Reordering a keyed collection produces no operations; paths into a
    /// keyed collection use the element's key instead of its index.
    pub fn compare(&self, old: &Document, new: &Document) -> Patch {
        let patch = diff(&self.flatten(old), &self.flatten(new));
        debug!(ops = patch.len(), "compared documents");
        patch
    }

    /// [`compare`](Self::compare) without the operations whose path matches
    /// `ignore`.
    pub fn changes(
        &self,
        user_old: &Document,
        user_new: &Document,
        ignore: Option<&Regex>,
    ) -> Patch {
        let mut patch = self.compare(user_old, user_new);
        if let Some(re) = ignore {
            let before = patch.len();
            patch.retain(|op| !re.is_match(op.path()));
            debug!(ignored = before - patch.len(), "filtered ignored operations");
        }
        patch
    }

    /// Applies the user's edits (`user_old` to `user_new`) to a database copy.
    ///
    /// Fields present only in the database copy survive, as long as the user
    /// did not touch them. Returns the first [`PatchError`] if an operation's
    /// parent is missing from the database copy.
    pub fn apply(
        &self,
        user_old: &Document,
        user_new: &Document,
        options: ApplyOptions<'_>,
    ) -> Result<Document, PatchError> {
        let patch = self.changes(user_old, user_new, options.ignore);
        let mut target: Value = self.flatten(options.db.unwrap_or(user_old));
        apply_patch(&mut target, &patch)?;
        debug!(ops = patch.len(), "applied changes");
        Ok(self.unflatten(target))
    }
}
