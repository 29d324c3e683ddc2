//! recombobulator: structural JSON diff and patch for documents whose arrays
//! are keyed, order-independent collections.
//!
//! Arrays configured in [`Collections`] are rewritten into objects keyed by
//! an element field before diffing, so reordering them is not a change and
//! patch paths name elements by key rather than by position. Patches are RFC
//! 6902 `add`/`remove`/`replace` operations and can be applied to a third
//! document, typically a database snapshot holding fields the user never saw.

pub mod config;
pub mod date;
pub mod document;
pub mod json_patch;
pub mod json_patch_diff;

mod flatten;
mod recombobulator;
mod remodel;
mod unflatten;

pub use config::{CollectionPath, CollectionSpec, Collections, ConfigError};
pub use document::{Document, Object};
pub use flatten::UNDEFINED_KEY;
pub use json_patch::{apply_op, apply_patch, Patch, PatchError, PatchOperation};
pub use json_patch_diff::diff;
pub use recombobulator::{ApplyOptions, Recombobulator};
