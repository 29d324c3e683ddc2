//! JSON Patch (RFC 6902) subset used by the recombobulator.
//!
//! # Operations
//!
//! `add`, `remove` and `replace`. The diff never synthesizes `move` or
//! `copy`, so neither is modelled.
//!
//! Application is lenient at the leaf: removing a missing key is a no-op and
//! an out-of-range array index is clamped. Only an unresolvable parent path
//! is an error. This lets a patch computed between two user documents land on
//! a database snapshot that has drifted from them.

pub mod apply;
pub mod types;

pub use apply::{apply_op, apply_patch};
pub use types::{Patch, PatchError, PatchOperation};
