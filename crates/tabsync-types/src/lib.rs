//! Foundation types for tabsync.
//!
//! This crate provides the snapshot and edit-script types shared by the diff
//! engine and the reconcilers. Every other tabsync crate depends on
//! `tabsync-types`.
//!
//! # Key Types
//!
//! - [`SectionedCollection`] — Immutable snapshot: ordered sections, each with ordered rows
//! - [`IndexPath`] — A `(section, row)` position inside a snapshot
//! - [`EditOperation`] — One section- or row-level insertion or deletion
//! - [`EditScript`] — Ordered operations transforming one snapshot into another

pub mod collection;
pub mod error;
pub mod index_path;
pub mod script;

pub use collection::SectionedCollection;
pub use error::{ApplyError, ApplyResult};
pub use index_path::IndexPath;
pub use script::{EditOperation, EditScript};
