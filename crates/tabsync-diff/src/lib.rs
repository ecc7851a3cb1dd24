//! Diff engine for tabsync.
//!
//! Computes minimal (longest-common-subsequence based) edit scripts between
//! snapshots. Diffing is total and deterministic: the same pair of inputs
//! always yields the same script, and the script is empty exactly when the
//! inputs are equal.
//!
//! # Key Types
//!
//! - [`diff`] -- Two-level sectioned diff producing an [`EditScript`]
//! - [`diff_sequence`] / [`SequenceStep`] -- Flat sequence diff
//!
//! [`EditScript`]: tabsync_types::EditScript

pub mod sectioned;
pub mod sequence;

pub use sectioned::diff;
pub use sequence::{apply_steps, diff_sequence, SequenceStep};
