//! Reconcilers for tabsync.
//!
//! A reconciler owns the current snapshot of a sectioned collection and keeps
//! a presentation surface in step with it. Each [`Reconciler::update`] diffs
//! the current snapshot against the next one and, when they differ, replays
//! the edit script onto the surface inside an update scope: all deletes
//! first (old indices), then all inserts (new indices).
//!
//! The surface is held through a [`std::rc::Weak`] handle. Once it has been
//! released, updates still advance the stored snapshot but issue no surface
//! calls.
//!
//! # Key Types
//!
//! - [`ImmediateReconciler`] — Brackets replay with `begin_updates`/`end_updates`
//! - [`DeferredReconciler`] — Replays inside a surface-driven batch closure
//! - [`SingleSectionReconciler`] — Flat rows shown in one fixed section
//! - [`ReconcilerConfig`] / [`RowAnimation`] — Insertion and deletion style tokens
//! - [`UpdateSurface`], [`ScopedSurface`], [`BatchSurface`] — The surface boundary
//! - [`RecordingSurface`] — In-memory surface that records every call

pub mod config;
pub mod deferred;
pub mod immediate;
pub mod recording;
mod replay;
pub mod single_section;
pub mod source;
pub mod surface;

#[cfg(test)]
mod testing;

pub use config::{ReconcilerConfig, RowAnimation};
pub use deferred::DeferredReconciler;
pub use immediate::ImmediateReconciler;
pub use recording::{RecordingSurface, SurfaceCall};
pub use single_section::SingleSectionReconciler;
pub use source::{Reconciler, SectionedSource};
pub use surface::{BatchSurface, ScopedSurface, UpdateSurface};
pub use tabsync_types::{EditOperation, EditScript, IndexPath, SectionedCollection};
