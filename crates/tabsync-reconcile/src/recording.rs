//! In-memory surface that records every call it receives.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use tabsync_types::IndexPath;

use crate::config::RowAnimation;
use crate::surface::{BatchSurface, ScopedSurface, UpdateSurface};

/// One call observed by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCall<St> {
    BeginUpdates,
    EndUpdates,
    /// `perform_batch` was entered; the batch closure runs next.
    BatchStarted,
    /// The batch closure returned.
    BatchApplied,
    InsertSections { sections: Vec<usize>, style: St },
    DeleteSections { sections: Vec<usize>, style: St },
    InsertRows { paths: Vec<IndexPath>, style: St },
    DeleteRows { paths: Vec<IndexPath>, style: St },
}

/// A surface with no visual state that logs calls in order.
///
/// Intended for tests and headless hosts. It implements both scoping
/// disciplines. Batch completions are queued rather than delivered, so the
/// host decides when "visual application" finishes via
/// [`complete_pending`](Self::complete_pending).
pub struct RecordingSurface<St = RowAnimation> {
    calls: RefCell<Vec<SurfaceCall<St>>>,
    pending: RefCell<VecDeque<Box<dyn FnOnce(bool)>>>,
}

impl<St: Clone> RecordingSurface<St> {
    /// Create a new surface with an empty call log.
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<SurfaceCall<St>> {
        self.calls.borrow().clone()
    }

    /// Return the recorded calls and clear the log.
    pub fn take_calls(&self) -> Vec<SurfaceCall<St>> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    /// Number of batch completions not yet delivered.
    pub fn pending_completions(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Deliver every queued batch completion with `finished`, oldest first.
    ///
    /// Returns the number of completions delivered.
    pub fn complete_pending(&self, finished: bool) -> usize {
        // Drain before calling out: a completion may start another batch.
        let drained: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let count = drained.len();
        for completion in drained {
            completion(finished);
        }
        count
    }

    fn record(&self, call: SurfaceCall<St>) {
        self.calls.borrow_mut().push(call);
    }
}

impl<St: Clone> Default for RecordingSurface<St> {
    fn default() -> Self {
        Self::new()
    }
}

impl<St> fmt::Debug for RecordingSurface<St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("calls", &self.calls.borrow().len())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}

impl<St: Clone> UpdateSurface for RecordingSurface<St> {
    type Style = St;

    fn insert_sections(&self, sections: &BTreeSet<usize>, style: &St) {
        self.record(SurfaceCall::InsertSections {
            sections: sections.iter().copied().collect(),
            style: style.clone(),
        });
    }

    fn delete_sections(&self, sections: &BTreeSet<usize>, style: &St) {
        self.record(SurfaceCall::DeleteSections {
            sections: sections.iter().copied().collect(),
            style: style.clone(),
        });
    }

    fn insert_rows(&self, paths: &[IndexPath], style: &St) {
        self.record(SurfaceCall::InsertRows {
            paths: paths.to_vec(),
            style: style.clone(),
        });
    }

    fn delete_rows(&self, paths: &[IndexPath], style: &St) {
        self.record(SurfaceCall::DeleteRows {
            paths: paths.to_vec(),
            style: style.clone(),
        });
    }
}

impl<St: Clone> ScopedSurface for RecordingSurface<St> {
    fn begin_updates(&self) {
        self.record(SurfaceCall::BeginUpdates);
    }

    fn end_updates(&self) {
        self.record(SurfaceCall::EndUpdates);
    }
}

impl<St: Clone> BatchSurface for RecordingSurface<St> {
    fn perform_batch<'a>(
        &self,
        updates: Box<dyn FnOnce() + 'a>,
        completion: Box<dyn FnOnce(bool)>,
    ) {
        self.record(SurfaceCall::BatchStarted);
        updates();
        self.record(SurfaceCall::BatchApplied);
        self.pending.borrow_mut().push_back(completion);
    }
}
