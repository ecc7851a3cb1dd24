//! Test surface that enforces batch index semantics.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use tabsync_types::{IndexPath, SectionedCollection};

use crate::config::RowAnimation;
use crate::surface::{BatchSurface, ScopedSurface, UpdateSurface};

/// Route reconciler logs to the test harness; safe to call more than once.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct PendingBatch {
    deleted_sections: BTreeSet<usize>,
    deleted_rows: BTreeSet<IndexPath>,
    inserted_sections: BTreeSet<usize>,
    inserted_rows: BTreeSet<IndexPath>,
}

/// Tracks only the row count of every section, and applies each batch the
/// way a table surface does: deletes against the pre-batch layout, inserts
/// against the post-batch layout. Panics on any index that does not fit.
pub(crate) struct ShapeSurface {
    shape: RefCell<Vec<usize>>,
    pending: RefCell<PendingBatch>,
    depth: Cell<usize>,
}

impl ShapeSurface {
    pub(crate) fn new<S, T>(initial: &SectionedCollection<S, T>) -> Self {
        Self {
            shape: RefCell::new(Self::shape_of(initial)),
            pending: RefCell::new(PendingBatch::default()),
            depth: Cell::new(0),
        }
    }

    pub(crate) fn shape_of<S, T>(snapshot: &SectionedCollection<S, T>) -> Vec<usize> {
        snapshot.iter().map(|(_, rows)| rows.len()).collect()
    }

    pub(crate) fn shape(&self) -> Vec<usize> {
        self.shape.borrow().clone()
    }

    pub(crate) fn open_scopes(&self) -> usize {
        self.depth.get()
    }

    fn commit(&self) {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let old = self.shape();

        for &section in &batch.deleted_sections {
            assert!(section < old.len(), "section delete {section} out of range");
        }
        for path in &batch.deleted_rows {
            assert!(
                path.section < old.len() && path.row < old[path.section],
                "row delete {path} out of range"
            );
        }

        let mut shape: Vec<usize> = old
            .iter()
            .enumerate()
            .filter(|(section, _)| !batch.deleted_sections.contains(section))
            .map(|(section, &rows)| {
                rows - batch
                    .deleted_rows
                    .iter()
                    .filter(|path| path.section == section)
                    .count()
            })
            .collect();

        for &section in &batch.inserted_sections {
            assert!(section <= shape.len(), "section insert {section} out of range");
            shape.insert(section, 0);
        }
        for path in &batch.inserted_rows {
            assert!(
                path.section < shape.len() && path.row <= shape[path.section],
                "row insert {path} out of range"
            );
            shape[path.section] += 1;
        }

        *self.shape.borrow_mut() = shape;
    }

    fn assert_in_scope(&self) {
        assert!(self.depth.get() > 0, "mutation issued outside an update scope");
    }
}

impl UpdateSurface for ShapeSurface {
    type Style = RowAnimation;

    fn insert_sections(&self, sections: &BTreeSet<usize>, _style: &RowAnimation) {
        self.assert_in_scope();
        self.pending.borrow_mut().inserted_sections.extend(sections);
    }

    fn delete_sections(&self, sections: &BTreeSet<usize>, _style: &RowAnimation) {
        self.assert_in_scope();
        self.pending.borrow_mut().deleted_sections.extend(sections);
    }

    fn insert_rows(&self, paths: &[IndexPath], _style: &RowAnimation) {
        self.assert_in_scope();
        self.pending.borrow_mut().inserted_rows.extend(paths);
    }

    fn delete_rows(&self, paths: &[IndexPath], _style: &RowAnimation) {
        self.assert_in_scope();
        self.pending.borrow_mut().deleted_rows.extend(paths);
    }
}

impl ScopedSurface for ShapeSurface {
    fn begin_updates(&self) {
        self.depth.set(self.depth.get() + 1);
    }

    fn end_updates(&self) {
        let depth = self.depth.get();
        assert!(depth > 0, "end_updates without begin_updates");
        self.depth.set(depth - 1);
        if depth == 1 {
            self.commit();
        }
    }
}

/// Completes synchronously with `true`.
impl BatchSurface for ShapeSurface {
    fn perform_batch<'a>(
        &self,
        updates: Box<dyn FnOnce() + 'a>,
        completion: Box<dyn FnOnce(bool)>,
    ) {
        self.begin_updates();
        updates();
        self.end_updates();
        completion(true);
    }
}
