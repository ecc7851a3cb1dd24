use std::rc::{Rc, Weak};

use tabsync_diff::{diff_sequence, SequenceStep};
use tabsync_types::IndexPath;
use tracing::{debug, trace};

use crate::config::ReconcilerConfig;
use crate::surface::ScopedSurface;

/// Reconciler for a flat row sequence shown in one section of a scoped surface.
///
/// Only the rows of `section` are touched; any other sections on the surface
/// are left to the host. Scoping, the no-op fast path and the
/// released-surface policy are those of [`ImmediateReconciler`].
///
/// [`ImmediateReconciler`]: crate::ImmediateReconciler
pub struct SingleSectionReconciler<Sf: ScopedSurface, T> {
    surface: Weak<Sf>,
    section: usize,
    rows: Vec<T>,
    config: ReconcilerConfig<Sf::Style>,
}

impl<Sf, T> SingleSectionReconciler<Sf, T>
where
    Sf: ScopedSurface,
    T: PartialEq + Clone,
{
    /// Create a reconciler for `section` of `surface`, which already shows `initial`.
    pub fn new(surface: &Rc<Sf>, section: usize, initial: Vec<T>) -> Self
    where
        Sf::Style: Default,
    {
        Self::with_config(surface, section, initial, ReconcilerConfig::default())
    }

    pub fn with_config(
        surface: &Rc<Sf>,
        section: usize,
        initial: Vec<T>,
        config: ReconcilerConfig<Sf::Style>,
    ) -> Self {
        Self {
            surface: Rc::downgrade(surface),
            section,
            rows: initial,
            config,
        }
    }

    /// The section index the rows are shown in.
    pub fn section(&self) -> usize {
        self.section
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn number_of_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn value_at(&self, row: usize) -> Option<&T> {
        self.rows.get(row)
    }

    pub fn config(&self) -> &ReconcilerConfig<Sf::Style> {
        &self.config
    }

    pub fn set_insertion_style(&mut self, style: Sf::Style) {
        self.config.insertion_style = style;
    }

    pub fn set_deletion_style(&mut self, style: Sf::Style) {
        self.config.deletion_style = style;
    }

    /// Replace the rows with `next`, animating the difference.
    pub fn update(&mut self, next: Vec<T>) {
        let steps = diff_sequence(&self.rows, &next);
        if steps.is_empty() {
            debug!(section = self.section, "rows unchanged; skipping surface update");
            return;
        }

        let Some(surface) = self.surface.upgrade() else {
            debug!(
                section = self.section,
                steps = steps.len(),
                "surface released; committing rows without replay"
            );
            self.rows = next;
            return;
        };

        debug!(section = self.section, steps = steps.len(), "reconciling section");
        surface.begin_updates();
        self.rows = next;
        // diff_sequence already orders deletes before inserts.
        for step in &steps {
            let path = IndexPath::new(self.section, step.index());
            trace!(%path, delete = step.is_delete(), "replaying step");
            match step {
                SequenceStep::Delete { .. } => {
                    surface.delete_rows(&[path], &self.config.deletion_style)
                }
                SequenceStep::Insert { .. } => {
                    surface.insert_rows(&[path], &self.config.insertion_style)
                }
            }
        }
        surface.end_updates();
    }
}
