use std::fmt;
use std::rc::{Rc, Weak};

use tabsync_diff::diff;
use tabsync_types::SectionedCollection;
use tracing::debug;

use crate::config::ReconcilerConfig;
use crate::replay::replay;
use crate::source::{Reconciler, SectionedSource};
use crate::surface::BatchSurface;

type CompletionHook = Rc<dyn Fn(bool)>;

/// Reconciler for surfaces that run their own batch closure.
///
/// The snapshot swap and the replay both happen inside the closure handed to
/// [`BatchSurface::perform_batch`], so the surface observes the new snapshot
/// and the mutations together. `update` does not wait for the batch to
/// finish animating: completion is reported later, and nothing prevents the
/// caller from issuing another update first.
pub struct DeferredReconciler<Sf: BatchSurface, S, T> {
    surface: Weak<Sf>,
    current: SectionedCollection<S, T>,
    config: ReconcilerConfig<Sf::Style>,
    on_complete: Option<CompletionHook>,
}

impl<Sf, S, T> DeferredReconciler<Sf, S, T>
where
    Sf: BatchSurface,
    S: PartialEq + Clone,
    T: PartialEq + Clone,
{
    /// Create a reconciler showing `initial` on `surface`, with default styles.
    pub fn new(surface: &Rc<Sf>, initial: SectionedCollection<S, T>) -> Self
    where
        Sf::Style: Default,
    {
        Self::with_config(surface, initial, ReconcilerConfig::default())
    }

    pub fn with_config(
        surface: &Rc<Sf>,
        initial: SectionedCollection<S, T>,
        config: ReconcilerConfig<Sf::Style>,
    ) -> Self {
        Self {
            surface: Rc::downgrade(surface),
            current: initial,
            config,
            on_complete: None,
        }
    }

    /// Observe batch completion; `hook` receives the surface's `finished`
    /// flag once per replayed batch.
    pub fn on_complete(&mut self, hook: impl Fn(bool) + 'static) {
        self.on_complete = Some(Rc::new(hook));
    }

    /// The surface, if it is still alive.
    pub fn surface(&self) -> Option<Rc<Sf>> {
        self.surface.upgrade()
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

    /// Replace the current snapshot with `next`, animating the difference.
    pub fn update(&mut self, next: SectionedCollection<S, T>) {
        let script = diff(&self.current, &next);
        if script.is_empty() {
            debug!("snapshot unchanged; skipping surface update");
            return;
        }

        let Some(surface) = self.surface.upgrade() else {
            debug!(
                operations = script.len(),
                "surface released; committing snapshot without replay"
            );
            self.current = next;
            return;
        };

        debug!(
            deletions = script.deletions(),
            insertions = script.insertions(),
            "submitting batch update"
        );

        let hook = self.on_complete.clone();
        let completion = Box::new(move |finished: bool| {
            debug!(finished, "batch update completed");
            if let Some(hook) = hook {
                hook(finished);
            }
        });

        let target: &Sf = &surface;
        let current = &mut self.current;
        let config = &self.config;
        surface.perform_batch(
            Box::new(move || {
                *current = next;
                replay(target, &script, config);
            }),
            completion,
        );
    }
}

impl<Sf: BatchSurface, S, T> SectionedSource<S, T> for DeferredReconciler<Sf, S, T> {
    fn snapshot(&self) -> &SectionedCollection<S, T> {
        &self.current
    }
}

impl<Sf, S, T> Reconciler<S, T> for DeferredReconciler<Sf, S, T>
where
    Sf: BatchSurface,
    S: PartialEq + Clone,
    T: PartialEq + Clone,
{
    fn update(&mut self, next: SectionedCollection<S, T>) {
        DeferredReconciler::update(self, next);
    }
}

impl<Sf: BatchSurface, S: fmt::Debug, T: fmt::Debug> fmt::Debug for DeferredReconciler<Sf, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredReconciler")
            .field("current", &self.current)
            .field("surface_alive", &(self.surface.strong_count() > 0))
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tabsync_types::IndexPath;

    use super::*;
    use crate::config::RowAnimation;
    use crate::recording::{RecordingSurface, SurfaceCall};
    use crate::surface::UpdateSurface;
    use crate::testing::{init_tracing, ShapeSurface};

    type Snapshot = SectionedCollection<&'static str, i32>;

    fn snapshot(entries: Vec<(&'static str, Vec<i32>)>) -> Snapshot {
        SectionedCollection::new(entries)
    }

    #[test]
    fn replay_runs_inside_batch() {
        let surface = Rc::new(RecordingSurface::<RowAnimation>::new());
        let mut reconciler =
            DeferredReconciler::new(&surface, snapshot(vec![("A", vec![1, 2, 3])]));

        reconciler.update(snapshot(vec![("A", vec![1, 3])]));

        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::BatchStarted,
                SurfaceCall::DeleteRows {
                    paths: vec![IndexPath::new(0, 1)],
                    style: RowAnimation::Automatic,
                },
                SurfaceCall::BatchApplied,
            ]
        );
        assert_eq!(reconciler.snapshot(), &snapshot(vec![("A", vec![1, 3])]));
    }

    #[test]
    fn wrapping_surface_sees_one_call_per_row() {
        // Forwards to a recorder, counting the paths of every row insert.
        struct CountingSurface {
            inner: RecordingSurface,
            seen: RefCell<Vec<usize>>,
        }
        impl UpdateSurface for CountingSurface {
            type Style = RowAnimation;
            fn insert_sections(&self, s: &std::collections::BTreeSet<usize>, st: &RowAnimation) {
                self.inner.insert_sections(s, st);
            }
            fn delete_sections(&self, s: &std::collections::BTreeSet<usize>, st: &RowAnimation) {
                self.inner.delete_sections(s, st);
            }
            fn insert_rows(&self, p: &[IndexPath], st: &RowAnimation) {
                self.seen.borrow_mut().push(p.len());
                self.inner.insert_rows(p, st);
            }
            fn delete_rows(&self, p: &[IndexPath], st: &RowAnimation) {
                self.inner.delete_rows(p, st);
            }
        }
        impl BatchSurface for CountingSurface {
            fn perform_batch<'a>(
                &self,
                updates: Box<dyn FnOnce() + 'a>,
                completion: Box<dyn FnOnce(bool)>,
            ) {
                self.inner.perform_batch(updates, completion);
            }
        }

        let surface = Rc::new(CountingSurface {
            inner: RecordingSurface::new(),
            seen: RefCell::new(Vec::new()),
        });
        let mut reconciler = DeferredReconciler::new(&surface, Snapshot::default());
        reconciler.update(snapshot(vec![("A", vec![1, 2])]));

        assert_eq!(*surface.seen.borrow(), vec![1, 1]);
        assert_eq!(reconciler.number_of_rows(0), 2);
        assert_eq!(surface.inner.pending_completions(), 1);
    }

    #[test]
    fn completion_is_asynchronous_and_forwarded() {
        let surface = Rc::new(RecordingSurface::<RowAnimation>::new());
        let mut reconciler = DeferredReconciler::new(&surface, Snapshot::default());
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&results);
        reconciler.on_complete(move |finished| sink.borrow_mut().push(finished));

        reconciler.update(snapshot(vec![("A", vec![1])]));
        reconciler.update(snapshot(vec![("A", vec![1, 2])]));

        // Both batches were submitted before either completed.
        assert!(results.borrow().is_empty());
        assert_eq!(surface.pending_completions(), 2);

        assert_eq!(surface.complete_pending(false), 2);
        assert_eq!(*results.borrow(), vec![false, false]);
    }

    #[test]
    fn unchanged_snapshot_submits_no_batch() {
        let surface = Rc::new(RecordingSurface::<RowAnimation>::new());
        let initial = snapshot(vec![("A", vec![1])]);
        let mut reconciler = DeferredReconciler::new(&surface, initial.clone());

        reconciler.update(initial);

        assert!(surface.calls().is_empty());
        assert_eq!(surface.pending_completions(), 0);
    }

    #[test]
    fn released_surface_still_advances_snapshot() {
        let surface = Rc::new(RecordingSurface::<RowAnimation>::new());
        let mut reconciler = DeferredReconciler::new(&surface, Snapshot::default());
        drop(surface);

        let next = snapshot(vec![("A", vec![1])]);
        reconciler.update(next.clone());

        assert!(reconciler.surface().is_none());
        assert_eq!(reconciler.snapshot(), &next);
    }

    #[test]
    fn surface_shape_tracks_snapshots() {
        init_tracing();
        let steps = vec![
            snapshot(vec![("A", vec![1, 2]), ("B", vec![3])]),
            snapshot(vec![("B", vec![3, 1]), ("C", vec![]), ("A", vec![2])]),
            snapshot(vec![("C", vec![5, 6, 7])]),
        ];

        let surface = Rc::new(ShapeSurface::new(&Snapshot::default()));
        let mut reconciler = DeferredReconciler::new(&surface, Snapshot::default());
        for next in steps {
            reconciler.update(next.clone());
            assert_eq!(surface.shape(), ShapeSurface::shape_of(&next));
        }
    }

    #[test]
    fn debug_output_reports_liveness() {
        let surface = Rc::new(RecordingSurface::<RowAnimation>::new());
        let reconciler = DeferredReconciler::new(&surface, snapshot(vec![("A", vec![1])]));
        let rendered = format!("{reconciler:?}");
        assert!(rendered.contains("surface_alive: true"));
    }
}
