use std::rc::{Rc, Weak};

use tabsync_diff::diff;
use tabsync_types::SectionedCollection;
use tracing::debug;

use crate::config::ReconcilerConfig;
use crate::replay::replay;
use crate::source::{Reconciler, SectionedSource};
use crate::surface::ScopedSurface;

/// Reconciler for surfaces with a synchronous begin/end update scope.
///
/// On a non-empty diff it opens the scope, swaps in the new snapshot,
/// replays the edit script and closes the scope, all before `update`
/// returns.
pub struct ImmediateReconciler<Sf: ScopedSurface, S, T> {
    surface: Weak<Sf>,
    current: SectionedCollection<S, T>,
    config: ReconcilerConfig<Sf::Style>,
}

impl<Sf, S, T> ImmediateReconciler<Sf, S, T>
where
    Sf: ScopedSurface,
    S: PartialEq + Clone,
    T: PartialEq + Clone,
{
    /// Create a reconciler showing `initial` on `surface`, with default styles.
    ///
    /// The surface is expected to already display `initial`.
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
        }
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
            "reconciling surface"
        );
        surface.begin_updates();
        self.current = next;
        replay(&*surface, &script, &self.config);
        surface.end_updates();
    }
}

impl<Sf: ScopedSurface, S, T> SectionedSource<S, T> for ImmediateReconciler<Sf, S, T> {
    fn snapshot(&self) -> &SectionedCollection<S, T> {
        &self.current
    }
}

impl<Sf, S, T> Reconciler<S, T> for ImmediateReconciler<Sf, S, T>
where
    Sf: ScopedSurface,
    S: PartialEq + Clone,
    T: PartialEq + Clone,
{
    fn update(&mut self, next: SectionedCollection<S, T>) {
        ImmediateReconciler::update(self, next);
    }
}
