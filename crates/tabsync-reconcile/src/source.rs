use tabsync_types::{IndexPath, SectionedCollection};

/// Read access to the snapshot currently shown on a surface.
///
/// Hosts answer the surface's data-source queries from here, so that what
/// the surface asks about always matches what the last replay described.
pub trait SectionedSource<S, T> {
    /// The snapshot the surface is (or is about to be) showing.
    fn snapshot(&self) -> &SectionedCollection<S, T>;

    fn number_of_sections(&self) -> usize {
        self.snapshot().section_count()
    }

    fn section_key<'a>(&'a self, section: usize) -> Option<&'a S>
    where
        T: 'a,
    {
        self.snapshot().section_key(section)
    }

    /// Row count of `section`; zero for a section that does not exist.
    fn number_of_rows(&self, section: usize) -> usize {
        self.snapshot().row_count(section).unwrap_or(0)
    }

    fn value_at<'a>(&'a self, path: IndexPath) -> Option<&'a T>
    where
        S: 'a,
    {
        self.snapshot().value(path)
    }
}

/// Common interface of the reconciler strategies.
///
/// Callers must serialize calls to `update`; reconcilers do no locking.
pub trait Reconciler<S, T>: SectionedSource<S, T> {
    /// Replace the current snapshot with `next`, animating the difference.
    fn update(&mut self, next: SectionedCollection<S, T>);
}
