use std::collections::BTreeSet;

use tabsync_types::IndexPath;

/// Structural mutations a presentation surface accepts.
///
/// Section sets and row paths passed to `delete_*` refer to the layout
/// before the enclosing scope; those passed to `insert_*` refer to the layout
/// after it. Surfaces defer visual mutation until the scope closes, which is
/// what makes this mixed indexing safe.
///
/// Methods take `&self`: surfaces are shared through `Rc` and use interior
/// mutability, so a surface can call back into a batch closure that issues
/// further mutations.
pub trait UpdateSurface {
    /// Opaque animation hint handed through from the reconciler config.
    type Style;

    fn insert_sections(&self, sections: &BTreeSet<usize>, style: &Self::Style);

    fn delete_sections(&self, sections: &BTreeSet<usize>, style: &Self::Style);

    fn insert_rows(&self, paths: &[IndexPath], style: &Self::Style);

    fn delete_rows(&self, paths: &[IndexPath], style: &Self::Style);
}

/// A surface with a synchronous begin/end update scope.
///
/// Every `begin_updates` is paired with exactly one `end_updates`. Mutations
/// issued in between are applied as a single batch when the scope closes.
pub trait ScopedSurface: UpdateSurface {
    fn begin_updates(&self);

    fn end_updates(&self);
}

/// A surface whose update scope is a closure it runs itself.
pub trait BatchSurface: UpdateSurface {
    /// Run `updates` as one batch and report completion later.
    ///
    /// Implementations must call `updates` exactly once, before returning.
    /// The closure may borrow from the caller's stack, so it cannot be kept
    /// past this call. `completion` receives `true` if the batch finished
    /// its visual application and may be called at any later time.
    fn perform_batch<'a>(&self, updates: Box<dyn FnOnce() + 'a>, completion: Box<dyn FnOnce(bool)>);
}
