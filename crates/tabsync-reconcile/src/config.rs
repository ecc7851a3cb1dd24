use serde::{Deserialize, Serialize};

/// Animation hint for inserted or deleted sections and rows.
///
/// Reconcilers never interpret the style; it is handed to the surface as-is.
/// Surfaces that want a different vocabulary can use any `Clone` type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAnimation {
    /// Let the surface pick.
    #[default]
    Automatic,
    Fade,
    Top,
    Bottom,
    Left,
    Right,
    Middle,
    /// Apply without animating.
    None,
}

/// Style tokens a reconciler passes to its surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig<St> {
    /// Style used for section and row insertions.
    pub insertion_style: St,
    /// Style used for section and row deletions.
    pub deletion_style: St,
}

impl<St> ReconcilerConfig<St> {
    pub fn new(insertion_style: St, deletion_style: St) -> Self {
        Self {
            insertion_style,
            deletion_style,
        }
    }

    /// Same style for insertions and deletions.
    pub fn uniform(style: St) -> Self
    where
        St: Clone,
    {
        Self {
            insertion_style: style.clone(),
            deletion_style: style,
        }
    }

    pub fn with_insertion_style(mut self, style: St) -> Self {
        self.insertion_style = style;
        self
    }

    pub fn with_deletion_style(mut self, style: St) -> Self {
        self.deletion_style = style;
        self
    }
}
