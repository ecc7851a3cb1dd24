//! Edit scripts: ordered section- and row-level insertions and deletions.
//!
//! Delete operations always carry indices into the *old* snapshot, insert
//! operations indices into the *new* snapshot. A script is produced fresh by
//! a diff and consumed once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::SectionedCollection;
use crate::error::{ApplyError, ApplyResult};
use crate::index_path::IndexPath;

/// A single step of an edit script.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation<S, T> {
    /// Insert an (initially empty) section at `section` in the new snapshot.
    SectionInsert { section: usize, key: S },
    /// Delete the section at `section` in the old snapshot, rows included.
    SectionDelete { section: usize, key: S },
    /// Insert `value` at `row` of the new snapshot's `section`.
    RowInsert {
        section: usize,
        row: usize,
        value: T,
    },
    /// Delete `value` from `row` of the old snapshot's `section`.
    RowDelete {
        section: usize,
        row: usize,
        value: T,
    },
}

impl<S, T> EditOperation<S, T> {
    /// Returns `true` for deletions, whose indices refer to the old snapshot.
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::SectionDelete { .. } | Self::RowDelete { .. })
    }

    /// Returns `true` for insertions, whose indices refer to the new snapshot.
    pub fn is_insert(&self) -> bool {
        !self.is_delete()
    }

    /// Returns `true` for section-level operations.
    pub fn is_section_operation(&self) -> bool {
        matches!(self, Self::SectionInsert { .. } | Self::SectionDelete { .. })
    }

    /// The section index this operation refers to.
    pub fn section(&self) -> usize {
        match self {
            Self::SectionInsert { section, .. }
            | Self::SectionDelete { section, .. }
            | Self::RowInsert { section, .. }
            | Self::RowDelete { section, .. } => *section,
        }
    }

    /// The row position for row-level operations.
    pub fn index_path(&self) -> Option<IndexPath> {
        match self {
            Self::RowInsert { section, row, .. } | Self::RowDelete { section, row, .. } => {
                Some(IndexPath::new(*section, *row))
            }
            _ => None,
        }
    }

    /// Short machine-friendly name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SectionInsert { .. } => "section_insert",
            Self::SectionDelete { .. } => "section_delete",
            Self::RowInsert { .. } => "row_insert",
            Self::RowDelete { .. } => "row_delete",
        }
    }
}

impl<S: fmt::Display, T: fmt::Display> fmt::Display for EditOperation<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionInsert { section, key } => write!(f, "+section {section} ({key})"),
            Self::SectionDelete { section, key } => write!(f, "-section {section} ({key})"),
            Self::RowInsert {
                section,
                row,
                value,
            } => write!(f, "+row [{section}, {row}] ({value})"),
            Self::RowDelete {
                section,
                row,
                value,
            } => write!(f, "-row [{section}, {row}] ({value})"),
        }
    }
}

/// An ordered sequence of [`EditOperation`]s.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript<S, T> {
    operations: Vec<EditOperation<S, T>>,
}

impl<S, T> EditScript<S, T> {
    /// Create an empty script.
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Returns `true` if the script contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Number of delete operations (section and row).
    pub fn deletions(&self) -> usize {
        self.operations.iter().filter(|op| op.is_delete()).count()
    }

    /// Number of insert operations (section and row).
    pub fn insertions(&self) -> usize {
        self.operations.iter().filter(|op| op.is_insert()).count()
    }

    /// Number of section-level operations.
    pub fn section_operations(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| op.is_section_operation())
            .count()
    }

    /// Borrow the operations in order.
    pub fn operations(&self) -> &[EditOperation<S, T>] {
        &self.operations
    }

    /// Iterate over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, EditOperation<S, T>> {
        self.operations.iter()
    }

    /// Apply this script to `old`, producing the snapshot it was diffed against.
    ///
    /// Deletions are resolved against `old` and checked for the key or value
    /// they claim to remove. Insertions are then applied in ascending
    /// new-snapshot order: sections first (empty), rows second. Fails if the
    /// script was not computed from `old`.
    pub fn apply_to(
        &self,
        old: &SectionedCollection<S, T>,
    ) -> ApplyResult<SectionedCollection<S, T>>
    where
        S: Clone + PartialEq,
        T: Clone + PartialEq,
    {
        // Tombstone pass: every delete is validated against the untouched
        // old layout, so application order among deletes does not matter.
        let mut sections: Vec<Option<(S, Vec<Option<T>>)>> = old
            .iter()
            .map(|(key, rows)| Some((key.clone(), rows.iter().cloned().map(Some).collect())))
            .collect();
        let count = sections.len();

        for op in self.operations.iter().filter(|op| op.is_delete()) {
            match op {
                EditOperation::SectionDelete { section, key } => {
                    let slot = sections.get_mut(*section).ok_or(ApplyError::SectionOutOfRange {
                        index: *section,
                        count,
                    })?;
                    match old.section_key(*section) {
                        Some(existing) if existing == key => {}
                        _ => return Err(ApplyError::SectionKeyMismatch { index: *section }),
                    }
                    if slot.take().is_none() {
                        return Err(ApplyError::DuplicateSectionDelete { index: *section });
                    }
                }
                EditOperation::RowDelete {
                    section,
                    row,
                    value,
                } => {
                    let path = IndexPath::new(*section, *row);
                    let rows = old.rows(*section).ok_or(ApplyError::SectionOutOfRange {
                        index: *section,
                        count,
                    })?;
                    match rows.get(*row) {
                        Some(existing) if existing == value => {}
                        Some(_) => return Err(ApplyError::RowValueMismatch { path }),
                        None => {
                            return Err(ApplyError::RowOutOfRange {
                                section: *section,
                                row: *row,
                                count: rows.len(),
                            })
                        }
                    }
                    // A row inside a section deleted as a whole is already gone.
                    if let Some((_, slots)) = sections[*section].as_mut() {
                        if slots[*row].take().is_none() {
                            return Err(ApplyError::DuplicateRowDelete { path });
                        }
                    }
                }
                _ => {}
            }
        }

        let mut entries: Vec<(S, Vec<T>)> = sections
            .into_iter()
            .flatten()
            .map(|(key, rows)| (key, rows.into_iter().flatten().collect()))
            .collect();

        let mut section_inserts: Vec<(usize, &S)> = Vec::new();
        let mut row_inserts: Vec<(IndexPath, &T)> = Vec::new();
        for op in &self.operations {
            match op {
                EditOperation::SectionInsert { section, key } => {
                    section_inserts.push((*section, key))
                }
                EditOperation::RowInsert {
                    section,
                    row,
                    value,
                } => row_inserts.push((IndexPath::new(*section, *row), value)),
                _ => {}
            }
        }
        section_inserts.sort_by_key(|(index, _)| *index);
        row_inserts.sort_by_key(|(path, _)| *path);

        for (index, key) in section_inserts {
            if index > entries.len() {
                return Err(ApplyError::SectionOutOfRange {
                    index,
                    count: entries.len(),
                });
            }
            entries.insert(index, (key.clone(), Vec::new()));
        }

        for (path, value) in row_inserts {
            let count = entries.len();
            let (_, rows) = entries
                .get_mut(path.section)
                .ok_or(ApplyError::SectionOutOfRange {
                    index: path.section,
                    count,
                })?;
            if path.row > rows.len() {
                return Err(ApplyError::RowOutOfRange {
                    section: path.section,
                    row: path.row,
                    count: rows.len(),
                });
            }
            rows.insert(path.row, value.clone());
        }

        Ok(SectionedCollection::new(entries))
    }
}

impl<S, T> Default for EditScript<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> From<Vec<EditOperation<S, T>>> for EditScript<S, T> {
    fn from(operations: Vec<EditOperation<S, T>>) -> Self {
        Self { operations }
    }
}

impl<S, T> IntoIterator for EditScript<S, T> {
    type Item = EditOperation<S, T>;
    type IntoIter = std::vec::IntoIter<EditOperation<S, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a, S, T> IntoIterator for &'a EditScript<S, T> {
    type Item = &'a EditOperation<S, T>;
    type IntoIter = std::slice::Iter<'a, EditOperation<S, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
