//! Sectioned snapshots.
//!
//! A [`SectionedCollection`] is an ordered sequence of `(section key, rows)`
//! entries. Snapshots are immutable: an update always builds a new value and
//! replaces the old one wholesale.

use std::cmp::Ordering;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::index_path::IndexPath;

/// An immutable, ordered collection of sections, each holding ordered rows.
///
/// Section order and row order are significant. Duplicate section keys and
/// duplicate row values are kept as-is; nothing is deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionedCollection<S, T> {
    entries: Vec<(S, Vec<T>)>,
}

impl<S, T> SectionedCollection<S, T> {
    /// Build a snapshot from ordered `(key, rows)` pairs.
    pub fn new(entries: Vec<(S, Vec<T>)>) -> Self {
        Self { entries }
    }

    /// A snapshot with no sections.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Group flat values into sections.
    ///
    /// Each value is assigned to the section returned by `section_of`. Values
    /// that map to equal keys share a section. Sections are then stably
    /// sorted with `section_order`, and the rows of every section with
    /// `row_order`.
    pub fn grouped<I, F, SO, RO>(
        values: I,
        mut section_of: F,
        mut section_order: SO,
        mut row_order: RO,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> S,
        SO: FnMut(&S, &S) -> Ordering,
        RO: FnMut(&T, &T) -> Ordering,
        S: PartialEq,
    {
        let mut entries: Vec<(S, Vec<T>)> = Vec::new();
        for value in values {
            let key = section_of(&value);
            match entries.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, rows)) => rows.push(value),
                None => entries.push((key, vec![value])),
            }
        }

        entries.sort_by(|(a, _), (b, _)| section_order(a, b));
        for (_, rows) in &mut entries {
            rows.sort_by(&mut row_order);
        }

        Self { entries }
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows in `section`, or `None` if the section does not exist.
    pub fn row_count(&self, section: usize) -> Option<usize> {
        self.entries.get(section).map(|(_, rows)| rows.len())
    }

    /// Total number of rows across all sections.
    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(|(_, rows)| rows.len()).sum()
    }

    /// The key and rows of `section`.
    pub fn section(&self, section: usize) -> Option<(&S, &[T])> {
        self.entries
            .get(section)
            .map(|(key, rows)| (key, rows.as_slice()))
    }

    /// The key of `section`.
    pub fn section_key(&self, section: usize) -> Option<&S> {
        self.entries.get(section).map(|(key, _)| key)
    }

    /// The rows of `section`.
    pub fn rows(&self, section: usize) -> Option<&[T]> {
        self.entries.get(section).map(|(_, rows)| rows.as_slice())
    }

    /// The row value at `path`.
    pub fn value(&self, path: IndexPath) -> Option<&T> {
        self.entries
            .get(path.section)
            .and_then(|(_, rows)| rows.get(path.row))
    }

    /// Iterate over section keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &S> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterate over `(key, rows)` entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, &[T])> + '_ {
        self.entries
            .iter()
            .map(|(key, rows)| (key, rows.as_slice()))
    }

    /// Borrow the raw entries.
    pub fn entries(&self) -> &[(S, Vec<T>)] {
        &self.entries
    }

    /// Consume the snapshot, returning its entries.
    pub fn into_entries(self) -> Vec<(S, Vec<T>)> {
        self.entries
    }
}

impl<S, T> Default for SectionedCollection<S, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S, T> From<Vec<(S, Vec<T>)>> for SectionedCollection<S, T> {
    fn from(entries: Vec<(S, Vec<T>)>) -> Self {
        Self::new(entries)
    }
}

impl<S, T> FromIterator<(S, Vec<T>)> for SectionedCollection<S, T> {
    fn from_iter<I: IntoIterator<Item = (S, Vec<T>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Panics if `section` is out of range.
impl<S, T> Index<usize> for SectionedCollection<S, T> {
    type Output = [T];

    fn index(&self, section: usize) -> &[T] {
        &self.entries[section].1
    }
}

/// Panics if `path` is out of range.
impl<S, T> Index<IndexPath> for SectionedCollection<S, T> {
    type Output = T;

    fn index(&self, path: IndexPath) -> &T {
        &self.entries[path.section].1[path.row]
    }
}
