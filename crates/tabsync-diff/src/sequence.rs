//! Flat sequence diff: insertions and deletions between two slices.
//!
//! Uses the `similar` crate's Myers algorithm, which finds a shortest edit
//! script and only needs `PartialEq` on the elements. Common prefixes and
//! suffixes are matched first, so equal elements pair up left to right.

use serde::{Deserialize, Serialize};
use similar::algorithms::{myers, Capture};
use similar::DiffTag;

/// A single step of a flat sequence diff.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SequenceStep<T> {
    /// Insert `value` at `index` of the new sequence.
    Insert { index: usize, value: T },
    /// Delete `value` from `index` of the old sequence.
    Delete { index: usize, value: T },
}

impl<T> SequenceStep<T> {
    /// The index this step refers to (old index for deletes, new for inserts).
    pub fn index(&self) -> usize {
        match self {
            Self::Insert { index, .. } | Self::Delete { index, .. } => *index,
        }
    }

    /// The value being inserted or deleted.
    pub fn value(&self) -> &T {
        match self {
            Self::Insert { value, .. } | Self::Delete { value, .. } => value,
        }
    }

    /// Returns `true` for deletions.
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

/// Index-level result of aligning two sequences.
#[derive(Debug, Default)]
pub(crate) struct Alignment {
    /// Old indices with no counterpart in the new sequence, ascending.
    pub deleted: Vec<usize>,
    /// New indices with no counterpart in the old sequence, ascending.
    pub inserted: Vec<usize>,
    /// `(old, new)` index pairs of kept elements, ascending.
    pub matched: Vec<(usize, usize)>,
}

/// Align `old` against `new` along a longest common subsequence.
pub(crate) fn align<T: PartialEq>(old: &[T], new: &[T]) -> Alignment {
    let mut capture = Capture::new();
    myers::diff(&mut capture, old, 0..old.len(), new, 0..new.len())
        .unwrap_or_else(|never| match never {});

    let mut alignment = Alignment::default();
    for op in capture.into_ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => alignment.matched.extend(old_range.zip(new_range)),
            DiffTag::Delete => alignment.deleted.extend(old_range),
            DiffTag::Insert => alignment.inserted.extend(new_range),
            DiffTag::Replace => {
                alignment.deleted.extend(old_range);
                alignment.inserted.extend(new_range);
            }
        }
    }

    alignment.deleted.sort_unstable();
    alignment.inserted.sort_unstable();
    alignment.matched.sort_unstable();
    alignment
}

/// Compute the minimal insert/delete steps turning `old` into `new`.
///
/// All deletions come first in ascending old index, followed by all
/// insertions in ascending new index. The result is empty iff the slices are
/// equal.
pub fn diff_sequence<T: PartialEq + Clone>(old: &[T], new: &[T]) -> Vec<SequenceStep<T>> {
    let alignment = align(old, new);

    let deletes = alignment.deleted.iter().map(|&index| SequenceStep::Delete {
        index,
        value: old[index].clone(),
    });
    let inserts = alignment.inserted.iter().map(|&index| SequenceStep::Insert {
        index,
        value: new[index].clone(),
    });

    deletes.chain(inserts).collect()
}

/// Replay `steps` on `old`, returning the new sequence.
///
/// Deletions are removed in descending old index, insertions added in
/// ascending new index. Returns `None` if a step's index does not fit, which
/// means the steps were not computed from `old`.
pub fn apply_steps<T: Clone>(steps: &[SequenceStep<T>], old: &[T]) -> Option<Vec<T>> {
    let mut result = old.to_vec();

    let mut deletes: Vec<usize> = steps
        .iter()
        .filter(|step| step.is_delete())
        .map(SequenceStep::index)
        .collect();
    deletes.sort_unstable_by(|a, b| b.cmp(a));
    deletes.dedup();
    for index in deletes {
        if index >= result.len() {
            return None;
        }
        result.remove(index);
    }

    let mut inserts: Vec<(usize, &T)> = steps
        .iter()
        .filter_map(|step| match step {
            SequenceStep::Insert { index, value } => Some((*index, value)),
            SequenceStep::Delete { .. } => None,
        })
        .collect();
    inserts.sort_by_key(|(index, _)| *index);
    for (index, value) in inserts {
        if index > result.len() {
            return None;
        }
        result.insert(index, value.clone());
    }

    Some(result)
}
