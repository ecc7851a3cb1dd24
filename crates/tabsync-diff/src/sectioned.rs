//! Sectioned diff: compare two snapshots section by section, then row by row.
//!
//! Section keys are aligned first. Sections only in `old` become a single
//! `SectionDelete`. Sections only in `new` become a `SectionInsert` followed
//! by one `RowInsert` per row, since an inserted section starts out empty.
//! Sections present in both are diffed row by row.
//!
//! The emitted order is fixed: row deletes, section deletes, section
//! inserts, row inserts. Deletes use old-snapshot indices, inserts
//! new-snapshot indices, each group ascending.

use tabsync_types::{EditOperation, EditScript, SectionedCollection};

use crate::sequence::align;

/// Compute the minimal edit script turning `old` into `new`.
pub fn diff<S, T>(
    old: &SectionedCollection<S, T>,
    new: &SectionedCollection<S, T>,
) -> EditScript<S, T>
where
    S: PartialEq + Clone,
    T: PartialEq + Clone,
{
    let old_keys: Vec<&S> = old.keys().collect();
    let new_keys: Vec<&S> = new.keys().collect();
    let sections = align(&old_keys, &new_keys);

    let mut row_deletes = Vec::new();
    let mut row_inserts = Vec::new();

    for &(old_section, new_section) in &sections.matched {
        let old_rows = &old[old_section];
        let new_rows = &new[new_section];
        let rows = align(old_rows, new_rows);

        row_deletes.extend(rows.deleted.iter().map(|&row| EditOperation::RowDelete {
            section: old_section,
            row,
            value: old_rows[row].clone(),
        }));
        row_inserts.extend(rows.inserted.iter().map(|&row| EditOperation::RowInsert {
            section: new_section,
            row,
            value: new_rows[row].clone(),
        }));
    }

    let section_deletes = sections
        .deleted
        .iter()
        .map(|&section| EditOperation::SectionDelete {
            section,
            key: old.entries()[section].0.clone(),
        });

    let mut section_inserts = Vec::with_capacity(sections.inserted.len());
    for &section in &sections.inserted {
        let (key, rows) = &new.entries()[section];
        section_inserts.push(EditOperation::SectionInsert {
            section,
            key: key.clone(),
        });
        row_inserts.extend(
            rows.iter()
                .enumerate()
                .map(|(row, value)| EditOperation::RowInsert {
                    section,
                    row,
                    value: value.clone(),
                }),
        );
    }
    row_inserts.sort_by_key(|op| op.index_path());

    let operations: Vec<_> = row_deletes
        .into_iter()
        .chain(section_deletes)
        .chain(section_inserts)
        .chain(row_inserts)
        .collect();

    EditScript::from(operations)
}
