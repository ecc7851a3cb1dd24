use std::collections::BTreeSet;

use tabsync_types::{EditOperation, EditScript, IndexPath};
use tracing::trace;

use crate::config::ReconcilerConfig;
use crate::surface::UpdateSurface;

/// Issue every operation of `script` against `surface`.
///
/// Deletes are issued before inserts regardless of how the script
/// interleaves them; within each group the script's order is kept.
pub(crate) fn replay<Sf, S, T>(
    surface: &Sf,
    script: &EditScript<S, T>,
    config: &ReconcilerConfig<Sf::Style>,
) where
    Sf: UpdateSurface + ?Sized,
{
    let deletes = script.iter().filter(|op| op.is_delete());
    let inserts = script.iter().filter(|op| op.is_insert());

    for op in deletes.chain(inserts) {
        trace!(
            kind = op.kind(),
            section = op.section(),
            row = ?op.index_path().map(|path| path.row),
            "replaying operation"
        );
        match op {
            EditOperation::SectionInsert { section, .. } => {
                surface.insert_sections(&BTreeSet::from([*section]), &config.insertion_style);
            }
            EditOperation::SectionDelete { section, .. } => {
                surface.delete_sections(&BTreeSet::from([*section]), &config.deletion_style);
            }
            EditOperation::RowInsert { section, row, .. } => {
                surface.insert_rows(&[IndexPath::new(*section, *row)], &config.insertion_style);
            }
            EditOperation::RowDelete { section, row, .. } => {
                surface.delete_rows(&[IndexPath::new(*section, *row)], &config.deletion_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowAnimation;
    use crate::recording::{RecordingSurface, SurfaceCall};

    #[test]
    fn deletes_replayed_before_inserts() {
        let surface = RecordingSurface::new();
        let config = ReconcilerConfig::new(RowAnimation::Fade, RowAnimation::Left);
        // Deliberately interleaved.
        let script: EditScript<&str, u8> = EditScript::from(vec![
            EditOperation::RowInsert {
                section: 0,
                row: 0,
                value: 1,
            },
            EditOperation::SectionDelete {
                section: 2,
                key: "C",
            },
            EditOperation::SectionInsert {
                section: 1,
                key: "B",
            },
            EditOperation::RowDelete {
                section: 0,
                row: 3,
                value: 4,
            },
        ]);

        replay(&surface, &script, &config);

        assert_eq!(
            surface.calls(),
            vec![
                SurfaceCall::DeleteSections {
                    sections: vec![2],
                    style: RowAnimation::Left,
                },
                SurfaceCall::DeleteRows {
                    paths: vec![IndexPath::new(0, 3)],
                    style: RowAnimation::Left,
                },
                SurfaceCall::InsertRows {
                    paths: vec![IndexPath::new(0, 0)],
                    style: RowAnimation::Fade,
                },
                SurfaceCall::InsertSections {
                    sections: vec![1],
                    style: RowAnimation::Fade,
                },
            ]
        );
    }

    #[test]
    fn empty_script_issues_nothing() {
        let surface: RecordingSurface = RecordingSurface::new();
        let script: EditScript<u8, u8> = EditScript::new();
        replay(&surface, &script, &ReconcilerConfig::default());
        assert!(surface.calls().is_empty());
    }
}
