//! Draft/commit editing of verification plan sheets.
//!
//! Edits never touch the committed sheet set. The first edit clones the
//! committed set into a draft and every later edit writes into that draft.
//! A present draft is the only signal for "has uncommitted changes".

use std::sync::Arc;

use super::error::{WorkspaceError, WorkspaceResult};
use super::sheet::{CellValue, SheetName, SheetSet};

/// Holder of the uncommitted sheet overlay.
#[derive(Debug, Clone, Default)]
pub struct DraftEditor {
    draft: Option<Arc<SheetSet>>,
}

impl DraftEditor {
    /// Create an editor with no pending changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there are uncommitted edits.
    pub fn has_changes(&self) -> bool {
        self.draft.is_some()
    }

    /// The current draft, if any.
    pub fn draft(&self) -> Option<&Arc<SheetSet>> {
        self.draft.as_ref()
    }

    /// The sheets to show: the draft when present, else the committed set.
    pub fn active<'a>(&'a self, committed: Option<&'a SheetSet>) -> Option<&'a SheetSet> {
        self.draft.as_deref().or(committed)
    }

    /// Write `value` at `(sheet, row, column)` of the draft.
    ///
    /// The coordinate is checked before anything is cloned, so a rejected
    /// edit leaves both the draft and the committed set as they were.
    pub fn edit_cell(
        &mut self,
        committed: Option<&SheetSet>,
        sheet: SheetName,
        row: usize,
        column: usize,
        value: CellValue,
    ) -> WorkspaceResult<()> {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.check_cell(sheet, row, column)?;
                Arc::make_mut(draft).set_cell(sheet, row, column, value)?;
            }
            None => {
                let base = committed.ok_or(WorkspaceError::OutOfRange { sheet, row, column })?;
                base.check_cell(sheet, row, column)?;
                let mut draft = base.clone();
                draft.set_cell(sheet, row, column, value)?;
                self.draft = Some(Arc::new(draft));
            }
        }

        tracing::debug!(sheet = %sheet, row, column, "Draft cell edited");
        Ok(())
    }

    /// Take the draft for committing, leaving no pending changes.
    pub fn take(&mut self) -> WorkspaceResult<SheetSet> {
        self.draft
            .take()
            .map(Arc::unwrap_or_clone)
            .ok_or_else(|| {
                WorkspaceError::validation("there are no pending verification plan edits")
            })
    }

    /// Drop the draft. Returns whether there was one.
    pub fn discard(&mut self) -> bool {
        self.draft.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{FeatureEntry, PlanSourceData};

    fn committed() -> SheetSet {
        let plan = PlanSourceData {
            features: vec![
                FeatureEntry { feature_id: "F001".into(), ..Default::default() },
                FeatureEntry { feature_id: "F002".into(), ..Default::default() },
            ],
            pdf_coverage: Vec::new(),
        };
        SheetSet::from_plan(&plan)
    }

    #[test]
    fn test_first_edit_creates_draft() {
        let committed = committed();
        let mut editor = DraftEditor::new();
        assert!(!editor.has_changes());

        editor
            .edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "Updated text".into())
            .unwrap();

        assert!(editor.has_changes());
        let active = editor.active(Some(&committed)).unwrap();
        assert_eq!(
            active.cell(SheetName::VerificationPlan, 0, 0),
            Some(&CellValue::from("Updated text"))
        );
        assert_eq!(
            committed.cell(SheetName::VerificationPlan, 0, 0),
            Some(&CellValue::from("F001"))
        );
    }

    #[test]
    fn test_edits_accumulate_in_draft() {
        let committed = committed();
        let mut editor = DraftEditor::new();
        editor.edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "A".into()).unwrap();
        editor.edit_cell(Some(&committed), SheetName::VerificationPlan, 1, 0, "B".into()).unwrap();

        let draft = editor.take().unwrap();
        assert_eq!(draft.cell(SheetName::VerificationPlan, 0, 0), Some(&CellValue::from("A")));
        assert_eq!(draft.cell(SheetName::VerificationPlan, 1, 0), Some(&CellValue::from("B")));
        assert!(!editor.has_changes());
    }

    #[test]
    fn test_out_of_range_does_not_create_draft() {
        let committed = committed();
        let mut editor = DraftEditor::new();

        let err = editor
            .edit_cell(Some(&committed), SheetName::VerificationPlan, 5, 0, "x".into())
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::OutOfRange { row: 5, .. }));
        assert!(!editor.has_changes());

        let err = editor.edit_cell(None, SheetName::TestCases, 0, 0, "x".into()).unwrap_err();
        assert!(matches!(err, WorkspaceError::OutOfRange { sheet: SheetName::TestCases, .. }));
        assert!(!editor.has_changes());
    }

    #[test]
    fn test_discard_restores_committed_view() {
        let committed = committed();
        let before = committed.clone();
        let mut editor = DraftEditor::new();
        editor.edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "x".into()).unwrap();

        assert!(editor.discard());
        assert!(!editor.discard());
        assert_eq!(editor.active(Some(&committed)), Some(&before));
    }

    #[test]
    fn test_take_without_draft_fails() {
        let mut editor = DraftEditor::new();
        assert!(matches!(editor.take(), Err(WorkspaceError::Validation(_))));
    }

    #[test]
    fn test_snapshot_of_draft_is_not_mutated() {
        let committed = committed();
        let mut editor = DraftEditor::new();
        editor.edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "A".into()).unwrap();
        let snapshot = Arc::clone(editor.draft().unwrap());

        editor.edit_cell(Some(&committed), SheetName::VerificationPlan, 0, 0, "B".into()).unwrap();
        assert_eq!(snapshot.cell(SheetName::VerificationPlan, 0, 0), Some(&CellValue::from("A")));
    }
}
