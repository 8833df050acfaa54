//! Per-row edit affordance.
//!
//! ```text
//! ReadOnly --begin_edit--> Editing --role committed--> ReadOnly
//!                          Editing --role rejected---> Editing
//!                          Editing --cancel_edit-----> ReadOnly
//! ```
//!
//! There is no timeout out of `Editing`.

use std::collections::HashMap;

use moderation_states::State;

use crate::model::{Role, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowEditMode {
    #[default]
    ReadOnly,
    /// The row shows a role selector; `draft` is the role currently picked.
    Editing { draft: Role },
}

impl RowEditMode {
    pub fn is_editing(self) -> bool {
        matches!(self, Self::Editing { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowEditModes {
    rows: HashMap<UserId, RowEditMode>,
}

impl State for RowEditModes {}

impl RowEditModes {
    pub fn mode(&self, id: UserId) -> RowEditMode {
        self.rows.get(&id).copied().unwrap_or_default()
    }

    pub fn is_editing(&self, id: UserId) -> bool {
        self.mode(id).is_editing()
    }

    /// Enter edit mode with `current` preselected. Already editing rows keep their draft.
    pub fn begin_edit(&mut self, id: UserId, current: Role) {
        self.rows
            .entry(id)
            .and_modify(|mode| {
                if !mode.is_editing() {
                    *mode = RowEditMode::Editing { draft: current };
                }
            })
            .or_insert(RowEditMode::Editing { draft: current });
    }

    /// Change the picked role of an editing row. Ignored for read-only rows.
    pub fn set_draft(&mut self, id: UserId, role: Role) {
        if let Some(RowEditMode::Editing { draft }) = self.rows.get_mut(&id) {
            *draft = role;
        }
    }

    /// Return the row to read-only view.
    pub fn close(&mut self, id: UserId) {
        self.rows.remove(&id);
    }

    pub fn editing_count(&self) -> usize {
        self.rows.values().filter(|mode| mode.is_editing()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_default_to_read_only() {
        let modes = RowEditModes::default();
        assert_eq!(modes.mode(UserId(1)), RowEditMode::ReadOnly);
    }

    #[test]
    fn test_begin_edit_then_close() {
        let mut modes = RowEditModes::default();
        modes.begin_edit(UserId(1), Role::User);
        assert_eq!(
            modes.mode(UserId(1)),
            RowEditMode::Editing { draft: Role::User }
        );

        modes.close(UserId(1));
        assert!(!modes.is_editing(UserId(1)));
    }

    #[test]
    fn test_begin_edit_keeps_existing_draft() {
        let mut modes = RowEditModes::default();
        modes.begin_edit(UserId(1), Role::User);
        modes.set_draft(UserId(1), Role::Admin);
        modes.begin_edit(UserId(1), Role::User);

        assert_eq!(
            modes.mode(UserId(1)),
            RowEditMode::Editing { draft: Role::Admin }
        );
    }

    #[test]
    fn test_draft_ignored_for_read_only_rows() {
        let mut modes = RowEditModes::default();
        modes.set_draft(UserId(3), Role::Admin);
        assert_eq!(modes.mode(UserId(3)), RowEditMode::ReadOnly);
        assert_eq!(modes.editing_count(), 0);
    }

    #[test]
    fn test_rows_are_independent() {
        let mut modes = RowEditModes::default();
        modes.begin_edit(UserId(1), Role::User);
        modes.begin_edit(UserId(2), Role::Moderator);
        modes.close(UserId(1));

        assert!(!modes.is_editing(UserId(1)));
        assert!(modes.is_editing(UserId(2)));
        assert_eq!(modes.editing_count(), 1);
    }
}
