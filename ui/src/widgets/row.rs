//! One row of the users list.
//!
//! Rows never touch the console. They report what the operator asked for as
//! a [`RowIntent`] and the panel applies it once the list is drawn.

use egui::{Color32, ComboBox, RichText, Ui};
use moderation_business::{OperatorIdentity, Role, RoleFilter, RowEditMode, UserRecord, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIntent {
    BeginEdit,
    PickRole(Role),
    /// Submit the picked role. Completion is gated on the backend.
    ChangeRole(Role),
    CancelEdit,
    /// Block an active user or unblock a blocked one.
    ToggleStatus,
}

/// Whether `operator` may change `user`.
///
/// Nobody edits their own account and only admins touch admins. Without an
/// operator every row is editable.
pub fn can_moderate(operator: Option<&OperatorIdentity>, user: &UserRecord) -> bool {
    operator.is_none_or(|operator| {
        operator.email != user.email
            && operator.role != Role::User
            && (user.role != Role::Admin || operator.role == Role::Admin)
    })
}

fn role_label(role: Role) -> &'static str {
    RoleFilter::Only(role).label()
}

fn status_text(status: UserStatus) -> RichText {
    match status {
        UserStatus::Active => RichText::new("Active").color(Color32::from_rgb(34, 139, 34)),
        UserStatus::Blocked => RichText::new("Blocked").color(Color32::RED),
    }
}

/// Draw the four cells of one grid row. Does not end the row.
pub fn user_row(
    ui: &mut Ui,
    user: &UserRecord,
    mode: RowEditMode,
    operator: Option<&OperatorIdentity>,
) -> Option<RowIntent> {
    let mut intent = None;
    let editable = can_moderate(operator, user);

    ui.vertical(|ui| {
        ui.label(user.display_name());
        if user.full_name.is_some() {
            ui.label(RichText::new(&user.email).small().weak());
        }
    });

    match mode {
        RowEditMode::ReadOnly => {
            ui.label(role_label(user.role));
        }
        RowEditMode::Editing { draft } => {
            let mut picked = draft;
            ComboBox::from_id_salt(("role_draft", user.id.0))
                .selected_text(role_label(picked))
                .show_ui(ui, |ui| {
                    for role in Role::ALL {
                        ui.selectable_value(&mut picked, role, role_label(role));
                    }
                });
            if picked != draft {
                intent = Some(RowIntent::PickRole(picked));
            }
        }
    }

    ui.label(status_text(user.status));

    ui.horizontal(|ui| {
        ui.add_enabled_ui(editable, |ui| match mode {
            RowEditMode::ReadOnly => {
                if ui.button("Edit role").clicked() {
                    intent = Some(RowIntent::BeginEdit);
                }
                let toggle = match user.status {
                    UserStatus::Active => "Block",
                    UserStatus::Blocked => "Unblock",
                };
                if ui.button(toggle).clicked() {
                    intent = Some(RowIntent::ToggleStatus);
                }
            }
            RowEditMode::Editing { draft } => {
                if ui.button("Save").clicked() {
                    intent = Some(RowIntent::ChangeRole(draft));
                }
                if ui.button("Cancel").clicked() {
                    intent = Some(RowIntent::CancelEdit);
                }
            }
        });
    });

    intent
}
