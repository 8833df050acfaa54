//! The users moderation panel.
//!
//! Layout follows a plain table: a filter toolbar, the number of matching
//! users, then one grid row per user. While the collection is loading the grid
//! is replaced by a spinner.

use egui::{
    Color32, ComboBox, Frame, InnerResponse, Margin, Response, ScrollArea, Stroke, TextEdit, Ui,
};
use log::warn;
use moderation_business::{ModerationConsole, RoleFilter, StatusFilter, UserId, UserRecord};

use super::info_box::settings_info_box;
use super::row::{RowIntent, user_row};

const TABLE_BORDER_COLOR: Color32 = Color32::from_rgb(200, 200, 200);
const HEADER_BG_COLOR: Color32 = Color32::from_rgb(245, 245, 245);

pub const SEARCH_HINT: &str = "Search by email or name";

fn header_cell<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> InnerResponse<R> {
    Frame::NONE
        .fill(HEADER_BG_COLOR)
        .inner_margin(Margin::symmetric(8, 8))
        .show(ui, add_contents)
}

/// "1 user", "3 users".
pub fn user_count_text(count: usize) -> String {
    if count == 1 {
        "1 user".to_owned()
    } else {
        format!("{count} users")
    }
}

fn filter_toolbar(console: &mut ModerationConsole, ui: &mut Ui) {
    let criteria = console.criteria().clone();
    let mut search = criteria.search_text.clone();
    let mut status = criteria.status_filter;
    let mut role = criteria.role_filter;

    ui.horizontal(|ui| {
        ui.add(TextEdit::singleline(&mut search).hint_text(SEARCH_HINT));

        ComboBox::from_id_salt("status_filter")
            .selected_text(status.label())
            .show_ui(ui, |ui| {
                for option in StatusFilter::ALL {
                    ui.selectable_value(&mut status, option, option.label());
                }
            });

        ComboBox::from_id_salt("role_filter")
            .selected_text(role.label())
            .show_ui(ui, |ui| {
                for option in RoleFilter::ALL {
                    ui.selectable_value(&mut role, option, option.label());
                }
            });
    });

    if search != criteria.search_text {
        console.set_search_text(search);
    }
    if status != criteria.status_filter {
        console.set_status_filter(status);
    }
    if role != criteria.role_filter {
        console.set_role_filter(role);
    }
}

fn users_grid(
    console: &ModerationConsole,
    users: &[UserRecord],
    ui: &mut Ui,
) -> Option<(UserId, RowIntent)> {
    let mut pending = None;

    Frame::NONE
        .stroke(Stroke::new(1.0, TABLE_BORDER_COLOR))
        .inner_margin(Margin::ZERO)
        .show(ui, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("users_table")
                    .num_columns(4)
                    .striped(true)
                    .spacing([16.0, 6.0])
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for title in ["User", "Role", "Status", "Actions"] {
                            header_cell(ui, |ui| ui.strong(title));
                        }
                        ui.end_row();

                        for user in users {
                            let mode = console.edit_modes().mode(user.id);
                            // Each top-level widget of the row is one grid cell.
                            if let Some(intent) = user_row(ui, user, mode, console.operator()) {
                                pending = Some((user.id, intent));
                            }
                            ui.end_row();
                        }
                    });
            });
        });

    pending
}

fn apply_intent(console: &mut ModerationConsole, id: UserId, intent: RowIntent) {
    match intent {
        RowIntent::BeginEdit => console.begin_edit(id),
        RowIntent::PickRole(role) => console.set_draft(id, role),
        RowIntent::ChangeRole(role) => {
            if !console.change_role(id, role) {
                warn!("Role change for user {id} was not started, the row stays in edit mode");
            }
        }
        RowIntent::CancelEdit => console.cancel_edit(id),
        RowIntent::ToggleStatus => console.toggle_status(id),
    }
}

/// Displays the moderation panel and applies whatever the operator did this frame.
pub fn moderation_panel(console: &mut ModerationConsole, ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        ui.heading("Users");
        filter_toolbar(console, ui);

        let visible: Option<Vec<UserRecord>> = console
            .visible_users()
            .map(|users| users.into_iter().cloned().collect());

        let count = visible.as_ref().map_or(0, Vec::len);
        ui.label(user_count_text(count));
        ui.add_space(8.0);

        match visible {
            None => {
                ui.spinner();
            }
            Some(users) => {
                if let Some((id, intent)) = users_grid(console, &users, ui) {
                    apply_intent(console, id, intent);
                }
            }
        }

        ui.separator();
        let error = console
            .settings()
            .error
            .as_deref()
            .or(console.list().error.as_deref());
        settings_info_box(ui, console.is_busy(), error);
    })
    .response
}
