use egui::{Color32, Ui};

pub const UPDATING_TEXT: &str = "Updating…";
pub const UP_TO_DATE_TEXT: &str = "Everything is up to date";

/// Progress of loading and update requests.
///
/// An error stays visible until the next request starts.
pub fn settings_info_box(ui: &mut Ui, are_updating: bool, error: Option<&str>) {
    ui.horizontal(|ui| {
        if are_updating {
            ui.spinner();
            ui.label(UPDATING_TEXT);
        } else if let Some(error) = error {
            ui.colored_label(Color32::RED, format!("Error: {error}"));
        } else {
            ui.label(UP_TO_DATE_TEXT);
        }
    });
}
