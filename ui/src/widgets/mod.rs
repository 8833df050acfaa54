mod info_box;
mod panel;
mod row;

pub use info_box::{UP_TO_DATE_TEXT, UPDATING_TEXT, settings_info_box};
pub use panel::{SEARCH_HINT, moderation_panel, user_count_text};
pub use row::{RowIntent, can_moderate, user_row};
