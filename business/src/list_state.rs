//! The loaded user collection and its load status.
//!
//! Only the collection loader and the command implementation write here, and
//! only through store updates. The console reads it as an immutable snapshot.

use moderation_states::State;

use crate::model::{Role, UserId, UserRecord, UserStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationListState {
    pub items: Vec<UserRecord>,
    pub is_loading: bool,
    /// Error of the last collection load, if it failed.
    pub error: Option<String>,
}

impl Default for ModerationListState {
    /// A freshly mounted console is empty and loading.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: true,
            error: None,
        }
    }
}

impl State for ModerationListState {}

impl ModerationListState {
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish_loading(&mut self, items: Vec<UserRecord>) {
        self.items = items;
        self.is_loading = false;
        self.error = None;
    }

    /// Keeps the previous items so a stale list is still better than nothing.
    pub fn fail_loading(&mut self, error: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(error.into());
    }

    pub fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.items.iter().find(|user| user.id == id)
    }

    /// Record a committed role change. Returns `false` when `id` is unknown.
    pub fn apply_role(&mut self, id: UserId, role: Role) -> bool {
        match self.items.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    /// Record a committed status change. Returns `false` when `id` is unknown.
    pub fn apply_status(&mut self, id: UserId, status: UserStatus) -> bool {
        match self.items.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.status = status;
                true
            }
            None => false,
        }
    }
}

/// Progress of update requests, shown by the console's info box.
///
/// Requests may overlap, so `are_updating` stays set until the last one in
/// flight has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStatus {
    pub are_updating: bool,
    pub error: Option<String>,
    in_flight: usize,
}

impl State for SettingsStatus {}

impl SettingsStatus {
    pub fn start_update(&mut self) {
        self.in_flight += 1;
        self.are_updating = true;
        self.error = None;
    }

    pub fn finish_update(&mut self) {
        self.end_request();
    }

    pub fn fail_update(&mut self, error: impl Into<String>) {
        self.end_request();
        self.error = Some(error.into());
    }

    /// Number of update requests that started and have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn end_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.are_updating = self.in_flight > 0;
    }
}
