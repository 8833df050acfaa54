//! Wiring of the moderation console.
//!
//! [`ModerationConsole`] owns the store and connects the pieces: criteria
//! changes re-filter locally, mount triggers the one collection load, and row
//! intents go to the [`ActionOrchestrator`]. Front-ends (egui panel, CLI) only
//! talk to this type.

use std::sync::Arc;

use log::{debug, info};
use moderation_states::{StateCtx, Tasks};

use crate::client::HttpModerationClient;
use crate::commands::{Credential, UserCommands, UsersLoader};
use crate::config::ConsoleConfig;
use crate::edit_mode::{RowEditMode, RowEditModes};
use crate::filter::{FilterCriteria, FilteredUsers, RoleFilter, StatusFilter};
use crate::list_state::{ModerationListState, SettingsStatus};
use crate::model::{OperatorIdentity, Role, UserId, UserRecord, UserStatus};
use crate::orchestrator::ActionOrchestrator;

/// A store with every console state registered at its initial value.
pub fn moderation_store() -> StateCtx {
    let mut ctx = StateCtx::new();
    ctx.add_state(ModerationListState::default());
    ctx.add_state(FilterCriteria::default());
    ctx.add_state(RowEditModes::default());
    ctx.add_state(SettingsStatus::default());
    ctx
}

#[derive(Debug)]
pub struct ModerationConsole {
    ctx: StateCtx,
    filtered: FilteredUsers,
    loader: Arc<dyn UsersLoader>,
    orchestrator: ActionOrchestrator,
    operator: Option<OperatorIdentity>,
    mounted: bool,
}

impl ModerationConsole {
    /// Build a console over `ctx`, which should come from [`moderation_store`].
    pub fn new(
        ctx: StateCtx,
        loader: Arc<dyn UsersLoader>,
        commands: Arc<dyn UserCommands>,
        credential: Credential,
    ) -> Self {
        Self {
            ctx,
            filtered: FilteredUsers::default(),
            loader,
            orchestrator: ActionOrchestrator::new(commands, credential),
            operator: None,
            mounted: false,
        }
    }

    /// A console backed by [`HttpModerationClient`].
    pub fn with_http(config: &ConsoleConfig) -> Self {
        let ctx = moderation_store();
        let client = Arc::new(HttpModerationClient::new(config, &ctx));
        Self::new(ctx, client.clone(), client, config.credential.clone())
    }

    pub fn with_operator(mut self, operator: OperatorIdentity) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn operator(&self) -> Option<&OperatorIdentity> {
        self.operator.as_ref()
    }

    /// Request the user collection. Only the first call does anything.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        info!("Mounting moderation console, requesting users");
        self.loader.request_users();
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.ctx.state::<FilterCriteria>()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.ctx
            .update::<FilterCriteria>(|criteria| criteria.search_text = text);
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.ctx
            .update::<FilterCriteria>(|criteria| criteria.status_filter = filter);
    }

    pub fn set_role_filter(&mut self, filter: RoleFilter) {
        self.ctx
            .update::<FilterCriteria>(|criteria| criteria.role_filter = filter);
    }

    pub fn list(&self) -> &ModerationListState {
        self.ctx.state::<ModerationListState>()
    }

    pub fn settings(&self) -> &SettingsStatus {
        self.ctx.state::<SettingsStatus>()
    }

    pub fn edit_modes(&self) -> &RowEditModes {
        self.ctx.state::<RowEditModes>()
    }

    /// `true` while the info box should show progress.
    pub fn is_busy(&self) -> bool {
        self.list().is_loading || self.settings().are_updating
    }

    /// Users to display, or `None` while the collection is still loading.
    pub fn visible_users(&mut self) -> Option<Vec<&UserRecord>> {
        let list = self.ctx.state::<ModerationListState>();
        if list.is_loading {
            return None;
        }
        let revision = self.ctx.revision::<ModerationListState>().unwrap_or_default();
        let criteria = self.ctx.state::<FilterCriteria>();
        Some(self.filtered.view(&list.items, revision, criteria))
    }

    /// Number of users matching the criteria; 0 while loading.
    pub fn user_count(&mut self) -> usize {
        self.visible_users().map_or(0, |users| users.len())
    }

    /// Number of users in the collection, ignoring the criteria.
    pub fn total_users(&self) -> usize {
        self.list().items.len()
    }

    pub fn begin_edit(&mut self, id: UserId) {
        let Some(current) = self.list().user(id).map(|user| user.role) else {
            debug!("Ignoring edit request for unknown user {id}");
            return;
        };
        self.ctx
            .update::<RowEditModes>(|modes| modes.begin_edit(id, current));
    }

    pub fn set_draft(&mut self, id: UserId, role: Role) {
        self.ctx
            .update::<RowEditModes>(|modes| modes.set_draft(id, role));
    }

    pub fn cancel_edit(&mut self, id: UserId) {
        self.ctx.update::<RowEditModes>(|modes| modes.close(id));
    }

    /// Submit `role` for `id` in the background.
    ///
    /// The row leaves edit mode once the command is confirmed; that lands on a
    /// later [`ModerationConsole::sync`]. Returns `false` if nothing could be
    /// spawned.
    pub fn change_role(&self, id: UserId, role: Role) -> bool {
        let orchestrator = self.orchestrator.clone();
        let updater = self.ctx.updater();
        self.ctx.tasks().spawn("change user role", async move {
            orchestrator
                .change_role(id, role, move || {
                    updater.update::<RowEditModes>(move |modes| modes.close(id));
                })
                .await;
        })
    }

    /// Submit the draft role of an editing row. Returns `false` for read-only rows.
    pub fn commit_edit(&self, id: UserId) -> bool {
        match self.edit_modes().mode(id) {
            RowEditMode::Editing { draft } => self.change_role(id, draft),
            RowEditMode::ReadOnly => false,
        }
    }

    pub fn change_status(&self, id: UserId, status: UserStatus) {
        self.orchestrator.change_status(id, status);
    }

    /// Flip a user between active and blocked.
    pub fn toggle_status(&self, id: UserId) {
        if let Some(user) = self.list().user(id) {
            self.change_status(id, user.status.toggled());
        }
    }

    /// Apply updates queued by background work. Call once per frame.
    pub fn sync(&mut self) -> usize {
        self.ctx.sync()
    }

    /// Wait for background work and apply its results.
    pub async fn settle(&mut self) -> usize {
        self.ctx.settle().await
    }

    pub fn tasks(&self) -> &Tasks {
        self.ctx.tasks()
    }

    pub fn has_pending_work(&self) -> bool {
        !self.ctx.tasks().is_empty()
    }
}
